// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The durable statistics store contract.

use std::sync::Arc;

use crate::{BannerId, BannerStatRow, GroupId, SlotId, StoreError};

/// Durable home of slot memberships and per-(slot, banner, group) counters.
///
/// Implementations must be safe to call concurrently. Membership writes are idempotent:
/// adding a banner twice or removing an absent banner succeeds. Removing a banner from a
/// slot does not have to delete its counters; readers only ever ask for counters together
/// with the current membership.
pub trait StatsStore: Send + Sync {
    /// Adds `banner` to the rotation of `slot`.
    fn add_banner_to_slot(&self, slot: SlotId, banner: BannerId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes `banner` from the rotation of `slot`.
    fn remove_banner_from_slot(&self, slot: SlotId, banner: BannerId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Increments the show counter, creating the counter row with zero clicks when missing.
    fn record_show(&self, slot: SlotId, banner: BannerId, group: GroupId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Increments the click counter, creating the counter row with zero shows when missing.
    fn record_click(&self, slot: SlotId, banner: BannerId, group: GroupId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns the counters of the banners currently in `slot` for `group`.
    ///
    /// Banners without a counter row may be omitted.
    fn banner_stats(&self, slot: SlotId, group: GroupId) -> impl Future<Output = Result<Vec<BannerStatRow>, StoreError>> + Send;

    /// Returns the banners currently in `slot`.
    fn banners_for_slot(&self, slot: SlotId) -> impl Future<Output = Result<Vec<BannerId>, StoreError>> + Send;
}

impl<S: StatsStore> StatsStore for Arc<S> {
    fn add_banner_to_slot(&self, slot: SlotId, banner: BannerId) -> impl Future<Output = Result<(), StoreError>> + Send {
        S::add_banner_to_slot(self, slot, banner)
    }

    fn remove_banner_from_slot(&self, slot: SlotId, banner: BannerId) -> impl Future<Output = Result<(), StoreError>> + Send {
        S::remove_banner_from_slot(self, slot, banner)
    }

    fn record_show(&self, slot: SlotId, banner: BannerId, group: GroupId) -> impl Future<Output = Result<(), StoreError>> + Send {
        S::record_show(self, slot, banner, group)
    }

    fn record_click(&self, slot: SlotId, banner: BannerId, group: GroupId) -> impl Future<Output = Result<(), StoreError>> + Send {
        S::record_click(self, slot, banner, group)
    }

    fn banner_stats(&self, slot: SlotId, group: GroupId) -> impl Future<Output = Result<Vec<BannerStatRow>, StoreError>> + Send {
        S::banner_stats(self, slot, group)
    }

    fn banners_for_slot(&self, slot: SlotId) -> impl Future<Output = Result<Vec<BannerId>, StoreError>> + Send {
        S::banners_for_slot(self, slot)
    }
}
