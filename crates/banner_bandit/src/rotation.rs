// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use banner_store::{BannerId, EventNotifier, GroupId, SlotId, StatsStore};

use crate::{Bandit, Result};

/// The operations a request handler needs from a banner rotation engine.
///
/// [`Bandit`] implements this trait. Handlers written against it can be tested with a
/// hand-rolled implementation.
pub trait Rotation: Send + Sync {
    /// Adds `banner` to the rotation of `slot`.
    fn add_banner_to_slot(&self, slot: SlotId, banner: BannerId) -> impl Future<Output = Result<()>> + Send;

    /// Removes `banner` from the rotation of `slot`.
    fn remove_banner_from_slot(&self, slot: SlotId, banner: BannerId) -> impl Future<Output = Result<()>> + Send;

    /// Picks and records a banner to show in `slot` to a user of `group`.
    fn choose_banner(&self, slot: SlotId, group: GroupId) -> impl Future<Output = Result<BannerId>> + Send;

    /// Records a click on `banner` shown in `slot` to a user of `group`.
    fn record_click(&self, slot: SlotId, banner: BannerId, group: GroupId) -> impl Future<Output = Result<()>> + Send;
}

impl<S: StatsStore, N: EventNotifier + 'static> Rotation for Bandit<S, N> {
    fn add_banner_to_slot(&self, slot: SlotId, banner: BannerId) -> impl Future<Output = Result<()>> + Send {
        Self::add_banner_to_slot(self, slot, banner)
    }

    fn remove_banner_from_slot(&self, slot: SlotId, banner: BannerId) -> impl Future<Output = Result<()>> + Send {
        Self::remove_banner_from_slot(self, slot, banner)
    }

    fn choose_banner(&self, slot: SlotId, group: GroupId) -> impl Future<Output = Result<BannerId>> + Send {
        Self::choose_banner(self, slot, group)
    }

    fn record_click(&self, slot: SlotId, banner: BannerId, group: GroupId) -> impl Future<Output = Result<()>> + Send {
        Self::record_click(self, slot, banner, group)
    }
}
