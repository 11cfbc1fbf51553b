// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Test doubles for [`StatsStore`] and [`EventNotifier`].
//!
//! [`MockStore`] wraps an [`InMemoryStore`], records every call and can be told to fail
//! or to never answer selected calls. [`RecordingNotifier`] keeps every occurrence it
//! receives and can be switched into a failing mode.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
    BannerId, BannerStatRow, EventNotifier, GroupId, InMemoryStore, NotifyError, Occurrence, SlotId, StatsStore, StoreError,
};

/// A recorded store call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `add_banner_to_slot` was called.
    AddBanner {
        /// The slot argument.
        slot: SlotId,
        /// The banner argument.
        banner: BannerId,
    },
    /// `remove_banner_from_slot` was called.
    RemoveBanner {
        /// The slot argument.
        slot: SlotId,
        /// The banner argument.
        banner: BannerId,
    },
    /// `record_show` was called.
    RecordShow {
        /// The slot argument.
        slot: SlotId,
        /// The banner argument.
        banner: BannerId,
        /// The group argument.
        group: GroupId,
    },
    /// `record_click` was called.
    RecordClick {
        /// The slot argument.
        slot: SlotId,
        /// The banner argument.
        banner: BannerId,
        /// The group argument.
        group: GroupId,
    },
    /// `banner_stats` was called.
    BannerStats {
        /// The slot argument.
        slot: SlotId,
        /// The group argument.
        group: GroupId,
    },
    /// `banners_for_slot` was called.
    BannersForSlot(SlotId),
}

impl StoreOp {
    /// Returns the name of the store method.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddBanner { .. } => "add_banner_to_slot",
            Self::RemoveBanner { .. } => "remove_banner_from_slot",
            Self::RecordShow { .. } => "record_show",
            Self::RecordClick { .. } => "record_click",
            Self::BannerStats { .. } => "banner_stats",
            Self::BannersForSlot(_) => "banners_for_slot",
        }
    }

    /// Returns `true` for the two calls that read statistics during a cache load.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::BannerStats { .. } | Self::BannersForSlot(_))
    }
}

type OpPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

/// A recording, failure-injecting [`StatsStore`].
///
/// # Examples
///
/// ```no_run
/// use banner_store::testing::{MockStore, StoreOp};
/// use banner_store::{SlotId, StatsStore};
///
/// # async fn example() {
/// let store = MockStore::new();
/// store.fail_when(|op| matches!(op, StoreOp::BannersForSlot(_)));
///
/// assert!(store.banners_for_slot(SlotId::new(1)).await.is_err());
/// assert_eq!(store.operations(), vec![StoreOp::BannersForSlot(SlotId::new(1))]);
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MockStore {
    inner: InMemoryStore,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<OpPredicate>>>,
    stall_when: Arc<Mutex<Option<OpPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("inner", &self.inner)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .field("stall_when", &self.stall_when.lock().is_some())
            .finish()
    }
}

impl MockStore {
    /// Creates an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the backing in-memory store, which is not recorded.
    #[must_use]
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    /// Makes every call matching `predicate` fail with a backend error.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Makes every call matching `predicate` never complete.
    pub fn stall_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.stall_when.lock() = Some(Box::new(predicate));
    }

    /// Removes all failure and stall predicates.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
        *self.stall_when.lock() = None;
    }

    /// Returns all recorded calls in order.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Returns how many recorded calls match `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&StoreOp) -> bool) -> usize {
        self.operations.lock().iter().filter(|&op| predicate(op)).count()
    }

    /// Clears the recorded calls.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    async fn intercept(&self, op: StoreOp) -> Result<(), StoreError> {
        self.operations.lock().push(op);

        let stall = self.stall_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        if stall {
            std::future::pending::<()>().await;
        }

        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        if fail {
            return Err(StoreError::from_message(format!("mock: {} failed", op.name())));
        }

        Ok(())
    }
}

impl StatsStore for MockStore {
    async fn add_banner_to_slot(&self, slot: SlotId, banner: BannerId) -> Result<(), StoreError> {
        self.intercept(StoreOp::AddBanner { slot, banner }).await?;
        self.inner.add_banner_to_slot(slot, banner).await
    }

    async fn remove_banner_from_slot(&self, slot: SlotId, banner: BannerId) -> Result<(), StoreError> {
        self.intercept(StoreOp::RemoveBanner { slot, banner }).await?;
        self.inner.remove_banner_from_slot(slot, banner).await
    }

    async fn record_show(&self, slot: SlotId, banner: BannerId, group: GroupId) -> Result<(), StoreError> {
        self.intercept(StoreOp::RecordShow { slot, banner, group }).await?;
        self.inner.record_show(slot, banner, group).await
    }

    async fn record_click(&self, slot: SlotId, banner: BannerId, group: GroupId) -> Result<(), StoreError> {
        self.intercept(StoreOp::RecordClick { slot, banner, group }).await?;
        self.inner.record_click(slot, banner, group).await
    }

    async fn banner_stats(&self, slot: SlotId, group: GroupId) -> Result<Vec<BannerStatRow>, StoreError> {
        self.intercept(StoreOp::BannerStats { slot, group }).await?;
        self.inner.banner_stats(slot, group).await
    }

    async fn banners_for_slot(&self, slot: SlotId) -> Result<Vec<BannerId>, StoreError> {
        self.intercept(StoreOp::BannersForSlot(slot)).await?;
        self.inner.banners_for_slot(slot).await
    }
}

/// An [`EventNotifier`] that keeps every occurrence it is handed.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    occurrences: Arc<Mutex<Vec<Occurrence>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the recorder between succeeding and failing. Failed deliveries are still recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Returns the received occurrences in delivery order.
    #[must_use]
    pub fn occurrences(&self) -> Vec<Occurrence> {
        self.occurrences.lock().clone()
    }
}

impl EventNotifier for RecordingNotifier {
    async fn notify(&self, occurrence: Occurrence) -> Result<(), NotifyError> {
        self.occurrences.lock().push(occurrence);
        if self.failing.load(Ordering::Relaxed) {
            return Err(NotifyError::from_message("mock: notify failed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_forwards() {
        let store = MockStore::new();
        store.add_banner_to_slot(SlotId::new(1), BannerId::new(2)).await.unwrap();

        assert_eq!(store.banners_for_slot(SlotId::new(1)).await.unwrap(), vec![BannerId::new(2)]);
        assert_eq!(
            store.operations(),
            vec![
                StoreOp::AddBanner {
                    slot: SlotId::new(1),
                    banner: BannerId::new(2)
                },
                StoreOp::BannersForSlot(SlotId::new(1)),
            ]
        );
    }

    #[tokio::test]
    async fn failed_calls_do_not_reach_inner_store() {
        let store = MockStore::new();
        store.fail_when(|op| matches!(op, StoreOp::RecordShow { .. }));

        let error = store
            .record_show(SlotId::new(1), BannerId::new(1), GroupId::new(1))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "mock: record_show failed");
        assert_eq!(store.inner().stats_for(SlotId::new(1), BannerId::new(1), GroupId::new(1)), None);

        store.clear_failures();
        store.record_show(SlotId::new(1), BannerId::new(1), GroupId::new(1)).await.unwrap();
        assert_eq!(store.count(|op| matches!(op, StoreOp::RecordShow { .. })), 2);
    }

    #[tokio::test]
    async fn notifier_records_failures_too() {
        let notifier = RecordingNotifier::new();
        let occurrence = Occurrence::click(SlotId::new(1), BannerId::new(1), GroupId::new(1));

        notifier.notify(occurrence).await.unwrap();
        notifier.set_failing(true);
        notifier.notify(occurrence).await.unwrap_err();

        assert_eq!(notifier.occurrences(), vec![occurrence, occurrence]);
    }
}
