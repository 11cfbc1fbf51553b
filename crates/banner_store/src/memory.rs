// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A process-local statistics store.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{BannerId, BannerStat, BannerStatRow, GroupId, SlotId, StatsStore, StoreError};

#[derive(Debug, Default)]
struct State {
    memberships: HashMap<SlotId, BTreeSet<BannerId>>,
    stats: HashMap<(SlotId, GroupId), HashMap<BannerId, BannerStat>>,
}

/// An in-memory [`StatsStore`].
///
/// Counters survive the removal of a banner from a slot, so re-adding the banner resumes
/// from its previous statistics. Cloning the store shares the underlying state.
///
/// # Examples
///
/// ```no_run
/// use banner_store::{BannerId, GroupId, InMemoryStore, SlotId, StatsStore};
///
/// # async fn example() -> Result<(), banner_store::StoreError> {
/// let store = InMemoryStore::new();
/// let (slot, banner, group) = (SlotId::new(1), BannerId::new(10), GroupId::new(1));
///
/// store.add_banner_to_slot(slot, banner).await?;
/// store.record_show(slot, banner, group).await?;
///
/// let rows = store.banner_stats(slot, group).await?;
/// assert_eq!(rows[0].stat.shows, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw counters for one banner, including banners no longer in the slot.
    #[must_use]
    pub fn stats_for(&self, slot: SlotId, banner: BannerId, group: GroupId) -> Option<BannerStat> {
        self.state
            .read()
            .stats
            .get(&(slot, group))
            .and_then(|banners| banners.get(&banner).copied())
    }

    fn update(&self, slot: SlotId, banner: BannerId, group: GroupId, apply: impl FnOnce(&mut BannerStat)) {
        let mut state = self.state.write();
        let stat = state.stats.entry((slot, group)).or_default().entry(banner).or_default();
        apply(stat);
    }
}

impl StatsStore for InMemoryStore {
    async fn add_banner_to_slot(&self, slot: SlotId, banner: BannerId) -> Result<(), StoreError> {
        self.state.write().memberships.entry(slot).or_default().insert(banner);
        Ok(())
    }

    async fn remove_banner_from_slot(&self, slot: SlotId, banner: BannerId) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if let Some(banners) = state.memberships.get_mut(&slot) {
            banners.remove(&banner);
            if banners.is_empty() {
                state.memberships.remove(&slot);
            }
        }
        Ok(())
    }

    async fn record_show(&self, slot: SlotId, banner: BannerId, group: GroupId) -> Result<(), StoreError> {
        self.update(slot, banner, group, |stat| stat.shows = stat.shows.saturating_add(1));
        Ok(())
    }

    async fn record_click(&self, slot: SlotId, banner: BannerId, group: GroupId) -> Result<(), StoreError> {
        self.update(slot, banner, group, |stat| stat.clicks = stat.clicks.saturating_add(1));
        Ok(())
    }

    async fn banner_stats(&self, slot: SlotId, group: GroupId) -> Result<Vec<BannerStatRow>, StoreError> {
        let state = self.state.read();
        let (Some(members), Some(stats)) = (state.memberships.get(&slot), state.stats.get(&(slot, group))) else {
            return Ok(Vec::new());
        };

        Ok(members
            .iter()
            .filter_map(|banner| stats.get(banner).map(|stat| BannerStatRow { banner: *banner, stat: *stat }))
            .collect())
    }

    async fn banners_for_slot(&self, slot: SlotId) -> Result<Vec<BannerId>, StoreError> {
        Ok(self
            .state
            .read()
            .memberships
            .get(&slot)
            .map(|banners| banners.iter().copied().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOT: SlotId = SlotId::new(1);
    const GROUP: GroupId = GroupId::new(1);

    #[tokio::test]
    async fn membership_is_idempotent() {
        let store = InMemoryStore::new();
        store.add_banner_to_slot(SLOT, BannerId::new(2)).await.unwrap();
        store.add_banner_to_slot(SLOT, BannerId::new(1)).await.unwrap();
        store.add_banner_to_slot(SLOT, BannerId::new(1)).await.unwrap();

        assert_eq!(
            store.banners_for_slot(SLOT).await.unwrap(),
            vec![BannerId::new(1), BannerId::new(2)]
        );

        store.remove_banner_from_slot(SLOT, BannerId::new(1)).await.unwrap();
        store.remove_banner_from_slot(SLOT, BannerId::new(1)).await.unwrap();
        assert_eq!(store.banners_for_slot(SLOT).await.unwrap(), vec![BannerId::new(2)]);
    }

    #[tokio::test]
    async fn stats_are_filtered_to_members() {
        let store = InMemoryStore::new();
        store.add_banner_to_slot(SLOT, BannerId::new(1)).await.unwrap();
        store.record_show(SLOT, BannerId::new(1), GROUP).await.unwrap();
        store.record_click(SLOT, BannerId::new(1), GROUP).await.unwrap();
        store.record_click(SLOT, BannerId::new(9), GROUP).await.unwrap();

        let rows = store.banner_stats(SLOT, GROUP).await.unwrap();
        assert_eq!(rows, vec![BannerStatRow::new(BannerId::new(1), 1, 1)]);
        assert_eq!(store.stats_for(SLOT, BannerId::new(9), GROUP), Some(BannerStat::new(0, 1)));
    }

    #[tokio::test]
    async fn stats_survive_removal() {
        let store = InMemoryStore::new();
        let banner = BannerId::new(5);
        store.add_banner_to_slot(SLOT, banner).await.unwrap();
        store.record_show(SLOT, banner, GROUP).await.unwrap();
        store.remove_banner_from_slot(SLOT, banner).await.unwrap();

        assert!(store.banner_stats(SLOT, GROUP).await.unwrap().is_empty());

        store.add_banner_to_slot(SLOT, banner).await.unwrap();
        assert_eq!(store.banner_stats(SLOT, GROUP).await.unwrap(), vec![BannerStatRow::new(banner, 1, 0)]);
    }

    #[tokio::test]
    async fn groups_are_independent() {
        let store = InMemoryStore::new();
        let banner = BannerId::new(1);
        store.add_banner_to_slot(SLOT, banner).await.unwrap();
        store.record_show(SLOT, banner, GroupId::new(1)).await.unwrap();

        assert!(store.banner_stats(SLOT, GroupId::new(2)).await.unwrap().is_empty());
    }
}
