// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-(slot, group) statistics cache.
//!
//! The cache maps a [`CacheKey`] to a shared, individually locked [`SlotGroupStats`].
//! The map lock is only held for lookups, publication and invalidation; counter updates
//! take the entry lock alone. Each slot carries a generation that invalidation bumps, and
//! an entry built from store reads that began before an invalidation is never published.
//! A store write is applied to the entry it was issued against only while that entry is
//! still cached; otherwise the key is dropped so the next load reads the write back.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use banner_store::{BannerId, BannerStat, BannerStatRow, GroupId, SlotId};
use parking_lot::RwLock;

/// Identifies one cache entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub slot: SlotId,
    pub group: GroupId,
}

impl CacheKey {
    pub const fn new(slot: SlotId, group: GroupId) -> Self {
        Self { slot, group }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TrackedStat {
    stat: BannerStat,
    // false for banners only seen through a click outside the membership snapshot
    eligible: bool,
}

/// Cached counters of one (slot, group) pair.
///
/// `total_shows` always equals the sum of the per-banner shows.
#[derive(Debug, Default)]
pub(crate) struct SlotGroupStats {
    total_shows: u64,
    banners: HashMap<BannerId, TrackedStat>,
}

impl SlotGroupStats {
    /// Builds an entry for the given membership. Rows of non-members are ignored and
    /// members without a row start at zero.
    pub fn from_store(members: &[BannerId], rows: &[BannerStatRow]) -> Self {
        let mut banners: HashMap<_, _> = members
            .iter()
            .map(|banner| {
                (
                    *banner,
                    TrackedStat {
                        stat: BannerStat::default(),
                        eligible: true,
                    },
                )
            })
            .collect();

        for row in rows {
            if let Some(tracked) = banners.get_mut(&row.banner) {
                tracked.stat = row.stat;
            }
        }

        let total_shows = banners.values().map(|tracked| tracked.stat.shows).fold(0, u64::saturating_add);

        Self { total_shows, banners }
    }

    pub fn total_shows(&self) -> u64 {
        self.total_shows
    }

    /// Banners that may be selected, in no particular order.
    pub fn candidates(&self) -> impl Iterator<Item = (BannerId, BannerStat)> + '_ {
        self.banners
            .iter()
            .filter(|(_, tracked)| tracked.eligible)
            .map(|(banner, tracked)| (*banner, tracked.stat))
    }

    pub fn record_show(&mut self, banner: BannerId) {
        let tracked = self.banners.entry(banner).or_default();
        tracked.stat.shows = tracked.stat.shows.saturating_add(1);
        self.total_shows = self.total_shows.saturating_add(1);
    }

    pub fn record_click(&mut self, banner: BannerId) {
        let tracked = self.banners.entry(banner).or_default();
        tracked.stat.clicks = tracked.stat.clicks.saturating_add(1);
    }

    pub fn snapshot(&self) -> SlotGroupSnapshot {
        SlotGroupSnapshot {
            total_shows: self.total_shows,
            banners: self.banners.iter().map(|(banner, tracked)| (*banner, tracked.stat)).collect(),
            rotation: self
                .banners
                .iter()
                .filter(|(_, tracked)| tracked.eligible)
                .map(|(banner, _)| *banner)
                .collect(),
        }
    }
}

/// A point-in-time copy of one cache entry.
///
/// Returned by [`Bandit::cached_stats`](crate::Bandit::cached_stats).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotGroupSnapshot {
    total_shows: u64,
    banners: BTreeMap<BannerId, BannerStat>,
    rotation: BTreeSet<BannerId>,
}

impl SlotGroupSnapshot {
    /// Sum of the shows of every tracked banner.
    #[must_use]
    pub fn total_shows(&self) -> u64 {
        self.total_shows
    }

    /// Counters of one banner, if tracked.
    #[must_use]
    pub fn banner(&self, banner: BannerId) -> Option<BannerStat> {
        self.banners.get(&banner).copied()
    }

    /// All tracked banners in ascending id order.
    pub fn banners(&self) -> impl Iterator<Item = (BannerId, BannerStat)> + '_ {
        self.banners.iter().map(|(banner, stat)| (*banner, *stat))
    }

    /// Returns `true` if the banner was a slot member when the entry was loaded.
    ///
    /// Banners that are tracked only because of a click are not in rotation.
    #[must_use]
    pub fn is_in_rotation(&self, banner: BannerId) -> bool {
        self.rotation.contains(&banner)
    }
}

pub(crate) type SharedStats = Arc<RwLock<SlotGroupStats>>;

/// Position of a slot in the invalidation history, captured before a load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Generation {
    slot: u64,
    epoch: u64,
}

#[derive(Debug)]
pub(crate) enum Lookup {
    Hit(SharedStats),
    Miss(Generation),
}

#[derive(Debug)]
pub(crate) enum Publish {
    /// The built entry is now cached.
    Inserted(SharedStats),
    /// Another loader published first; this is its entry.
    Raced(SharedStats),
    /// The slot was invalidated while loading; the built entry was not cached.
    Superseded(SharedStats),
}

impl Publish {
    pub fn into_stats(self) -> SharedStats {
        match self {
            Self::Inserted(stats) | Self::Raced(stats) | Self::Superseded(stats) => stats,
        }
    }
}

/// Outcome of applying a committed store write to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Apply {
    /// The entry the write was issued against is current and was updated.
    Applied,
    /// The entry was replaced or dropped meanwhile. Holds how many entries were dropped.
    Discarded(usize),
}

#[derive(Debug, Default)]
struct Entries {
    stats: HashMap<CacheKey, SharedStats>,
    generations: HashMap<SlotId, u64>,
    epoch: u64,
}

impl Entries {
    fn generation(&self, slot: SlotId) -> Generation {
        Generation {
            slot: self.generations.get(&slot).copied().unwrap_or_default(),
            epoch: self.epoch,
        }
    }

    fn bump(&mut self, slot: SlotId) {
        let generation = self.generations.entry(slot).or_default();
        *generation = generation.wrapping_add(1);
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCache {
    entries: RwLock<Entries>,
}

impl StatsCache {
    pub fn lookup(&self, key: CacheKey) -> Lookup {
        let entries = self.entries.read();
        match entries.stats.get(&key) {
            Some(stats) => Lookup::Hit(Arc::clone(stats)),
            None => Lookup::Miss(entries.generation(key.slot)),
        }
    }

    pub fn get(&self, key: CacheKey) -> Option<SharedStats> {
        self.entries.read().stats.get(&key).map(Arc::clone)
    }

    pub fn publish(&self, key: CacheKey, built: SlotGroupStats, generation: Generation) -> Publish {
        let mut entries = self.entries.write();

        if let Some(existing) = entries.stats.get(&key) {
            return Publish::Raced(Arc::clone(existing));
        }

        let built = Arc::new(RwLock::new(built));
        if entries.generation(key.slot) != generation {
            return Publish::Superseded(built);
        }

        entries.stats.insert(key, Arc::clone(&built));
        Publish::Inserted(built)
    }

    /// Applies `update` to `written` if it is still the cached entry of `key`.
    ///
    /// `written` is the entry observed before the store write, if any. When it is no
    /// longer current, whatever `key` now holds may predate the write: it is dropped and
    /// loads of the slot in flight are superseded.
    pub fn apply(&self, key: CacheKey, written: Option<&SharedStats>, update: impl FnOnce(&mut SlotGroupStats)) -> Apply {
        {
            let entries = self.entries.read();
            if let (Some(written), Some(current)) = (written, entries.stats.get(&key))
                && Arc::ptr_eq(written, current)
            {
                update(&mut written.write());
                return Apply::Applied;
            }
        }

        let mut entries = self.entries.write();
        let dropped = usize::from(entries.stats.remove(&key).is_some());
        entries.bump(key.slot);
        Apply::Discarded(dropped)
    }

    /// Drops every entry of `slot` and returns how many were dropped.
    pub fn invalidate_slot(&self, slot: SlotId) -> usize {
        let mut entries = self.entries.write();
        let before = entries.stats.len();
        entries.stats.retain(|key, _| key.slot != slot);
        entries.bump(slot);

        before - entries.stats.len()
    }

    /// Drops every entry and returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let dropped = entries.stats.len();
        entries.stats.clear();
        entries.generations.clear();
        entries.epoch = entries.epoch.wrapping_add(1);
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.read().stats.len()
    }

    pub fn snapshot(&self, key: CacheKey) -> Option<SlotGroupSnapshot> {
        self.get(key).map(|stats| stats.read().snapshot())
    }
}
