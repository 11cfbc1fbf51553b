// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The banner rotation engine.

use std::sync::Arc;
use std::time::Duration;

use anyspawn::Spawner;
use banner_store::{BannerId, EventNotifier, GroupId, NoopNotifier, Occurrence, SlotId, StatsStore, StoreError};
use tick::{Clock, FutureExt};

use crate::builder::BanditBuilder;
use crate::cache::{Apply, CacheKey, Lookup, Publish, SharedStats, SlotGroupSnapshot, SlotGroupStats, StatsCache};
use crate::rnd::Rnd;
use crate::telemetry::{BanditActivity, BanditOperation, BanditTelemetry};
use crate::ucb::{self, Selection};
use crate::{Error, Result, StoreOperation};

/// Chooses banners for slots with the UCB1 policy and keeps their statistics.
///
/// Statistics live in a [`StatsStore`]; the bandit caches them per (slot, group) and
/// loads an entry on the first [`choose_banner`](Self::choose_banner) for that pair.
/// Shows and clicks are written to the store first and applied to the cache only after
/// the store accepted them, so the cache never runs ahead of the store. Adding or
/// removing a banner drops every cached entry of the slot.
///
/// Every recorded show and click is handed to the configured [`EventNotifier`] on the
/// configured [`Spawner`] without waiting for it.
///
/// # Examples
///
/// ```no_run
/// use banner_bandit::Bandit;
/// use banner_store::{BannerId, GroupId, InMemoryStore, SlotId};
/// use tick::Clock;
///
/// # async fn example(clock: Clock) -> banner_bandit::Result<()> {
/// let bandit = Bandit::builder(InMemoryStore::new(), clock).build();
/// let (slot, group) = (SlotId::new(1), GroupId::new(1));
///
/// bandit.add_banner_to_slot(slot, BannerId::new(10)).await?;
/// bandit.add_banner_to_slot(slot, BannerId::new(20)).await?;
///
/// let banner = bandit.choose_banner(slot, group).await?;
/// bandit.record_click(slot, banner, group).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bandit<S, N = NoopNotifier> {
    pub(crate) name: &'static str,
    pub(crate) store: S,
    pub(crate) notifier: Option<Arc<N>>,
    pub(crate) cache: StatsCache,
    pub(crate) clock: Clock,
    pub(crate) store_timeout: Option<Duration>,
    pub(crate) spawner: Spawner,
    pub(crate) telemetry: BanditTelemetry,
    pub(crate) rnd: Rnd,
}

impl Bandit<(), NoopNotifier> {
    /// Starts configuring a bandit over `store`.
    ///
    /// The `clock` drives store deadlines and telemetry durations.
    pub fn builder<S: StatsStore>(store: S, clock: Clock) -> BanditBuilder<S> {
        BanditBuilder::new(store, clock)
    }
}

impl<S: StatsStore, N: EventNotifier + 'static> Bandit<S, N> {
    /// Returns the name used in logs and metrics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the clock of this bandit.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Picks a banner to show in `slot` to a user of `group` and records the show.
    ///
    /// Banners that were never shown to the group are picked first; ties are broken at
    /// random.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NoBanners`](crate::ErrorKind::NoBanners) if the slot has no
    /// banners and [`ErrorKind::StoreFailure`](crate::ErrorKind::StoreFailure) if a store
    /// call failed. On error no show is counted and no event is sent.
    pub async fn choose_banner(&self, slot: SlotId, group: GroupId) -> Result<BannerId> {
        let operation = BanditOperation::ChooseBanner;
        let key = CacheKey::new(slot, group);
        let stats = self.load_stats(operation, key).await?;

        let selection = {
            let entry = stats.read();
            ucb::select(&entry, &self.rnd)
        };

        let Some(Selection { banner, explored }) = selection else {
            self.telemetry.record(self.name, operation, BanditActivity::NoBanners, slot, None);
            return Err(Error::no_banners(slot));
        };

        self.call_store(operation, slot, StoreOperation::RecordShow, self.store.record_show(slot, banner, group))
            .await?;

        let activity = if explored {
            BanditActivity::BannerExplored
        } else {
            BanditActivity::BannerExploited
        };
        self.telemetry.record(self.name, operation, activity, slot, None);

        // no await between the store write and the cache update
        let outcome = self.cache.apply(key, Some(&stats), |entry| entry.record_show(banner));
        self.settle(operation, key, outcome, true);
        self.telemetry.record(self.name, operation, BanditActivity::ShowRecorded, slot, None);

        self.dispatch(Occurrence::show(slot, banner, group));
        Ok(banner)
    }

    /// Records a click on `banner` shown in `slot` to a user of `group`.
    ///
    /// The click is applied to the cached entry of the pair if one exists; nothing is
    /// loaded. A click for a banner the entry does not track creates a zeroed record for
    /// it, which does not make the banner eligible for selection. If the entry was
    /// replaced while the click was written, the pair is dropped and reloaded on next use.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreFailure`](crate::ErrorKind::StoreFailure) if the store
    /// rejected the click. The cache is left untouched.
    pub async fn record_click(&self, slot: SlotId, banner: BannerId, group: GroupId) -> Result<()> {
        let operation = BanditOperation::RecordClick;
        let key = CacheKey::new(slot, group);
        let cached = self.cache.get(key);

        self.call_store(operation, slot, StoreOperation::RecordClick, self.store.record_click(slot, banner, group))
            .await?;

        let outcome = self.cache.apply(key, cached.as_ref(), |entry| entry.record_click(banner));
        self.settle(operation, key, outcome, cached.is_some());
        self.telemetry.record(self.name, operation, BanditActivity::ClickRecorded, slot, None);

        self.dispatch(Occurrence::click(slot, banner, group));
        Ok(())
    }

    /// Adds `banner` to the rotation of `slot` and drops the cached entries of the slot.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreFailure`](crate::ErrorKind::StoreFailure) if the store
    /// rejected the change. The cache is left untouched.
    pub async fn add_banner_to_slot(&self, slot: SlotId, banner: BannerId) -> Result<()> {
        let operation = BanditOperation::AddBanner;
        self.call_store(operation, slot, StoreOperation::AddBanner, self.store.add_banner_to_slot(slot, banner))
            .await?;
        self.invalidate(operation, slot);
        Ok(())
    }

    /// Removes `banner` from the rotation of `slot` and drops the cached entries of the slot.
    ///
    /// The banner's statistics stay in the store.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreFailure`](crate::ErrorKind::StoreFailure) if the store
    /// rejected the change. The cache is left untouched.
    pub async fn remove_banner_from_slot(&self, slot: SlotId, banner: BannerId) -> Result<()> {
        let operation = BanditOperation::RemoveBanner;
        self.call_store(
            operation,
            slot,
            StoreOperation::RemoveBanner,
            self.store.remove_banner_from_slot(slot, banner),
        )
        .await?;
        self.invalidate(operation, slot);
        Ok(())
    }

    /// Returns a copy of the cached statistics of (`slot`, `group`), if loaded.
    #[must_use]
    pub fn cached_stats(&self, slot: SlotId, group: GroupId) -> Option<SlotGroupSnapshot> {
        self.cache.snapshot(CacheKey::new(slot, group))
    }

    /// Returns the number of cached (slot, group) entries.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached entry. Entries are reloaded from the store on demand.
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.telemetry.record_cache_size(self.name, 0);
    }

    async fn load_stats(&self, operation: BanditOperation, key: CacheKey) -> Result<SharedStats> {
        let generation = match self.cache.lookup(key) {
            Lookup::Hit(stats) => {
                self.telemetry.record(self.name, operation, BanditActivity::CacheHit, key.slot, None);
                return Ok(stats);
            }
            Lookup::Miss(generation) => generation,
        };
        self.telemetry.record(self.name, operation, BanditActivity::CacheMiss, key.slot, None);

        let stopwatch = self.clock.stopwatch();
        let load = BanditOperation::Load;

        let members = self
            .call_store(load, key.slot, StoreOperation::BannersForSlot, self.store.banners_for_slot(key.slot))
            .await?;
        if members.is_empty() {
            self.telemetry.record(self.name, operation, BanditActivity::NoBanners, key.slot, None);
            return Err(Error::no_banners(key.slot));
        }

        let rows = self
            .call_store(load, key.slot, StoreOperation::BannerStats, self.store.banner_stats(key.slot, key.group))
            .await?;

        let outcome = self.cache.publish(key, SlotGroupStats::from_store(&members, &rows), generation);
        let activity = match &outcome {
            Publish::Inserted(_) => BanditActivity::CacheLoaded,
            Publish::Raced(_) => BanditActivity::CacheLoadRaced,
            Publish::Superseded(_) => BanditActivity::CacheLoadSuperseded,
        };
        self.telemetry.record(self.name, load, activity, key.slot, Some(stopwatch.elapsed()));
        self.telemetry.record_cache_size(self.name, self.cache.len());

        Ok(outcome.into_stats())
    }

    async fn call_store<T>(
        &self,
        operation: BanditOperation,
        slot: SlotId,
        call: StoreOperation,
        work: impl Future<Output = std::result::Result<T, StoreError>>,
    ) -> Result<T> {
        let stopwatch = self.clock.stopwatch();

        let result = match self.store_timeout {
            Some(timeout) => work
                .timeout(&self.clock, timeout)
                .await
                .unwrap_or_else(|_elapsed| Err(StoreError::timed_out(timeout))),
            None => work.await,
        };

        let elapsed = stopwatch.elapsed();
        self.telemetry.record_store_call(self.name, call, elapsed);

        result.map_err(|source| {
            self.telemetry.record(self.name, operation, BanditActivity::StoreError, slot, Some(elapsed));
            Error::store(call, source)
        })
    }

    /// Reports a write that missed the entry it was issued against.
    fn settle(&self, operation: BanditOperation, key: CacheKey, outcome: Apply, was_cached: bool) {
        if let Apply::Discarded(dropped) = outcome
            && (was_cached || dropped > 0)
        {
            self.telemetry.record(self.name, operation, BanditActivity::CacheStale, key.slot, None);
            self.telemetry.record_cache_size(self.name, self.cache.len());
        }
    }

    fn invalidate(&self, operation: BanditOperation, slot: SlotId) {
        self.telemetry.record(self.name, operation, BanditActivity::MembershipChanged, slot, None);

        if self.cache.invalidate_slot(slot) > 0 {
            self.telemetry.record(self.name, operation, BanditActivity::CacheInvalidated, slot, None);
        }
        self.telemetry.record_cache_size(self.name, self.cache.len());
    }

    fn dispatch(&self, occurrence: Occurrence) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let notifier = Arc::clone(notifier);
        let telemetry = self.telemetry.clone();
        let name = self.name;

        self.spawner.spawn(async move {
            if let Err(error) = notifier.notify(occurrence).await {
                telemetry.record_notifier_failure(name, &occurrence, &error);
            }
        });
    }
}
