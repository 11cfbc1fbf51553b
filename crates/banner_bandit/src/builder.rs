// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Configuration of a [`Bandit`].

use std::sync::Arc;
use std::time::Duration;

use anyspawn::Spawner;
use banner_store::{EventNotifier, NoopNotifier, StatsStore};
use tick::Clock;

use crate::Bandit;
use crate::cache::StatsCache;
use crate::rnd::Rnd;
use crate::telemetry::BanditTelemetry;

/// Deadline applied to every store call unless configured otherwise.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_NAME: &str = "bandit";

/// Builder for a [`Bandit`].
///
/// Created by [`Bandit::builder`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use banner_bandit::Bandit;
/// use banner_store::InMemoryStore;
/// use tick::Clock;
///
/// # fn example(clock: Clock) {
/// let bandit = Bandit::builder(InMemoryStore::new(), clock)
///     .name("homepage")
///     .store_timeout(Duration::from_millis(250))
///     .build();
/// # }
/// ```
#[derive(Debug)]
pub struct BanditBuilder<S, N = NoopNotifier> {
    store: S,
    clock: Clock,
    name: &'static str,
    store_timeout: Option<Duration>,
    notifier: Option<N>,
    spawner: Option<Spawner>,
    telemetry: BanditTelemetry,
    rnd: Rnd,
}

impl<S: StatsStore> BanditBuilder<S, NoopNotifier> {
    pub(crate) fn new(store: S, clock: Clock) -> Self {
        Self {
            store,
            clock,
            name: DEFAULT_NAME,
            store_timeout: Some(DEFAULT_STORE_TIMEOUT),
            notifier: None,
            spawner: None,
            telemetry: BanditTelemetry::default(),
            rnd: Rnd::default(),
        }
    }
}

impl<S: StatsStore, N: EventNotifier + 'static> BanditBuilder<S, N> {
    /// Sets the name reported in logs and metrics. Defaults to `"bandit"`.
    #[must_use]
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Sets the deadline of each individual store call.
    ///
    /// A call that misses the deadline fails the operation with a
    /// [`StoreError::TimedOut`](banner_store::StoreError::TimedOut) source.
    #[must_use]
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Lets store calls run without a deadline.
    #[must_use]
    pub fn no_store_timeout(mut self) -> Self {
        self.store_timeout = None;
        self
    }

    /// Sets the notifier that receives every recorded show and click.
    pub fn notifier<M: EventNotifier + 'static>(self, notifier: M) -> BanditBuilder<S, M> {
        BanditBuilder {
            store: self.store,
            clock: self.clock,
            name: self.name,
            store_timeout: self.store_timeout,
            notifier: Some(notifier),
            spawner: self.spawner,
            telemetry: self.telemetry,
            rnd: self.rnd,
        }
    }

    /// Sets where notifications are dispatched. Defaults to the ambient Tokio runtime.
    #[must_use]
    pub fn spawner(mut self, spawner: Spawner) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Sets the telemetry sink. Defaults to recording nothing.
    #[must_use]
    pub fn telemetry(mut self, telemetry: BanditTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn rnd(mut self, rnd: Rnd) -> Self {
        self.rnd = rnd;
        self
    }

    /// Builds the bandit with an empty cache.
    #[must_use]
    pub fn build(self) -> Bandit<S, N> {
        Bandit {
            name: self.name,
            store: self.store,
            notifier: self.notifier.map(Arc::new),
            cache: StatsCache::default(),
            clock: self.clock,
            store_timeout: self.store_timeout,
            spawner: self.spawner.unwrap_or_else(Spawner::new_tokio),
            telemetry: self.telemetry,
            rnd: self.rnd,
        }
    }
}
