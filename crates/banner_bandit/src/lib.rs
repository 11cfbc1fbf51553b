// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Banner rotation with a UCB1 multi-armed bandit.
//!
//! A [`Bandit`] decides which banner of a slot to show to a user of a given audience
//! group. Each (slot, group) pair is an independent bandit problem: banners that were
//! never shown to the group are tried first, after that the banner with the best
//! upper confidence bound on its click-through rate wins.
//!
//! ```text
//! score = clicks / shows + sqrt(2 * ln(total_shows) / shows)
//! ```
//!
//! Counters are kept in a [`StatsStore`](banner_store::StatsStore) and cached in memory
//! per (slot, group). The cache is filled lazily, updated in place after every
//! successful store write and dropped slot-wide when the banners of a slot change.
//!
//! # Quick Start
//!
//! ```no_run
//! use banner_bandit::Bandit;
//! use banner_store::{BannerId, GroupId, InMemoryStore, SlotId};
//! use tick::Clock;
//!
//! # async fn example() -> banner_bandit::Result<()> {
//! let bandit = Bandit::builder(InMemoryStore::new(), Clock::new_tokio()).build();
//!
//! let slot = SlotId::new(1);
//! bandit.add_banner_to_slot(slot, BannerId::new(100)).await?;
//! bandit.add_banner_to_slot(slot, BannerId::new(200)).await?;
//!
//! let banner = bandit.choose_banner(slot, GroupId::new(7)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Events
//!
//! Configure an [`EventNotifier`](banner_store::EventNotifier) with
//! [`BanditBuilder::notifier`] to receive every recorded show and click. Delivery runs on
//! the builder's [`Spawner`](anyspawn::Spawner) and its failures are only logged.
//!
//! # Features
//!
//! - `logs` (default): structured `tracing` events, see [`BanditTelemetry`].
//! - `metrics`: OpenTelemetry counters, histograms and gauges.
//! - `test-util`: enables the test doubles of `banner_store` and the frozen clocks of `tick`.

mod bandit;
mod builder;
mod cache;
mod error;
mod rnd;
mod rotation;
mod telemetry;
mod ucb;

#[doc(inline)]
pub use bandit::Bandit;
#[doc(inline)]
pub use builder::{BanditBuilder, DEFAULT_STORE_TIMEOUT};
#[doc(inline)]
pub use cache::SlotGroupSnapshot;
#[doc(inline)]
pub use error::{Error, ErrorKind, Result, StoreOperation};
#[doc(inline)]
pub use rotation::Rotation;
#[doc(inline)]
pub use telemetry::BanditTelemetry;
