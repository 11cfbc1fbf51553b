// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage and notification contracts for banner rotation.
//!
//! A rotation engine keeps a set of banners per slot and learns, per audience group,
//! which banner earns the most clicks. This crate defines the seams that engine
//! talks to:
//!
//! - [`StatsStore`] persists slot memberships and the per-(slot, banner, group)
//!   show and click counters.
//! - [`EventNotifier`] receives an [`Occurrence`] for every recorded show and click.
//!
//! Identifiers are plain integers wrapped in [`SlotId`], [`BannerId`] and [`GroupId`]
//! so that they cannot be mixed up at call sites.
//!
//! # Implementing a Store
//!
//! ```
//! use banner_store::{BannerId, BannerStatRow, GroupId, SlotId, StatsStore, StoreError};
//!
//! struct ReadOnly;
//!
//! impl StatsStore for ReadOnly {
//!     async fn add_banner_to_slot(&self, _: SlotId, _: BannerId) -> Result<(), StoreError> {
//!         Err(StoreError::from_message("read-only store"))
//!     }
//!
//!     async fn remove_banner_from_slot(&self, _: SlotId, _: BannerId) -> Result<(), StoreError> {
//!         Err(StoreError::from_message("read-only store"))
//!     }
//!
//!     async fn record_show(&self, _: SlotId, _: BannerId, _: GroupId) -> Result<(), StoreError> {
//!         Err(StoreError::from_message("read-only store"))
//!     }
//!
//!     async fn record_click(&self, _: SlotId, _: BannerId, _: GroupId) -> Result<(), StoreError> {
//!         Err(StoreError::from_message("read-only store"))
//!     }
//!
//!     async fn banner_stats(&self, _: SlotId, _: GroupId) -> Result<Vec<BannerStatRow>, StoreError> {
//!         Ok(Vec::new())
//!     }
//!
//!     async fn banners_for_slot(&self, _: SlotId) -> Result<Vec<BannerId>, StoreError> {
//!         Ok(Vec::new())
//!     }
//! }
//! ```
//!
//! The default `memory` feature provides [`InMemoryStore`]. The `test-util` feature adds
//! the [`testing`] module with a recording, failure-injecting store and notifier.

mod error;
mod ids;
#[cfg(any(feature = "memory", test))]
mod memory;
mod notifier;
mod stats;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use error::{BoxError, NotifyError, StoreError};
#[doc(inline)]
pub use ids::{BannerId, GroupId, SlotId};
#[cfg(any(feature = "memory", test))]
#[doc(inline)]
pub use memory::InMemoryStore;
#[doc(inline)]
pub use notifier::{EventKind, EventNotifier, NoopNotifier, Occurrence};
#[doc(inline)]
pub use stats::{BannerStat, BannerStatRow};
#[doc(inline)]
pub use store::StatsStore;
