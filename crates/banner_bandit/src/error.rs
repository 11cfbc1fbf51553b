// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use banner_store::{SlotId, StoreError};

/// The result for fallible operations of the [`Bandit`](crate::Bandit).
pub type Result<T> = std::result::Result<T, Error>;

/// The store call that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StoreOperation {
    /// [`StatsStore::add_banner_to_slot`](banner_store::StatsStore::add_banner_to_slot).
    AddBanner,
    /// [`StatsStore::remove_banner_from_slot`](banner_store::StatsStore::remove_banner_from_slot).
    RemoveBanner,
    /// [`StatsStore::record_show`](banner_store::StatsStore::record_show).
    RecordShow,
    /// [`StatsStore::record_click`](banner_store::StatsStore::record_click).
    RecordClick,
    /// [`StatsStore::banner_stats`](banner_store::StatsStore::banner_stats).
    BannerStats,
    /// [`StatsStore::banners_for_slot`](banner_store::StatsStore::banners_for_slot).
    BannersForSlot,
}

impl StoreOperation {
    /// Returns the name of the store method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddBanner => "add_banner_to_slot",
            Self::RemoveBanner => "remove_banner_from_slot",
            Self::RecordShow => "record_show",
            Self::RecordClick => "record_click",
            Self::BannerStats => "banner_stats",
            Self::BannersForSlot => "banners_for_slot",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned by the [`Bandit`](crate::Bandit).
///
/// Use [`Error::kind`] to tell the cases apart. Neither case is retried by the bandit.
///
/// # Examples
///
/// ```no_run
/// use banner_bandit::{Bandit, ErrorKind};
/// use banner_store::{GroupId, InMemoryStore, SlotId};
/// use tick::Clock;
///
/// # async fn example(clock: Clock) {
/// let bandit = Bandit::builder(InMemoryStore::new(), clock).build();
///
/// let error = bandit.choose_banner(SlotId::new(1), GroupId::new(1)).await.unwrap_err();
/// assert!(matches!(error.kind(), ErrorKind::NoBanners { .. }));
/// # }
/// ```
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] ErrorKind);

/// The cases of [`Error`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The slot has no banners in rotation.
    #[error("no banners in rotation for slot {slot}")]
    NoBanners {
        /// The slot that was asked for a banner.
        slot: SlotId,
    },

    /// A store call failed or timed out. The cache was left untouched.
    #[error("store call {operation} failed")]
    StoreFailure {
        /// The store call that failed.
        operation: StoreOperation,
        /// What the store reported.
        #[source]
        source: StoreError,
    },
}

impl Error {
    pub(crate) fn no_banners(slot: SlotId) -> Self {
        Self(ErrorKind::NoBanners { slot })
    }

    pub(crate) fn store(operation: StoreOperation, source: StoreError) -> Self {
        Self(ErrorKind::StoreFailure { operation, source })
    }

    /// Returns what went wrong.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consumes the error and returns what went wrong.
    #[must_use]
    pub fn into_kind(self) -> ErrorKind {
        self.0
    }

    /// Returns `true` if the slot had no banners in rotation.
    #[must_use]
    pub fn is_no_banners(&self) -> bool {
        matches!(self.0, ErrorKind::NoBanners { .. })
    }

    /// Returns `true` if a store call failed.
    #[must_use]
    pub fn is_store_failure(&self) -> bool {
        matches!(self.0, ErrorKind::StoreFailure { .. })
    }

    /// Returns the failed store call, if any.
    #[must_use]
    pub fn store_operation(&self) -> Option<StoreOperation> {
        match &self.0 {
            ErrorKind::StoreFailure { operation, .. } => Some(*operation),
            ErrorKind::NoBanners { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::time::Duration;

    use super::*;

    #[test]
    fn no_banners_message_names_slot() {
        let error = Error::no_banners(SlotId::new(12));
        assert!(error.is_no_banners());
        assert!(!error.is_store_failure());
        assert_eq!(error.store_operation(), None);
        assert_eq!(error.to_string(), "no banners in rotation for slot 12");
    }

    #[test]
    fn store_failure_keeps_source() {
        let error = Error::store(StoreOperation::RecordShow, StoreError::from_message("connection reset"));
        assert!(error.is_store_failure());
        assert_eq!(error.store_operation(), Some(StoreOperation::RecordShow));
        assert_eq!(error.to_string(), "store call record_show failed");
        assert_eq!(error.source().unwrap().to_string(), "connection reset");
    }

    #[test]
    fn timeout_is_visible_through_kind() {
        let error = Error::store(StoreOperation::BannerStats, StoreError::timed_out(Duration::from_secs(1)));
        assert!(matches!(
            error.into_kind(),
            ErrorKind::StoreFailure { operation: StoreOperation::BannerStats, source } if source.is_timeout()
        ));
    }

    static_assertions::assert_impl_all!(Error: Send, Sync, std::error::Error);
}
