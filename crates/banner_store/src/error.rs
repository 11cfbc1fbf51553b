// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// A boxed, thread-safe error used to carry backend-specific failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error reported by a [`StatsStore`](crate::StatsStore).
///
/// Store implementations wrap their native failures with [`StoreError::backend`]. The
/// rotation engine additionally produces [`StoreError::TimedOut`] when a store call exceeds
/// the configured deadline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The store did not answer within the allotted time.
    #[error("store call timed out after {0:?}")]
    TimedOut(Duration),

    /// The store backend reported a failure.
    #[error(transparent)]
    Backend(BoxError),
}

impl StoreError {
    /// Wraps a backend failure.
    pub fn backend(source: impl Into<BoxError>) -> Self {
        Self::Backend(source.into())
    }

    /// Creates a backend failure from a plain message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::Backend(message.into().into())
    }

    /// Creates a timeout failure.
    #[must_use]
    pub const fn timed_out(after: Duration) -> Self {
        Self::TimedOut(after)
    }

    /// Returns `true` if the store call hit its deadline.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

/// An error reported by an [`EventNotifier`](crate::EventNotifier).
///
/// Notification failures never fail the operation that triggered them; the rotation
/// engine only logs them.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct NotifyError(BoxError);

impl NotifyError {
    /// Wraps the underlying delivery failure.
    pub fn from_source(source: impl Into<BoxError>) -> Self {
        Self(source.into())
    }

    /// Creates a delivery failure from a plain message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }
}
