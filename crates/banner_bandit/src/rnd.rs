// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;

/// Source of tie-break indices.
///
/// Not cryptographically secure; only used to spread selections evenly across banners
/// that share the best score.
#[derive(Clone, Default)]
pub(crate) enum Rnd {
    #[default]
    Real,

    #[cfg(test)]
    Test(std::sync::Arc<dyn Fn(usize) -> usize + Send + Sync>),
}

impl Debug for Rnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real => write!(f, "Real"),
            #[cfg(test)]
            Self::Test(_) => write!(f, "Test"),
        }
    }
}

impl Rnd {
    #[cfg(test)]
    pub fn new_fixed(index: usize) -> Self {
        Self::Test(std::sync::Arc::new(move |_| index))
    }

    #[cfg(test)]
    pub fn new_function<F>(f: F) -> Self
    where
        F: Fn(usize) -> usize + Send + Sync + 'static,
    {
        Self::Test(std::sync::Arc::new(f))
    }

    /// Returns an index in `0..len`, or `0` when `len` is at most one.
    pub fn next_index(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }

        match self {
            Self::Real => fastrand::usize(..len),
            #[cfg(test)]
            Self::Test(generator) => generator(len) % len,
        }
    }
}
