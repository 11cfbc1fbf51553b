// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::BannerId;

/// Show and click counters for one banner within one (slot, group) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BannerStat {
    /// Number of times the banner was shown.
    pub shows: u64,
    /// Number of times the banner was clicked.
    pub clicks: u64,
}

impl BannerStat {
    /// Creates counters with the given values.
    #[must_use]
    pub const fn new(shows: u64, clicks: u64) -> Self {
        Self { shows, clicks }
    }

    /// Returns the click-through rate, or `0.0` when the banner was never shown.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "counters far below 2^52 in practice")]
    pub fn ctr(&self) -> f64 {
        if self.shows == 0 {
            0.0
        } else {
            self.clicks as f64 / self.shows as f64
        }
    }
}

/// One row returned by [`StatsStore::banner_stats`](crate::StatsStore::banner_stats).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BannerStatRow {
    /// The banner the counters belong to.
    pub banner: BannerId,
    /// The counters themselves.
    pub stat: BannerStat,
}

impl BannerStatRow {
    /// Creates a row.
    #[must_use]
    pub const fn new(banner: BannerId, shows: u64, clicks: u64) -> Self {
        Self {
            banner,
            stat: BannerStat::new(shows, clicks),
        }
    }
}
