// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! UCB1 scoring and selection.

use banner_store::{BannerId, BannerStat};

use crate::cache::SlotGroupStats;
use crate::rnd::Rnd;

/// Outcome of a selection round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Selection {
    pub banner: BannerId,
    /// The banner had never been shown in this (slot, group).
    pub explored: bool,
}

/// Scores a banner given the total shows of its (slot, group).
///
/// Unshown banners score `+inf` so that every banner is tried before any is repeated.
#[expect(clippy::cast_precision_loss, reason = "counters far below 2^52 in practice")]
pub(crate) fn score(stat: BannerStat, total_shows: u64) -> f64 {
    if stat.shows == 0 {
        return f64::INFINITY;
    }

    let shows = stat.shows as f64;
    let total = total_shows.max(stat.shows) as f64;
    stat.ctr() + (2.0 * total.ln() / shows).sqrt()
}

/// Picks the best scoring eligible banner, breaking ties uniformly at random.
///
/// Returns `None` only when the entry has no eligible banner.
#[expect(clippy::float_cmp, reason = "ties are exact, most notably between unshown banners")]
pub(crate) fn select(stats: &SlotGroupStats, rnd: &Rnd) -> Option<Selection> {
    let total_shows = stats.total_shows();
    let mut best = f64::NEG_INFINITY;
    let mut leaders: Vec<(BannerId, BannerStat)> = Vec::new();

    for (banner, stat) in stats.candidates() {
        let value = score(stat, total_shows);
        if value > best {
            best = value;
            leaders.clear();
            leaders.push((banner, stat));
        } else if value == best {
            leaders.push((banner, stat));
        }
    }

    // map iteration order must not influence the pick
    leaders.sort_unstable_by_key(|(banner, _)| *banner);

    let (banner, stat) = *leaders.get(rnd.next_index(leaders.len()))?;
    Some(Selection {
        banner,
        explored: stat.shows == 0,
    })
}
