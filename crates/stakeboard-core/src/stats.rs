//! # Aggregate Statistics
//!
//! Derived progress figures for a set of items. Statistics are never stored;
//! they are recomputed from the items on demand.
//!
//! ## Buckets
//!
//! | Bucket         | Definition                                   |
//! |----------------|----------------------------------------------|
//! | `none_count`   | items whose stake is exactly `None`          |
//! | `cumulative[L]`| items whose rank is at least `rank(L)`, L ≠ None |
//! | `overall`      | sum of ranks, out of `item_count * 8`        |
//! | `top_tier`     | items at `Gold`, out of `item_count`         |
//!
//! `None` is deliberately exact rather than cumulative: "at least rank 0"
//! would always equal the full set.
//!
//! Integer arithmetic only. A ratio with a zero denominator reports 0%.

use crate::primitives::MAX_STAKE_RANK;
use crate::{StakeLevel, TrackedItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// PROGRESS RATIO
// =============================================================================

/// A `current / max` ratio with a precomputed integer percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u64,
    pub max: u64,
    /// `current / max` as a percentage, rounded half up. 0 when `max` is 0.
    pub percent: u8,
}

impl Progress {
    #[must_use]
    pub fn new(current: u64, max: u64) -> Self {
        Self {
            current,
            max,
            percent: percent_of(current, max),
        }
    }
}

/// Integer percentage, rounded half up, clamped to 100.
fn percent_of(current: u64, max: u64) -> u8 {
    if max == 0 {
        return 0;
    }
    let scaled = current.saturating_mul(100).saturating_add(max / 2) / max;
    scaled.min(100) as u8
}

// =============================================================================
// AGGREGATE STATS
// =============================================================================

/// Progress summary for a set of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub item_count: usize,
    pub none_count: usize,
    /// Items at or above each applied level, keyed by level.
    pub cumulative: BTreeMap<StakeLevel, usize>,
    pub overall: Progress,
    pub top_tier: Progress,
}

impl AggregateStats {
    /// Stats for an empty item set.
    #[must_use]
    pub fn empty() -> Self {
        compute_stats(std::iter::empty())
    }

    /// Items at or above `level`.
    ///
    /// For `None` this is the full item count; use `none_count` for the
    /// exact-match bucket.
    #[must_use]
    pub fn cumulative(&self, level: StakeLevel) -> usize {
        match level {
            StakeLevel::None => self.item_count,
            _ => self.cumulative.get(&level).copied().unwrap_or(0),
        }
    }

    /// Items at the maximum rank.
    #[must_use]
    pub fn gold_count(&self) -> usize {
        self.cumulative(StakeLevel::Gold)
    }
}

/// Compute statistics in one pass over the items.
///
/// Ranks are histogrammed first, then cumulative buckets are formed as
/// suffix sums from `Gold` downwards.
pub fn compute_stats<'a>(items: impl IntoIterator<Item = &'a TrackedItem>) -> AggregateStats {
    let mut histogram = [0usize; StakeLevel::ALL.len()];
    let mut rank_sum: u64 = 0;

    for item in items {
        let rank = item.rank();
        histogram[usize::from(rank)] += 1;
        rank_sum = rank_sum.saturating_add(u64::from(rank));
    }

    let item_count: usize = histogram.iter().sum();

    let mut cumulative = BTreeMap::new();
    let mut running = 0usize;
    for level in StakeLevel::APPLIED.into_iter().rev() {
        running += histogram[usize::from(level.rank())];
        cumulative.insert(level, running);
    }

    let item_count_u64 = item_count as u64;
    let overall_max = item_count_u64.saturating_mul(u64::from(MAX_STAKE_RANK));
    let gold = histogram[usize::from(StakeLevel::Gold.rank())] as u64;

    AggregateStats {
        item_count,
        none_count: histogram[usize::from(StakeLevel::None.rank())],
        cumulative,
        overall: Progress::new(rank_sum, overall_max),
        top_tier: Progress::new(gold, item_count_u64),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemId;

    fn items(stakes: &[StakeLevel]) -> Vec<TrackedItem> {
        stakes
            .iter()
            .enumerate()
            .map(|(i, s)| TrackedItem::new(ItemId(i as u32), format!("item-{}", i), *s))
            .collect()
    }

    #[test]
    fn empty_set_reports_zero() {
        let stats = AggregateStats::empty();
        assert_eq!(stats.item_count, 0);
        assert_eq!(stats.none_count, 0);
        assert!(stats.cumulative.values().all(|&c| c == 0));
        assert_eq!(stats.overall, Progress::new(0, 0));
        assert_eq!(stats.overall.percent, 0);
        assert_eq!(stats.top_tier.percent, 0);
    }

    #[test]
    fn mixed_board_example() {
        let stats = compute_stats(&items(&[
            StakeLevel::Gold,
            StakeLevel::None,
            StakeLevel::Blue,
        ]));
        assert_eq!(stats.overall.current, 12);
        assert_eq!(stats.overall.max, 24);
        assert_eq!(stats.overall.percent, 50);
        assert_eq!(stats.gold_count(), 1);
        assert_eq!(stats.none_count, 1);
        assert_eq!(stats.top_tier.max, 3);
        assert_eq!(stats.top_tier.percent, 33);
    }

    #[test]
    fn cumulative_counts_at_or_above() {
        let stats = compute_stats(&items(&[
            StakeLevel::White,
            StakeLevel::Green,
            StakeLevel::Green,
            StakeLevel::Orange,
        ]));
        assert_eq!(stats.cumulative(StakeLevel::None), 4);
        assert_eq!(stats.cumulative(StakeLevel::White), 4);
        assert_eq!(stats.cumulative(StakeLevel::Red), 3);
        assert_eq!(stats.cumulative(StakeLevel::Green), 3);
        assert_eq!(stats.cumulative(StakeLevel::Blue), 1);
        assert_eq!(stats.cumulative(StakeLevel::Orange), 1);
        assert_eq!(stats.cumulative(StakeLevel::Gold), 0);
        assert_eq!(stats.none_count, 0);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_of(1, 8), 13); // 12.5
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(5, 5), 100);
        assert_eq!(percent_of(7, 0), 0);
    }

    #[test]
    fn all_gold_is_complete() {
        let stats = compute_stats(&items(&[StakeLevel::Gold; 5]));
        assert_eq!(stats.overall.percent, 100);
        assert_eq!(stats.top_tier.percent, 100);
    }

    #[test]
    fn cumulative_serializes_with_stake_tags() {
        let stats = compute_stats(&items(&[StakeLevel::Red]));
        let json = serde_json::to_value(&stats).expect("serialize");
        assert_eq!(json["cumulative"]["redStake"], 1);
        assert_eq!(json["cumulative"]["greenStake"], 0);
        assert!(json["cumulative"].get("noStake").is_none());
    }
}
