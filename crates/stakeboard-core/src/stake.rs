//! # Stake Ordering & Lookup
//!
//! The nine completion tiers, their ranks, wire tags and display labels.
//!
//! | Level  | Rank | Tag           | Label          |
//! |--------|------|---------------|----------------|
//! | none   | 0    | `noStake`     | No Stake       |
//! | white  | 1    | `whiteStake`  | White Stake    |
//! | red    | 2    | `redStake`    | Red Stake      |
//! | green  | 3    | `greenStake`  | Green Stake    |
//! | blue   | 4    | `blueStake`   | Blue Stake     |
//! | black  | 5    | `blackStake`  | Black Stake    |
//! | purple | 6    | `purpleStake` | Purple Stake   |
//! | orange | 7    | `orangeStake` | Orange Stake   |
//! | gold   | 8    | `goldStake`   | Gold Stake     |
//!
//! The mapping is total and injective in every direction. Unknown tags are
//! an error, never a default.

use crate::StakeError;
use crate::primitives::MAX_STAKE_RANK;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A completion tier. Ordering follows rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StakeLevel {
    #[default]
    None,
    White,
    Red,
    Green,
    Blue,
    Black,
    Purple,
    Orange,
    Gold,
}

impl StakeLevel {
    /// Every level in rank order.
    pub const ALL: [StakeLevel; 9] = [
        StakeLevel::None,
        StakeLevel::White,
        StakeLevel::Red,
        StakeLevel::Green,
        StakeLevel::Blue,
        StakeLevel::Black,
        StakeLevel::Purple,
        StakeLevel::Orange,
        StakeLevel::Gold,
    ];

    /// Every level above `None`, in rank order.
    pub const APPLIED: [StakeLevel; 8] = [
        StakeLevel::White,
        StakeLevel::Red,
        StakeLevel::Green,
        StakeLevel::Blue,
        StakeLevel::Black,
        StakeLevel::Purple,
        StakeLevel::Orange,
        StakeLevel::Gold,
    ];

    /// Integer rank, 0 for `None` through 8 for `Gold`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Level for a rank. Ranks above 8 are rejected.
    pub fn from_rank(rank: u8) -> Result<Self, StakeError> {
        Self::ALL
            .get(usize::from(rank))
            .copied()
            .ok_or_else(|| StakeError::UnknownStakeLevel(format!("rank {}", rank)))
    }

    /// Wire tag, as persisted in board data.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            StakeLevel::None => "noStake",
            StakeLevel::White => "whiteStake",
            StakeLevel::Red => "redStake",
            StakeLevel::Green => "greenStake",
            StakeLevel::Blue => "blueStake",
            StakeLevel::Black => "blackStake",
            StakeLevel::Purple => "purpleStake",
            StakeLevel::Orange => "orangeStake",
            StakeLevel::Gold => "goldStake",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StakeLevel::None => "No Stake",
            StakeLevel::White => "White Stake",
            StakeLevel::Red => "Red Stake",
            StakeLevel::Green => "Green Stake",
            StakeLevel::Blue => "Blue Stake",
            StakeLevel::Black => "Black Stake",
            StakeLevel::Purple => "Purple Stake",
            StakeLevel::Orange => "Orange Stake",
            StakeLevel::Gold => "Gold Stake",
        }
    }

    /// Exact lookup by wire tag.
    pub fn from_tag(tag: &str) -> Result<Self, StakeError> {
        Self::ALL
            .into_iter()
            .find(|level| level.tag() == tag)
            .ok_or_else(|| StakeError::UnknownStakeLevel(tag.to_string()))
    }

    /// Exact lookup by display label.
    pub fn from_label(label: &str) -> Result<Self, StakeError> {
        Self::ALL
            .into_iter()
            .find(|level| level.label() == label)
            .ok_or_else(|| StakeError::UnknownStakeLevel(label.to_string()))
    }

    /// The next higher level, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_rank(self.rank().checked_add(1)?).ok()
    }

    /// The next lower level, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        Self::from_rank(self.rank().checked_sub(1)?).ok()
    }

    /// True for the maximum rank.
    #[must_use]
    pub const fn is_top_tier(self) -> bool {
        self.rank() == MAX_STAKE_RANK
    }
}

impl std::fmt::Display for StakeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either a wire tag (`goldStake`) or a label (`Gold Stake`).
impl FromStr for StakeLevel {
    type Err = StakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::from_tag(trimmed)
            .or_else(|_| Self::from_label(trimmed))
            .map_err(|_| StakeError::UnknownStakeLevel(trimmed.to_string()))
    }
}

impl Serialize for StakeLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for StakeLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        StakeLevel::from_tag(&tag).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_zero_through_eight() {
        let ranks: Vec<u8> = StakeLevel::ALL.iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, (0..=8).collect::<Vec<u8>>());
    }

    #[test]
    fn labels_follow_title_case_rule() {
        assert_eq!(StakeLevel::None.label(), "No Stake");
        assert_eq!(StakeLevel::Gold.label(), "Gold Stake");
        for level in StakeLevel::APPLIED {
            let color = level.tag().trim_end_matches("Stake");
            let mut chars = color.chars();
            let first = chars.next().map(|c| c.to_ascii_uppercase());
            let expected = format!("{}{} Stake", first.unwrap_or_default(), chars.as_str());
            assert_eq!(level.label(), expected);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            StakeLevel::from_tag("platinumStake"),
            Err(StakeError::UnknownStakeLevel("platinumStake".into()))
        );
        assert!(StakeLevel::from_tag("gold").is_err());
        assert!(StakeLevel::from_tag("GoldStake").is_err());
    }

    #[test]
    fn from_rank_rejects_out_of_range() {
        assert_eq!(StakeLevel::from_rank(8), Ok(StakeLevel::Gold));
        assert!(StakeLevel::from_rank(9).is_err());
    }

    #[test]
    fn from_str_accepts_tag_or_label() {
        assert_eq!("orangeStake".parse::<StakeLevel>(), Ok(StakeLevel::Orange));
        assert_eq!("Orange Stake".parse::<StakeLevel>(), Ok(StakeLevel::Orange));
        assert_eq!(" No Stake ".parse::<StakeLevel>(), Ok(StakeLevel::None));
        assert!("Orange".parse::<StakeLevel>().is_err());
    }

    #[test]
    fn neighbours() {
        assert_eq!(StakeLevel::None.previous(), None);
        assert_eq!(StakeLevel::None.next(), Some(StakeLevel::White));
        assert_eq!(StakeLevel::Gold.next(), None);
        assert_eq!(StakeLevel::Gold.previous(), Some(StakeLevel::Orange));
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&StakeLevel::Purple).expect("serialize");
        assert_eq!(json, "\"purpleStake\"");
        let level: StakeLevel = serde_json::from_str("\"blueStake\"").expect("deserialize");
        assert_eq!(level, StakeLevel::Blue);
        assert!(serde_json::from_str::<StakeLevel>("\"Blue Stake\"").is_err());
    }

    #[test]
    fn only_gold_is_top_tier() {
        let top: Vec<StakeLevel> = StakeLevel::ALL
            .into_iter()
            .filter(|l| l.is_top_tier())
            .collect();
        assert_eq!(top, vec![StakeLevel::Gold]);
    }
}
