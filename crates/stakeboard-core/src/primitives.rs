//! # Model Constants
//!
//! Fixed limits and defaults for the Stake Progress Model.
//!
//! These are compiled into the binary. Values that differ between deployments
//! (history capacity, deck tracking) live in `BoardConfig`; the constants here
//! are only their defaults and hard upper bounds.

/// Rank of the highest stake (`Gold`).
///
/// Overall progress for a board is bounded by `item_count * MAX_STAKE_RANK`.
pub const MAX_STAKE_RANK: u8 = 8;

/// Default number of games kept in a board's history.
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// History capacity used by the compact board variant.
pub const COMPACT_HISTORY_CAP: usize = 10;

/// Upper bound for a configured history capacity.
pub const MAX_HISTORY_CAP: usize = 1000;

/// Number of naneinf runs kept in a board's run log.
pub const RUN_LOG_CAP: usize = 20;

/// Collection ordinal for names missing from the catalog.
///
/// Unknown items sort after every catalogued item in collection order.
pub const UNKNOWN_COLLECTION_ORDER: u32 = 999;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 15;

/// Maximum display name length in characters.
///
/// Longer display names are truncated, not rejected.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 50;

/// Maximum number of items accepted in one saved or imported board.
pub const MAX_BOARD_ITEMS: usize = 10_000;

/// Maximum number of entries in a single progression event.
pub const MAX_EVENT_ENTRIES: usize = 1000;

/// Maximum length of an item name in a payload.
pub const MAX_ITEM_NAME_LENGTH: usize = 256;

/// Maximum length of a naneinf run's notes, in bytes.
pub const MAX_RUN_NOTES_LENGTH: usize = 2000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_caps_are_ordered() {
        const { assert!(COMPACT_HISTORY_CAP < DEFAULT_HISTORY_CAP) };
        const { assert!(DEFAULT_HISTORY_CAP <= MAX_HISTORY_CAP) };
    }

    #[test]
    fn max_rank_is_gold() {
        assert_eq!(MAX_STAKE_RANK, crate::StakeLevel::Gold.rank());
    }
}
