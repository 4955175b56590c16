//! # Core Type Definitions
//!
//! This module contains the identity and error types shared by every part of
//! the Stake Progress Model:
//! - Item identifiers and kinds (`ItemId`, `ItemKind`)
//! - The mutable per-item state (`TrackedItem`)
//! - Error types (`StakeError`, `SaveError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where they are used as `BTreeMap` keys

use crate::stake::StakeLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ITEM IDENTIFIERS
// =============================================================================

/// Unique identifier for a tracked item (joker or deck).
///
/// Ids are assigned once at catalog load time and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of collectible an item represents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Joker,
    Deck,
}

impl ItemKind {
    /// Lowercase name used in config files and CLI output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Joker => "joker",
            ItemKind::Deck => "deck",
        }
    }
}

// =============================================================================
// TRACKED ITEM
// =============================================================================

/// One collectible entity and the stake currently applied to it.
///
/// `id`, `name` and `kind` are fixed for the lifetime of the item. Only
/// `stake` changes, and only through explicit board operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub id: ItemId,
    pub name: String,
    pub stake: StakeLevel,
    pub kind: ItemKind,
}

impl TrackedItem {
    /// Create a joker at the given stake.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, stake: StakeLevel) -> Self {
        Self {
            id,
            name: name.into(),
            stake,
            kind: ItemKind::Joker,
        }
    }

    /// Create an item of the given kind with no stake applied.
    #[must_use]
    pub fn blank(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            stake: StakeLevel::None,
            kind,
        }
    }

    /// Rank of the current stake (0..=8).
    #[must_use]
    pub fn rank(&self) -> u8 {
        self.stake.rank()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Stakeboard model.
///
/// - No silent failures
/// - Use `Result<T, StakeError>` for fallible operations
/// - None of these are retried by the model; they surface to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakeError {
    /// A stake tag or label did not name any known level.
    #[error("Unknown stake level: {0}")]
    UnknownStakeLevel(String),

    /// The requested user, item or event does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credential check failed, or the caller lacks edit rights.
    #[error("Unauthorized")]
    Unauthorized,

    /// Username is empty, too long, or not ASCII alphanumeric.
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// A user with this username already exists.
    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    /// An argument to a model operation was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A board payload failed validation and was rejected as a whole.
    #[error("Invalid board data: {0}")]
    InvalidPayload(String),

    /// The storage backend failed.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Failure modes of `BoardStore::save_state`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// The supplied password does not match the stored one.
    #[error("Invalid password")]
    InvalidCredential,

    /// The backend could not persist the board.
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl From<SaveError> for StakeError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::InvalidCredential => StakeError::Unauthorized,
            SaveError::StorageFailure(msg) => StakeError::StorageFailure(msg),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_item_has_no_stake() {
        let item = TrackedItem::blank(ItemId(4), "Red Deck", ItemKind::Deck);
        assert_eq!(item.stake, StakeLevel::None);
        assert_eq!(item.rank(), 0);
        assert_eq!(item.kind, ItemKind::Deck);
    }

    #[test]
    fn item_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ItemKind::Deck).expect("serialize");
        assert_eq!(json, "\"deck\"");
    }

    #[test]
    fn save_error_converts_to_stake_error() {
        assert_eq!(
            StakeError::from(SaveError::InvalidCredential),
            StakeError::Unauthorized
        );
        assert_eq!(
            StakeError::from(SaveError::StorageFailure("disk".into())),
            StakeError::StorageFailure("disk".into())
        );
    }

    #[test]
    fn save_error_message_matches_api_contract() {
        assert_eq!(SaveError::InvalidCredential.to_string(), "Invalid password");
    }
}
