//! # Storage Boundary
//!
//! The model is storage-agnostic. Everything it needs from persistence is the
//! `BoardStore` trait: a user directory plus one `BoardData` blob per user.
//!
//! ## Backends
//!
//! - `MemoryStore`: `BTreeMap`-backed, volatile. Used by tests and
//!   `--backend memory`.
//! - `RedbStore`: disk-backed ACID storage using redb.
//!
//! ## Semantics
//!
//! - Passwords are compared as plaintext, in constant time.
//! - A failed save is reported, never retried.
//! - There is no versioning: concurrent saves to one board are last write
//!   wins.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::primitives::{MAX_DISPLAY_NAME_LENGTH, MAX_USERNAME_LENGTH};
use crate::{BoardData, SaveError, StakeError};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

// =============================================================================
// CREDENTIAL
// =============================================================================

/// A password supplied by a client.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a stored password.
    ///
    /// Both sides are padded to the same length so the comparison always
    /// runs over the same number of bytes.
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        let provided = self.0.as_bytes();
        let expected = stored.as_bytes();

        let max_len = provided.len().max(expected.len());
        let mut padded_provided = vec![0u8; max_len];
        let mut padded_expected = vec![0u8; max_len];
        padded_provided[..provided.len()].copy_from_slice(provided);
        padded_expected[..expected.len()].copy_from_slice(expected);

        let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
        bytes_match && provided.len() == expected.len()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

// =============================================================================
// USER RECORDS
// =============================================================================

/// Public view of a user, as listed in the board directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub display_name: String,
    pub board_id: String,
    pub gold_count: u32,
}

/// A user as stored by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct UserRecord {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub board_id: String,
    pub gold_count: u32,
}

impl UserRecord {
    /// Validate inputs and build the record for a new user.
    pub fn create(
        username: &str,
        password: &Credential,
        display_name: &str,
        board_seq: u64,
    ) -> Result<Self, StakeError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(StakeError::InvalidInput("password is required".to_string()));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.as_str().to_string(),
            display_name: normalize_display_name(display_name, username),
            board_id: format!("{}-{}", username.to_ascii_lowercase(), board_seq),
            gold_count: 0,
        })
    }

    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            board_id: self.board_id.clone(),
            gold_count: self.gold_count,
        }
    }
}

/// Usernames are 1 to 15 ASCII letters or digits.
pub fn validate_username(username: &str) -> Result<(), StakeError> {
    if username.is_empty() {
        return Err(StakeError::InvalidUsername("username is required".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(StakeError::InvalidUsername(format!(
            "'{}' is longer than {} characters",
            username, MAX_USERNAME_LENGTH
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StakeError::InvalidUsername(format!(
            "'{}' must be alphanumeric",
            username
        )));
    }
    Ok(())
}

/// Trimmed display name, falling back to the username, capped in length.
#[must_use]
pub fn normalize_display_name(display_name: &str, username: &str) -> String {
    let trimmed = display_name.trim();
    let name = if trimmed.is_empty() { username } else { trimmed };
    name.chars().take(MAX_DISPLAY_NAME_LENGTH).collect()
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Persistence for user directories and boards.
///
/// Implementations must be `Send + Sync` so the server can share one behind
/// a lock.
pub trait BoardStore: Send + Sync {
    /// Every user, ordered by username.
    fn list_users(&self) -> Result<Vec<UserSummary>, StakeError>;

    /// Register a user with an empty board. Returns the new board id.
    fn create_user(
        &mut self,
        username: &str,
        password: &Credential,
        display_name: &str,
    ) -> Result<String, StakeError>;

    /// Check a password. Unknown users and wrong passwords are both
    /// `Unauthorized`.
    fn authenticate(&self, username: &str, password: &Credential)
    -> Result<UserSummary, StakeError>;

    /// The saved board for `username`, or `NotFound`.
    fn load_state(&self, username: &str) -> Result<BoardData, StakeError>;

    /// Replace the saved board for `username` and refresh its gold count.
    ///
    /// Unknown users and wrong passwords are both `InvalidCredential`.
    fn save_state(
        &mut self,
        username: &str,
        credential: &Credential,
        data: &BoardData,
    ) -> Result<(), SaveError>;
}

impl<S: BoardStore + ?Sized> BoardStore for Box<S> {
    fn list_users(&self) -> Result<Vec<UserSummary>, StakeError> {
        (**self).list_users()
    }

    fn create_user(
        &mut self,
        username: &str,
        password: &Credential,
        display_name: &str,
    ) -> Result<String, StakeError> {
        (**self).create_user(username, password, display_name)
    }

    fn authenticate(
        &self,
        username: &str,
        password: &Credential,
    ) -> Result<UserSummary, StakeError> {
        (**self).authenticate(username, password)
    }

    fn load_state(&self, username: &str) -> Result<BoardData, StakeError> {
        (**self).load_state(username)
    }

    fn save_state(
        &mut self,
        username: &str,
        credential: &Credential,
        data: &BoardData,
    ) -> Result<(), SaveError> {
        (**self).save_state(username, credential, data)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_matches_exactly() {
        let credential = Credential::new("hunter2");
        assert!(credential.matches("hunter2"));
        assert!(!credential.matches("hunter"));
        assert!(!credential.matches("hunter22"));
        assert!(!credential.matches(""));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let rendered = format!("{:?}", Credential::new("secret"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("alice99").is_ok());
        assert!(validate_username("abcdefghijklmno").is_ok());
        assert!(validate_username("abcdefghijklmnop").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("émile").is_err());
    }

    #[test]
    fn display_name_defaults_and_caps() {
        assert_eq!(normalize_display_name("  ", "alice"), "alice");
        assert_eq!(normalize_display_name(" Alice ", "alice"), "Alice");
        let long = "x".repeat(80);
        assert_eq!(normalize_display_name(&long, "alice").len(), MAX_DISPLAY_NAME_LENGTH);
    }

    #[test]
    fn record_requires_password() {
        assert!(matches!(
            UserRecord::create("alice", &Credential::new(""), "", 1),
            Err(StakeError::InvalidInput(_))
        ));
        let record = UserRecord::create("Alice", &Credential::new("pw"), "", 7).expect("record");
        assert_eq!(record.board_id, "alice-7");
        assert_eq!(record.display_name, "Alice");
    }
}
