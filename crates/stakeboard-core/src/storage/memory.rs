//! In-memory `BoardStore`.
//!
//! Volatile. Contents are lost when the store is dropped.

use super::{BoardStore, Credential, UserRecord, UserSummary};
use crate::{BoardData, SaveError, StakeError};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: BTreeMap<String, UserRecord>,
    boards: BTreeMap<String, BoardData>,
    next_board_seq: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }
}

impl BoardStore for MemoryStore {
    fn list_users(&self) -> Result<Vec<UserSummary>, StakeError> {
        Ok(self.users.values().map(UserRecord::summary).collect())
    }

    fn create_user(
        &mut self,
        username: &str,
        password: &Credential,
        display_name: &str,
    ) -> Result<String, StakeError> {
        if self.users.contains_key(username) {
            return Err(StakeError::DuplicateUser(username.to_string()));
        }
        let seq = self.next_board_seq.saturating_add(1);
        let record = UserRecord::create(username, password, display_name, seq)?;
        let board_id = record.board_id.clone();

        self.next_board_seq = seq;
        self.boards.insert(username.to_string(), BoardData::default());
        self.users.insert(username.to_string(), record);
        Ok(board_id)
    }

    fn authenticate(
        &self,
        username: &str,
        password: &Credential,
    ) -> Result<UserSummary, StakeError> {
        match self.record(username) {
            Some(record) if password.matches(&record.password) => Ok(record.summary()),
            _ => Err(StakeError::Unauthorized),
        }
    }

    fn load_state(&self, username: &str) -> Result<BoardData, StakeError> {
        if self.record(username).is_none() {
            return Err(StakeError::NotFound(format!("user '{}'", username)));
        }
        Ok(self.boards.get(username).cloned().unwrap_or_default())
    }

    fn save_state(
        &mut self,
        username: &str,
        credential: &Credential,
        data: &BoardData,
    ) -> Result<(), SaveError> {
        let Some(record) = self.users.get_mut(username) else {
            return Err(SaveError::InvalidCredential);
        };
        if !credential.matches(&record.password) {
            return Err(SaveError::InvalidCredential);
        }
        record.gold_count = u32::try_from(data.gold_count()).unwrap_or(u32::MAX);
        self.boards.insert(username.to_string(), data.clone());
        Ok(())
    }
}
