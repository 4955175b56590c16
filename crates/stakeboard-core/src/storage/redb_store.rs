//! # redb-backed Board Storage
//!
//! A disk-backed `BoardStore` using the redb embedded database.
//!
//! ## Tables
//!
//! | Table      | Key        | Value                        |
//! |------------|------------|------------------------------|
//! | `users`    | username   | postcard-encoded `UserRecord` |
//! | `boards`   | username   | postcard-encoded `BoardData`  |
//! | `metadata` | `&str`     | `u64` counters                |
//!
//! A save rewrites the board blob and the user's gold count in one write
//! transaction, so the directory never disagrees with the stored board.

use super::{BoardStore, Credential, UserRecord, UserSummary};
use crate::{BoardData, SaveError, StakeError};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// Table for users: username -> serialized UserRecord bytes
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Table for boards: username -> serialized BoardData bytes
const BOARDS: TableDefinition<&str, &[u8]> = TableDefinition::new("boards");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_BOARD_SEQ: &str = "next_board_seq";

fn storage_err(e: impl std::fmt::Display) -> StakeError {
    StakeError::StorageFailure(e.to_string())
}

/// A disk-backed board store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a board database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StakeError> {
        let db = Database::create(path.as_ref()).map_err(storage_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(storage_err)?;
            let _ = write_txn.open_table(USERS).map_err(storage_err)?;
            let _ = write_txn.open_table(BOARDS).map_err(storage_err)?;
            let _ = write_txn.open_table(METADATA).map_err(storage_err)?;
            write_txn.commit().map_err(storage_err)?;
        }

        Ok(Self { db })
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<(), StakeError> {
        self.db.compact().map_err(storage_err)?;
        Ok(())
    }

    fn read_user(&self, username: &str) -> Result<Option<UserRecord>, StakeError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(USERS).map_err(storage_err)?;
        match table.get(username).map_err(storage_err)? {
            Some(guard) => {
                let record = postcard::from_bytes::<UserRecord>(guard.value())
                    .map_err(|e| StakeError::SerializationError(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn write_board(
        &self,
        mut record: UserRecord,
        data: &BoardData,
    ) -> Result<(), StakeError> {
        record.gold_count = u32::try_from(data.gold_count()).unwrap_or(u32::MAX);
        let record_bytes = postcard::to_allocvec(&record)
            .map_err(|e| StakeError::SerializationError(e.to_string()))?;
        let board_bytes = postcard::to_allocvec(data)
            .map_err(|e| StakeError::SerializationError(e.to_string()))?;

        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut users = write_txn.open_table(USERS).map_err(storage_err)?;
            users
                .insert(record.username.as_str(), record_bytes.as_slice())
                .map_err(storage_err)?;
            let mut boards = write_txn.open_table(BOARDS).map_err(storage_err)?;
            boards
                .insert(record.username.as_str(), board_bytes.as_slice())
                .map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }
}

impl BoardStore for RedbStore {
    fn list_users(&self) -> Result<Vec<UserSummary>, StakeError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(USERS).map_err(storage_err)?;

        // redb iterates keys in byte order, which is username order for
        // ASCII usernames.
        let mut users = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            let record = postcard::from_bytes::<UserRecord>(value.value())
                .map_err(|e| StakeError::SerializationError(e.to_string()))?;
            users.push(record.summary());
        }
        Ok(users)
    }

    fn create_user(
        &mut self,
        username: &str,
        password: &Credential,
        display_name: &str,
    ) -> Result<String, StakeError> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let board_id = {
            let mut users = write_txn.open_table(USERS).map_err(storage_err)?;
            if users.get(username).map_err(storage_err)?.is_some() {
                return Err(StakeError::DuplicateUser(username.to_string()));
            }

            let mut metadata = write_txn.open_table(METADATA).map_err(storage_err)?;
            let seq = metadata
                .get(NEXT_BOARD_SEQ)
                .map_err(storage_err)?
                .map(|v| v.value())
                .unwrap_or(0)
                .saturating_add(1);

            let record = UserRecord::create(username, password, display_name, seq)?;
            let record_bytes = postcard::to_allocvec(&record)
                .map_err(|e| StakeError::SerializationError(e.to_string()))?;
            let board_bytes = postcard::to_allocvec(&BoardData::default())
                .map_err(|e| StakeError::SerializationError(e.to_string()))?;

            users
                .insert(username, record_bytes.as_slice())
                .map_err(storage_err)?;
            let mut boards = write_txn.open_table(BOARDS).map_err(storage_err)?;
            boards
                .insert(username, board_bytes.as_slice())
                .map_err(storage_err)?;
            metadata.insert(NEXT_BOARD_SEQ, seq).map_err(storage_err)?;

            record.board_id
        };
        write_txn.commit().map_err(storage_err)?;
        Ok(board_id)
    }

    fn authenticate(
        &self,
        username: &str,
        password: &Credential,
    ) -> Result<UserSummary, StakeError> {
        match self.read_user(username)? {
            Some(record) if password.matches(&record.password) => Ok(record.summary()),
            _ => Err(StakeError::Unauthorized),
        }
    }

    fn load_state(&self, username: &str) -> Result<BoardData, StakeError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let users = read_txn.open_table(USERS).map_err(storage_err)?;
        if users.get(username).map_err(storage_err)?.is_none() {
            return Err(StakeError::NotFound(format!("user '{}'", username)));
        }

        let boards = read_txn.open_table(BOARDS).map_err(storage_err)?;
        match boards.get(username).map_err(storage_err)? {
            Some(guard) => postcard::from_bytes::<BoardData>(guard.value())
                .map_err(|e| StakeError::SerializationError(e.to_string())),
            None => Ok(BoardData::default()),
        }
    }

    fn save_state(
        &mut self,
        username: &str,
        credential: &Credential,
        data: &BoardData,
    ) -> Result<(), SaveError> {
        let record = self
            .read_user(username)
            .map_err(|e| SaveError::StorageFailure(e.to_string()))?;
        let Some(record) = record else {
            return Err(SaveError::InvalidCredential);
        };
        if !credential.matches(&record.password) {
            return Err(SaveError::InvalidCredential);
        }
        self.write_board(record, data)
            .map_err(|e| SaveError::StorageFailure(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
