//! # Session Module
//!
//! Client-side session state: which board is being viewed, which boards have
//! been loaded, and whether the viewer may edit.
//!
//! - The board cache is flat and keyed by username. Entries are never
//!   evicted; `refresh` reloads one explicitly.
//! - Edit rights belong to exactly one board: the one logged into. Selecting
//!   a different board drops them.
//! - A save rejected with `InvalidCredential` ends the login.

use crate::storage::{BoardStore, Credential, UserSummary};
use crate::{Board, BoardConfig, Catalog, SaveError, StakeError};
use std::collections::BTreeMap;

/// The logged-in user and the password they logged in with.
#[derive(Debug, Clone)]
struct Editor {
    username: String,
    credential: Credential,
}

/// A client's view of the board directory.
#[derive(Debug, Clone)]
pub struct ClientSession {
    catalog: Catalog,
    config: BoardConfig,
    cache: BTreeMap<String, Board>,
    active: Option<String>,
    editor: Option<Editor>,
}

impl ClientSession {
    #[must_use]
    pub fn new(catalog: Catalog, config: BoardConfig) -> Self {
        Self {
            catalog,
            config,
            cache: BTreeMap::new(),
            active: None,
            editor: None,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Username of the board being viewed.
    #[must_use]
    pub fn active_username(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// True when the active board may be modified.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        match (&self.active, &self.editor) {
            (Some(active), Some(editor)) => *active == editor.username,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_cached(&self, username: &str) -> bool {
        self.cache.contains_key(username)
    }

    /// Make `username`'s board the active one, loading it on first use.
    pub fn select_board<S: BoardStore + ?Sized>(
        &mut self,
        store: &S,
        username: &str,
    ) -> Result<&Board, StakeError> {
        if !self.cache.contains_key(username) {
            let board = self.load(store, username)?;
            self.cache.insert(username.to_string(), board);
        }

        if self
            .editor
            .as_ref()
            .is_some_and(|editor| editor.username != username)
        {
            self.editor = None;
        }
        self.active = Some(username.to_string());
        self.board()
    }

    /// Check the password and, on success, grant edit rights for this user's
    /// board and make it active.
    pub fn login<S: BoardStore + ?Sized>(
        &mut self,
        store: &S,
        username: &str,
        password: Credential,
    ) -> Result<UserSummary, StakeError> {
        let summary = store.authenticate(username, &password)?;
        self.select_board(store, username)?;
        self.editor = Some(Editor {
            username: username.to_string(),
            credential: password,
        });
        Ok(summary)
    }

    /// Drop edit rights. The active board stays selected.
    pub fn logout(&mut self) {
        self.editor = None;
    }

    /// The active board.
    pub fn board(&self) -> Result<&Board, StakeError> {
        self.active
            .as_ref()
            .and_then(|username| self.cache.get(username))
            .ok_or_else(|| StakeError::NotFound("no board selected".to_string()))
    }

    /// The active board, for modification. Requires edit rights.
    pub fn board_mut(&mut self) -> Result<&mut Board, StakeError> {
        if !self.can_edit() {
            return Err(StakeError::Unauthorized);
        }
        self.active
            .as_ref()
            .and_then(|username| self.cache.get_mut(username))
            .ok_or_else(|| StakeError::NotFound("no board selected".to_string()))
    }

    /// Persist the active board with the held credential.
    ///
    /// Without edit rights this is `InvalidCredential`. A rejected credential
    /// also ends the login.
    pub fn save<S: BoardStore + ?Sized>(&mut self, store: &mut S) -> Result<(), SaveError> {
        if !self.can_edit() {
            return Err(SaveError::InvalidCredential);
        }
        let Some(editor) = self.editor.as_ref() else {
            return Err(SaveError::InvalidCredential);
        };
        let snapshot = self
            .cache
            .get(&editor.username)
            .map(Board::snapshot)
            .ok_or_else(|| SaveError::StorageFailure("board not loaded".to_string()))?;

        match store.save_state(&editor.username, &editor.credential, &snapshot) {
            Err(SaveError::InvalidCredential) => {
                self.editor = None;
                Err(SaveError::InvalidCredential)
            }
            other => other,
        }
    }

    /// Reload `username`'s board from the store, replacing any cached copy.
    pub fn refresh<S: BoardStore + ?Sized>(
        &mut self,
        store: &S,
        username: &str,
    ) -> Result<&Board, StakeError> {
        let board = self.load(store, username)?;
        self.cache.insert(username.to_string(), board);
        self.cache
            .get(username)
            .ok_or_else(|| StakeError::NotFound(format!("user '{}'", username)))
    }

    fn load<S: BoardStore + ?Sized>(&self, store: &S, username: &str) -> Result<Board, StakeError> {
        let data = store.load_state(username)?;
        Board::from_data(&self.catalog, self.config, &data)
    }
}

// =============================================================================
// TESTS
// =============================================================================
