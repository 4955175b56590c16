//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API, and the single
//! place where model errors become HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use stakeboard_core::{
    BoardData, Catalog, ItemId, ItemKind, ProgressionEvent, RunEntry, SaveError, SavedItem,
    StakeError, StakeLevel, TrackedItem, UserSummary,
};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error body: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A model error on its way to becoming an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError(pub StakeError);

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            StakeError::UnknownStakeLevel(_)
            | StakeError::InvalidUsername(_)
            | StakeError::DuplicateUser(_)
            | StakeError::InvalidInput(_)
            | StakeError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            StakeError::Unauthorized => StatusCode::UNAUTHORIZED,
            StakeError::NotFound(_) => StatusCode::NOT_FOUND,
            StakeError::StorageFailure(_) | StakeError::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match &self.0 {
            StakeError::Unauthorized => SaveError::InvalidCredential.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StakeError> for ApiError {
    fn from(err: StakeError) -> Self {
        Self(err)
    }
}

impl From<SaveError> for ApiError {
    fn from(err: SaveError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.message() })).into_response()
    }
}

// =============================================================================
// USERS
// =============================================================================

/// One entry of the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    pub display_name: String,
    pub board_id: String,
    pub gold_count: u32,
}

/// `GET /api/users` response, keyed by username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: BTreeMap<String, UserEntry>,
}

impl From<Vec<UserSummary>> for UsersResponse {
    fn from(summaries: Vec<UserSummary>) -> Self {
        let users = summaries
            .into_iter()
            .map(|s| {
                (
                    s.username,
                    UserEntry {
                        display_name: s.display_name,
                        board_id: s.board_id,
                        gold_count: s.gold_count,
                    },
                )
            })
            .collect();
        Self { users }
    }
}

/// `POST /api/users` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub board_id: String,
}

/// `POST /api/auth` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub display_name: String,
    pub board_id: String,
}

// =============================================================================
// BOARD DATA
// =============================================================================

/// A board as exchanged over HTTP. `decks` and `naneinfRuns` are omitted
/// when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPayload {
    #[serde(default)]
    pub jokers: Vec<SavedItem>,
    #[serde(default)]
    pub recent_games: Vec<ProgressionEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decks: Vec<SavedItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub naneinf_runs: Vec<RunEntry>,
}

impl From<BoardData> for BoardPayload {
    fn from(data: BoardData) -> Self {
        Self {
            jokers: data.jokers,
            recent_games: data.recent_games,
            decks: data.decks,
            naneinf_runs: data.naneinf_runs,
        }
    }
}

impl From<BoardPayload> for BoardData {
    fn from(payload: BoardPayload) -> Self {
        Self {
            jokers: payload.jokers,
            recent_games: payload.recent_games,
            decks: payload.decks,
            naneinf_runs: payload.naneinf_runs,
        }
    }
}

/// `POST /api/users/{username}/data` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub password: String,
    #[serde(flatten)]
    pub board: BoardPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// =============================================================================
// VIEW
// =============================================================================

/// `GET /api/users/{username}/view` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// An item as listed by a board view, with catalog metadata joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub stake_sticker: StakeLevel,
    pub rank: u8,
    pub description: String,
    pub rarity: u8,
    pub collection: u32,
}

impl ViewItem {
    #[must_use]
    pub fn new(item: &TrackedItem, catalog: &Catalog) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            kind: item.kind,
            stake_sticker: item.stake,
            rank: item.rank(),
            description: catalog.description(&item.name).to_string(),
            rarity: catalog.rarity(&item.name),
            collection: catalog.collection_order(&item.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewResponse {
    pub sort: String,
    pub count: usize,
    pub items: Vec<ViewItem>,
}
