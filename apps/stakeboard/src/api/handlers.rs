//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers. Every handler
//! returns `Result<_, ApiError>`; status mapping lives in `ApiError`.

use super::{
    AppState,
    types::{
        ApiError, AuthRequest, AuthResponse, BoardPayload, CreateUserRequest,
        CreateUserResponse, HealthResponse, SaveRequest, SuccessResponse, UsersResponse, ViewItem,
        ViewQuery, ViewResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    response::IntoResponse,
};
use stakeboard_core::primitives::RUN_LOG_CAP;
use stakeboard_core::{
    AggregateStats, Board, BoardData, BoardStore, Credential, SaveError, SortKey, StakeError,
};

/// Unwrap a JSON body, turning a rejection into a 400 with an error body.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError(StakeError::InvalidPayload(rejection.body_text())))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// USER DIRECTORY
// =============================================================================

/// List every user with their board id and gold count.
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>, ApiError> {
    let store = state.store.read().await;
    let users = store.list_users()?;
    Ok(Json(UsersResponse::from(users)))
}

/// Register a new user with an empty board.
pub async fn create_user_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let request = json_body(body)?;

    let mut store = state.store.write().await;
    let board_id = store.create_user(
        &request.username,
        &Credential::new(request.password),
        &request.display_name,
    )?;
    tracing::info!(event = "user_created", username = %request.username, board_id = %board_id);

    Ok(Json(CreateUserResponse {
        success: true,
        board_id,
    }))
}

/// Check a password.
pub async fn auth_handler(
    State(state): State<AppState>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = json_body(body)?;

    let store = state.store.read().await;
    match store.authenticate(&request.username, &Credential::new(request.password)) {
        Ok(summary) => Ok(Json(AuthResponse {
            success: true,
            display_name: summary.display_name,
            board_id: summary.board_id,
        })),
        Err(e) => {
            tracing::warn!(event = "auth_failed", username = %request.username);
            Err(e.into())
        }
    }
}

// =============================================================================
// BOARD DATA
// =============================================================================

/// The saved board for a user, as stored.
pub async fn get_data_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<BoardPayload>, ApiError> {
    let store = state.store.read().await;
    let data = store.load_state(&username)?;
    Ok(Json(BoardPayload::from(data)))
}

/// Replace a user's saved board.
///
/// The password is checked before the payload, so a bad password is always
/// a 401 whatever the body holds. The payload is then validated as a whole
/// before anything is written. History and runs beyond their capacity are
/// dropped, oldest first.
pub async fn save_data_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let request = json_body(body)?;
    let credential = Credential::new(request.password);

    let mut store = state.store.write().await;
    if store.authenticate(&username, &credential).is_err() {
        tracing::warn!(event = "save_rejected", username = %username);
        return Err(SaveError::InvalidCredential.into());
    }

    let mut data = BoardData::from(request.board);
    data.validate()?;
    data.recent_games.truncate(state.board_config.history_cap);
    data.naneinf_runs.truncate(RUN_LOG_CAP);

    match store.save_state(&username, &credential, &data) {
        Ok(()) => {
            tracing::info!(
                event = "board_saved",
                username = %username,
                gold_count = data.gold_count(),
                runs = data.naneinf_runs.len()
            );
            Ok(Json(SuccessResponse::ok()))
        }
        Err(e) => {
            match &e {
                SaveError::InvalidCredential => {
                    tracing::warn!(event = "save_rejected", username = %username);
                }
                SaveError::StorageFailure(reason) => {
                    tracing::warn!(event = "save_failed", username = %username, reason = %reason);
                }
            }
            Err(e.into())
        }
    }
}

// =============================================================================
// DERIVED VIEWS
// =============================================================================

/// Load a user's board through the model, applying catalog and config.
async fn load_board(state: &AppState, username: &str) -> Result<Board, ApiError> {
    let data = {
        let store = state.store.read().await;
        store.load_state(username)?
    };
    Ok(Board::from_data(&state.catalog, state.board_config, &data)?)
}

/// Aggregate statistics for a user's board.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<AggregateStats>, ApiError> {
    let board = load_board(&state, &username).await?;
    Ok(Json(board.stats()))
}

/// Filtered, sorted item listing for a user's board.
pub async fn view_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewResponse>, ApiError> {
    let sort = match query.sort.as_deref() {
        Some(key) if !key.trim().is_empty() => key.parse::<SortKey>()?,
        _ => SortKey::default(),
    };
    let search = query.search.unwrap_or_default();

    let board = load_board(&state, &username).await?;
    let items: Vec<ViewItem> = board
        .view(&state.catalog, &search, sort)
        .iter()
        .map(|item| ViewItem::new(item, &state.catalog))
        .collect();

    Ok(Json(ViewResponse {
        sort: sort.as_str().to_string(),
        count: items.len(),
        items,
    }))
}
