//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Commands that change a board go through a `ClientSession`: log in, edit
//! the active board, save with the same credential.

use crate::api::{self, AppState, BoardPayload, ViewItem};
use crate::config::{AppConfig, Backend};
use stakeboard_core::{
    AggregateStats, Board, BoardData, BoardStore, ClientSession, Credential, ItemId, ItemKind,
    RunScore, SortKey, StakeError, StakeLevel, parse_date, parse_entries,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for import (16 MB).
const MAX_IMPORT_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StakeError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StakeError::StorageFailure(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StakeError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path: it must exist and be a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, StakeError> {
    let canonical = path.canonicalize().map_err(|e| {
        StakeError::StorageFailure(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(StakeError::InvalidInput(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path: its parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, StakeError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        StakeError::StorageFailure(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(StakeError::InvalidInput(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| StakeError::InvalidInput("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn print_json(value: &impl serde::Serialize) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SESSION HELPERS
// =============================================================================

fn new_session(config: &AppConfig) -> Result<ClientSession, StakeError> {
    Ok(ClientSession::new(config.load_catalog()?, config.board_config()))
}

/// Log in as `username`, apply `edit` to their board, then save it.
///
/// Nothing is saved if `edit` fails.
pub fn with_editable_board<T>(
    config: &AppConfig,
    username: &str,
    password: &str,
    edit: impl FnOnce(&mut Board) -> Result<T, StakeError>,
) -> Result<T, StakeError> {
    let mut store = config.open_store()?;
    let mut session = new_session(config)?;

    if let Err(e) = session.login(store.as_ref(), username, Credential::new(password)) {
        tracing::warn!(event = "auth_failed", username = %username);
        return Err(e);
    }

    let result = edit(session.board_mut()?)?;
    session.save(store.as_mut())?;
    Ok(result)
}

fn find_item(board: &Board, name: &str) -> Result<ItemId, StakeError> {
    board
        .item_by_name(name.trim())
        .map(|item| item.id)
        .ok_or_else(|| StakeError::NotFound(format!("item '{}'", name.trim())))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &AppConfig) -> Result<(), StakeError> {
    let store = config.open_store()?;
    let catalog = config.load_catalog()?;

    println!("Stakeboard Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", config.bind_address());
    println!("  Backend:  {}", config.storage.backend.as_str());
    println!("  Database: {:?}", config.storage.database);
    println!("  Catalog:  {} items", catalog.len());
    println!("  History:  {} games", config.board.history_cap);
    println!();
    println!("Endpoints:");
    println!("  GET  /api/users                  - List users");
    println!("  POST /api/users                  - Register a user");
    println!("  POST /api/auth                   - Check a password");
    println!("  GET  /api/users/{{username}}/data  - Saved board");
    println!("  POST /api/users/{{username}}/data  - Save board");
    println!("  GET  /api/users/{{username}}/stats - Statistics");
    println!("  GET  /api/users/{{username}}/view  - Sorted listing");
    println!("  GET  /health                     - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = AppState::new(store, catalog, config.board_config());
    api::run_server(state, &config.server).await
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize new database.
pub fn cmd_init(config: &AppConfig, force: bool) -> Result<(), StakeError> {
    if config.storage.backend == Backend::Memory {
        println!("Memory backend needs no initialization");
        return Ok(());
    }

    let db_path = &config.storage.database;
    if db_path.exists() {
        if !force {
            return Err(StakeError::InvalidInput(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| StakeError::StorageFailure(format!("Remove old database: {}", e)))?;
    }

    config.open_store()?;
    println!("Initialized new redb database at {:?}", db_path);
    Ok(())
}

// =============================================================================
// USER COMMANDS
// =============================================================================

/// List users.
pub fn cmd_users(config: &AppConfig, json_mode: bool) -> Result<(), StakeError> {
    let store = config.open_store()?;
    let users = store.list_users()?;

    if json_mode {
        print_json(&api::UsersResponse::from(users));
        return Ok(());
    }

    if users.is_empty() {
        println!("No users yet. Create one with `stakeboard create-user`.");
        return Ok(());
    }

    println!("{:<16} {:<24} {:<20} {:>5}", "Username", "Display Name", "Board", "Gold");
    for user in users {
        println!(
            "{:<16} {:<24} {:<20} {:>5}",
            user.username, user.display_name, user.board_id, user.gold_count
        );
    }
    Ok(())
}

/// Register a user.
pub fn cmd_create_user(
    config: &AppConfig,
    json_mode: bool,
    username: &str,
    password: &str,
    display_name: &str,
) -> Result<(), StakeError> {
    let mut store = config.open_store()?;
    let board_id = store.create_user(username, &Credential::new(password), display_name)?;
    tracing::info!(event = "user_created", username = %username, board_id = %board_id);

    if json_mode {
        print_json(&api::CreateUserResponse {
            success: true,
            board_id,
        });
    } else {
        println!("Created user '{}' with board {}", username, board_id);
    }
    Ok(())
}

// =============================================================================
// BOARD READ COMMANDS
// =============================================================================

/// List a board's items, filtered and sorted.
pub fn cmd_show(
    config: &AppConfig,
    json_mode: bool,
    username: &str,
    search: &str,
    sort: &str,
) -> Result<(), StakeError> {
    let sort: SortKey = sort.parse()?;
    let store = config.open_store()?;
    let mut session = new_session(config)?;
    session.select_board(store.as_ref(), username)?;
    let board = session.board()?;
    let view = board.view(session.catalog(), search, sort);

    if json_mode {
        let items: Vec<ViewItem> = view
            .iter()
            .map(|item| ViewItem::new(item, session.catalog()))
            .collect();
        print_json(&api::ViewResponse {
            sort: sort.as_str().to_string(),
            count: items.len(),
            items,
        });
        return Ok(());
    }

    println!("{}'s board ({} items, sorted by {})", username, view.len(), sort.as_str());
    println!();
    for item in &view {
        println!("  {:<28} {}", item.name, item.stake);
    }
    Ok(())
}

fn print_stats(title: &str, stats: &AggregateStats) {
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    println!("Items:    {}", stats.item_count);
    println!(
        "Overall:  {}/{} ({}%)",
        stats.overall.current, stats.overall.max, stats.overall.percent
    );
    println!(
        "Gold:     {}/{} ({}%)",
        stats.top_tier.current, stats.top_tier.max, stats.top_tier.percent
    );
    println!();
    println!("  {:<14} {:>5}", StakeLevel::None.label(), stats.none_count);
    for level in StakeLevel::APPLIED {
        println!("  {:<14} {:>5}", level.label(), stats.cumulative(level));
    }
}

/// Show a board's statistics.
pub fn cmd_stats(config: &AppConfig, json_mode: bool, username: &str) -> Result<(), StakeError> {
    let store = config.open_store()?;
    let mut session = new_session(config)?;
    let board = session.select_board(store.as_ref(), username)?;

    let jokers = board.stats_for(ItemKind::Joker);
    let decks = board
        .config()
        .track_decks
        .then(|| board.stats_for(ItemKind::Deck));

    if json_mode {
        print_json(&serde_json::json!({
            "username": username,
            "overall": board.stats(),
            "jokers": jokers,
            "decks": decks,
        }));
        return Ok(());
    }

    print_stats(&format!("{} - Jokers", username), &jokers);
    if let Some(decks) = decks {
        println!();
        print_stats(&format!("{} - Decks", username), &decks);
    }
    Ok(())
}

// =============================================================================
// BOARD EDIT COMMANDS
// =============================================================================

/// Set one item's stake.
pub fn cmd_set_stake(
    config: &AppConfig,
    username: &str,
    password: &str,
    item: &str,
    stake: &str,
) -> Result<(), StakeError> {
    let stake: StakeLevel = stake.parse()?;
    with_editable_board(config, username, password, |board| {
        let id = find_item(board, item)?;
        board.set_stake(id, stake)
    })?;
    println!("{} is now at {}", item.trim(), stake);
    Ok(())
}

/// How a game's transitions are given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameInput {
    /// Quick-entry text, `"Name:from:to, ..."`.
    Entries(String),
    /// Comma-separated names all moving to one target stake.
    Bulk { select: String, target: String },
}

/// Log a game.
pub fn cmd_add_game(
    config: &AppConfig,
    json_mode: bool,
    username: &str,
    password: &str,
    date: Option<&str>,
    game: GameInput,
) -> Result<(), StakeError> {
    let date = match date {
        Some(text) => parse_date(text)?,
        None => chrono::Local::now().date_naive(),
    };

    let summary = with_editable_board(config, username, password, |board| match &game {
        GameInput::Entries(text) => {
            let entries = parse_entries(text)?;
            board.record_game(stakeboard_core::ProgressionEvent::new(date, entries))
        }
        GameInput::Bulk { select, target } => {
            let target: StakeLevel = target.parse()?;
            let ids = select
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(|name| find_item(board, name))
                .collect::<Result<Vec<_>, _>>()?;
            board.record_bulk(&ids, target, date)
        }
    })?;

    if json_mode {
        print_json(&summary);
        return Ok(());
    }

    println!("Logged game on {}: {} applied", date, summary.applied);
    if !summary.skipped.is_empty() {
        println!("Not on this board: {}", summary.skipped.join(", "));
    }
    Ok(())
}

/// Remove the first logged game on a date.
pub fn cmd_delete_game(
    config: &AppConfig,
    username: &str,
    password: &str,
    date: &str,
) -> Result<(), StakeError> {
    let date = parse_date(date)?;
    let removed = with_editable_board(config, username, password, |board| board.delete_game(date))?;
    println!(
        "Deleted game on {} ({} entries)",
        removed.date,
        removed.entries.len()
    );
    Ok(())
}

// =============================================================================
// NANEINF RUN COMMANDS
// =============================================================================

/// List a board's naneinf runs and the best score so far.
pub fn cmd_runs(config: &AppConfig, json_mode: bool, username: &str) -> Result<(), StakeError> {
    let store = config.open_store()?;
    let mut session = new_session(config)?;
    let runs = session.select_board(store.as_ref(), username)?.runs();

    if json_mode {
        print_json(&runs.to_vec());
        return Ok(());
    }

    if runs.is_empty() {
        println!("No naneinf runs logged for {}", username);
        return Ok(());
    }

    println!("{:>4}  {:<10}  {:<24}  Notes", "Id", "Date", "Score");
    for run in runs.iter() {
        println!("{:>4}  {:<10}  {:<24}  {}", run.id, run.date, run.score, run.notes);
    }
    if let Some(best) = runs.best() {
        println!();
        println!(
            "Best: {} ({} orders of magnitude to naneinf)",
            best.score,
            best.score.magnitudes_to_naneinf()
        );
    }
    Ok(())
}

/// Log a naneinf run.
pub fn cmd_add_run(
    config: &AppConfig,
    username: &str,
    password: &str,
    date: Option<&str>,
    score: &str,
    notes: &str,
) -> Result<(), StakeError> {
    let date = match date {
        Some(text) => parse_date(text)?,
        None => chrono::Local::now().date_naive(),
    };
    let score: RunScore = score.parse()?;

    let id = with_editable_board(config, username, password, |board| {
        board.record_run(date, score, notes)
    })?;
    tracing::info!(event = "run_recorded", username = %username, run = id, score = %score);
    println!("Logged run {} on {} with score {}", id, date, score);
    Ok(())
}

/// Change a logged run's score and notes.
pub fn cmd_edit_run(
    config: &AppConfig,
    username: &str,
    password: &str,
    id: u64,
    score: &str,
    notes: &str,
) -> Result<(), StakeError> {
    let score: RunScore = score.parse()?;
    with_editable_board(config, username, password, |board| {
        board.edit_run(id, score, notes)
    })?;
    println!("Updated run {}", id);
    Ok(())
}

/// Remove a logged run.
pub fn cmd_delete_run(
    config: &AppConfig,
    username: &str,
    password: &str,
    id: u64,
) -> Result<(), StakeError> {
    let removed = with_editable_board(config, username, password, |board| board.delete_run(id))?;
    println!("Deleted run {} from {} with score {}", removed.id, removed.date, removed.score);
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Export a saved board as JSON.
pub fn cmd_export(config: &AppConfig, username: &str, output: &Path) -> Result<(), StakeError> {
    let store = config.open_store()?;
    let data = store.load_state(username)?;

    let validated_output = validate_output_path(output)?;
    let json = serde_json::to_string_pretty(&BoardPayload::from(data))
        .map_err(|e| StakeError::SerializationError(e.to_string()))?;
    std::fs::write(&validated_output, json)
        .map_err(|e| StakeError::StorageFailure(format!("Write export: {}", e)))?;

    println!("Exported {}'s board to {:?}", username, validated_output);
    Ok(())
}

/// Replace a board from a JSON export.
pub fn cmd_import(
    config: &AppConfig,
    username: &str,
    password: &str,
    input: &Path,
) -> Result<(), StakeError> {
    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path, MAX_IMPORT_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| StakeError::StorageFailure(format!("Read import: {}", e)))?;
    let payload: BoardPayload = serde_json::from_slice(&contents)
        .map_err(|e| StakeError::InvalidPayload(e.to_string()))?;
    let data = BoardData::from(payload);

    let matched = with_editable_board(config, username, password, |board| board.import(&data))?;
    println!(
        "Imported {} of {} saved items into {}'s board",
        matched,
        data.jokers.len() + data.decks.len(),
        username
    );
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
