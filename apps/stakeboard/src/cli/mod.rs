//! # Stakeboard CLI Module
//!
//! This module implements the CLI interface for Stakeboard.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `init` - Initialize new database
//! - `users` - List users
//! - `create-user` - Register a user
//! - `show` - List a board's items, filtered and sorted
//! - `stats` - Show a board's statistics
//! - `set-stake` - Set one item's stake
//! - `add-game` - Log a game
//! - `delete-game` - Remove a logged game
//! - `runs` - List a board's naneinf runs
//! - `add-run` / `edit-run` / `delete-run` - Maintain the naneinf run log
//! - `export` - Export a board to JSON
//! - `import` - Import a board from JSON

mod commands;

use crate::config::{AppConfig, Backend};
use clap::{Parser, Subcommand};
use stakeboard_core::StakeError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Stakeboard - stake progress tracker
///
/// Tracks the highest stake each joker has been won on, per user.
#[derive(Parser, Debug)]
#[command(name = "stakeboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./stakeboard.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the board database (overrides config)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend (overrides config)
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Load the config file and apply global flag overrides.
    pub fn resolve_config(&self) -> Result<AppConfig, StakeError> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(database) = &self.database {
            config.storage.database = database.clone();
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        Ok(config)
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// List users and their gold counts
    Users,

    /// Register a new user
    CreateUser {
        username: String,

        #[arg(long)]
        password: String,

        /// Display name (defaults to the username)
        #[arg(long, default_value = "")]
        display_name: String,
    },

    /// List a board's items
    Show {
        username: String,

        /// Case-insensitive substring of name or description
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort key: name, rarity, stake, collection
        #[arg(long, default_value = "collection")]
        sort: String,
    },

    /// Show a board's statistics
    Stats { username: String },

    /// Set one item's stake
    SetStake {
        username: String,

        #[arg(long)]
        password: String,

        /// Item name
        #[arg(long)]
        item: String,

        /// Stake tag or label, e.g. goldStake or "Gold Stake"
        #[arg(long)]
        stake: String,
    },

    /// Log a game, either as quick entries or as a bulk move
    AddGame {
        username: String,

        #[arg(long)]
        password: String,

        /// Game date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Quick entries: "Name:fromStake:toStake, Name:fromStake:toStake"
        #[arg(long, conflicts_with_all = ["select", "target"])]
        entries: Option<String>,

        /// Comma-separated item names to move together
        #[arg(long, requires = "target")]
        select: Option<String>,

        /// Stake every selected item moves to
        #[arg(long, requires = "select")]
        target: Option<String>,
    },

    /// Remove the first logged game on a date
    DeleteGame {
        username: String,

        #[arg(long)]
        password: String,

        /// Game date, YYYY-MM-DD
        #[arg(long)]
        date: String,
    },

    /// List a board's naneinf runs, newest first
    Runs { username: String },

    /// Log a naneinf run
    AddRun {
        username: String,

        #[arg(long)]
        password: String,

        /// Run date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Final score, e.g. 3.984e115
        #[arg(long)]
        score: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Change a logged run's score and notes
    EditRun {
        username: String,

        #[arg(long)]
        password: String,

        /// Run id, as listed by `runs`
        #[arg(long)]
        id: u64,

        #[arg(long)]
        score: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Remove a logged run
    DeleteRun {
        username: String,

        #[arg(long)]
        password: String,

        /// Run id, as listed by `runs`
        #[arg(long)]
        id: u64,
    },

    /// Export a board as JSON
    Export {
        username: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace a board from a JSON export
    Import {
        username: String,

        #[arg(long)]
        password: String,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), StakeError> {
    let mut config = cli.resolve_config()?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(&config).await
        }
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Users) | None => cmd_users(&config, json_mode),
        Some(Commands::CreateUser {
            username,
            password,
            display_name,
        }) => cmd_create_user(&config, json_mode, &username, &password, &display_name),
        Some(Commands::Show {
            username,
            search,
            sort,
        }) => cmd_show(&config, json_mode, &username, &search, &sort),
        Some(Commands::Stats { username }) => cmd_stats(&config, json_mode, &username),
        Some(Commands::SetStake {
            username,
            password,
            item,
            stake,
        }) => cmd_set_stake(&config, &username, &password, &item, &stake),
        Some(Commands::AddGame {
            username,
            password,
            date,
            entries,
            select,
            target,
        }) => {
            let game = match (entries, select, target) {
                (Some(entries), _, _) => GameInput::Entries(entries),
                (None, Some(select), Some(target)) => GameInput::Bulk { select, target },
                _ => {
                    return Err(StakeError::InvalidInput(
                        "add-game needs --entries, or --select with --target".to_string(),
                    ));
                }
            };
            cmd_add_game(&config, json_mode, &username, &password, date.as_deref(), game)
        }
        Some(Commands::DeleteGame {
            username,
            password,
            date,
        }) => cmd_delete_game(&config, &username, &password, &date),
        Some(Commands::Runs { username }) => cmd_runs(&config, json_mode, &username),
        Some(Commands::AddRun {
            username,
            password,
            date,
            score,
            notes,
        }) => cmd_add_run(&config, &username, &password, date.as_deref(), &score, &notes),
        Some(Commands::EditRun {
            username,
            password,
            id,
            score,
            notes,
        }) => cmd_edit_run(&config, &username, &password, id, &score, &notes),
        Some(Commands::DeleteRun {
            username,
            password,
            id,
        }) => cmd_delete_run(&config, &username, &password, id),
        Some(Commands::Export { username, output }) => cmd_export(&config, &username, &output),
        Some(Commands::Import {
            username,
            password,
            input,
        }) => cmd_import(&config, &username, &password, &input),
    }
}

// =============================================================================
// TESTS
// =============================================================================
