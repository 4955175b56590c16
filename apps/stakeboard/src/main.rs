//! # Stakeboard - stake progress tracker
//!
//! The main binary for Stakeboard.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for board operations
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  apps/stakeboard (THE BINARY)               │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌────────────────┐  │
//! │  │   CLI       │    │   HTTP API  │    │  AppConfig     │  │
//! │  │  (clap)     │    │   (axum)    │    │  (toml + env)  │  │
//! │  └──────┬──────┘    └──────┬──────┘    └───────┬────────┘  │
//! │         │                  │                   │           │
//! │         └──────────────────┼───────────────────┘           │
//! │                            ▼                               │
//! │                  ┌──────────────────┐                      │
//! │                  │ stakeboard-core  │                      │
//! │                  │   (THE MODEL)    │                      │
//! │                  └──────────────────┘                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! stakeboard server --host 0.0.0.0 --port 3000
//!
//! # CLI operations
//! stakeboard create-user amy --password secret
//! stakeboard add-game amy --password secret --entries "Joker:noStake:redStake"
//! stakeboard stats amy
//! ```

use clap::Parser;
use stakeboard::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing: STAKEBOARD_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("STAKEBOARD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stakeboard=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Banner only for the long-running server, and only in text mode
    if !cli.quiet && !cli.json_mode && matches!(cli.command, Some(cli::Commands::Server { .. })) {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Stakeboard startup banner.
fn print_banner() {
    println!(
        r#"
  ╔═╗╔╦╗╔═╗╦╔═╔═╗╔╗ ╔═╗╔═╗╦═╗╔╦╗
  ╚═╗ ║ ╠═╣╠╩╗║╣ ╠╩╗║ ║╠═╣╠╦╝ ║║
  ╚═╝ ╩ ╩ ╩╩ ╩╚═╝╚═╝╚═╝╩ ╩╩╚══╩╝

  Stake Progress Tracker v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
