//! # Configuration
//!
//! `AppConfig` is read from an optional TOML file, then environment
//! overrides are applied, then CLI flags (in `cli`).
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! rate_limit = 100            # requests/second, 0 disables
//! cors_origins = "*"          # or "https://a.example,https://b.example"
//!
//! [storage]
//! backend = "redb"            # or "memory"
//! database = "stakeboard.db"
//!
//! [board]
//! history_cap = 50
//! track_decks = false
//! catalog = "catalog.toml"    # optional, builtin catalog otherwise
//! ```
//!
//! ## Environment Variables
//!
//! - `STAKEBOARD_RATE_LIMIT`: overrides `server.rate_limit`
//! - `STAKEBOARD_CORS_ORIGINS`: overrides `server.cors_origins`

use serde::{Deserialize, Serialize};
use stakeboard_core::{
    BoardConfig, BoardStore, Catalog, MemoryStore, RedbStore, StakeError,
    primitives::DEFAULT_HISTORY_CAP,
};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "stakeboard.toml";

/// Maximum config or catalog file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second across all clients. 0 disables rate limiting.
    pub rate_limit: u32,
    /// `*`, or a comma-separated origin list. Localhost only when unset.
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            rate_limit: 100,
            cors_origins: None,
        }
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Disk-backed redb database
    #[default]
    Redb,
    /// Volatile in-memory store
    Memory,
}

impl Backend {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Redb => "redb",
            Backend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Redb,
            database: PathBuf::from("stakeboard.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSection {
    pub history_cap: usize,
    pub track_decks: bool,
    /// TOML catalog replacing the builtin one.
    pub catalog: Option<PathBuf>,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            track_decks: false,
            catalog: None,
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub board: BoardSection,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `stakeboard.toml` in the
    /// working directory is used if present, defaults otherwise. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, StakeError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, StakeError> {
        let source = read_small_file(path)?;
        Self::from_toml_str(&source)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, StakeError> {
        toml::from_str(source)
            .map_err(|e| StakeError::SerializationError(format!("Invalid config: {}", e)))
    }

    /// Apply `STAKEBOARD_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("STAKEBOARD_RATE_LIMIT").ok().as_deref(),
            std::env::var("STAKEBOARD_CORS_ORIGINS").ok(),
        );
    }

    fn apply_overrides(&mut self, rate_limit: Option<&str>, cors_origins: Option<String>) {
        if let Some(rate) = rate_limit {
            match rate.trim().parse() {
                Ok(rate) => self.server.rate_limit = rate,
                Err(_) => tracing::warn!(
                    event = "config_ignored",
                    "STAKEBOARD_RATE_LIMIT '{}' is not a number, keeping {}",
                    rate,
                    self.server.rate_limit
                ),
            }
        }
        if let Some(origins) = cors_origins {
            self.server.cors_origins = Some(origins);
        }
    }

    /// Reject settings the model cannot run with.
    pub fn validate(&self) -> Result<(), StakeError> {
        // History::new owns the capacity rule.
        stakeboard_core::History::new(self.board.history_cap).map(|_| ())
    }

    #[must_use]
    pub fn board_config(&self) -> BoardConfig {
        BoardConfig {
            history_cap: self.board.history_cap,
            track_decks: self.board.track_decks,
        }
    }

    /// The configured catalog, or the builtin one.
    pub fn load_catalog(&self) -> Result<Catalog, StakeError> {
        match &self.board.catalog {
            Some(path) => Catalog::from_toml_str(&read_small_file(path)?),
            None => Ok(Catalog::builtin()),
        }
    }

    /// Open the configured store.
    pub fn open_store(&self) -> Result<Box<dyn BoardStore>, StakeError> {
        match self.storage.backend {
            Backend::Redb => Ok(Box::new(RedbStore::open(&self.storage.database)?)),
            Backend::Memory => Ok(Box::new(MemoryStore::new())),
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn read_small_file(path: &Path) -> Result<String, StakeError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        StakeError::StorageFailure(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(StakeError::InvalidInput(format!(
            "'{}' is {} bytes, maximum {}",
            path.display(),
            metadata.len(),
            MAX_CONFIG_FILE_SIZE
        )));
    }
    std::fs::read_to_string(path).map_err(|e| {
        StakeError::StorageFailure(format!("Cannot read '{}': {}", path.display(), e))
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.storage.backend, Backend::Redb);
        assert_eq!(config.board_config(), BoardConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 8080

            [board]
            history_cap = 10
            track_decks = true
            "#,
        )
        .expect("parse");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.board.history_cap, 10);
        assert!(config.board.track_decks);
        assert_eq!(config.storage.database, PathBuf::from("stakeboard.db"));
    }

    #[test]
    fn memory_backend_parses() {
        let config = AppConfig::from_toml_str("[storage]\nbackend = \"memory\"\n").expect("parse");
        assert_eq!(config.storage.backend, Backend::Memory);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(matches!(
            AppConfig::from_toml_str("[server\nport = 1"),
            Err(StakeError::SerializationError(_))
        ));
    }

    #[test]
    fn zero_history_cap_is_rejected() {
        let config = AppConfig::from_toml_str("[board]\nhistory_cap = 0\n").expect("parse");
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_apply() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("0"), Some("*".to_string()));
        assert_eq!(config.server.rate_limit, 0);
        assert_eq!(config.server.cors_origins.as_deref(), Some("*"));

        config.apply_overrides(Some("lots"), None);
        assert_eq!(config.server.rate_limit, 0);
    }

    #[test]
    fn catalog_file_replaces_builtin() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("catalog.toml");
        std::fs::write(
            &path,
            "[[item]]\nid = 0\nname = \"Homebrew\"\ncollection = 1\n",
        )
        .expect("write");

        let mut config = AppConfig::default();
        config.board.catalog = Some(path);
        let catalog = config.load_catalog().expect("catalog");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Homebrew").is_some());
    }
}
