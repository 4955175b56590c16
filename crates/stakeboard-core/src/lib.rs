//! # stakeboard-core
//!
//! The progress model for Stakeboard: stake levels, tracked items, derived
//! statistics, board views, game history and the naneinf run log.
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Is pure and synchronous: no async, no network dependencies
//! - Never logs; callers decide what to report
//! - Reaches persistence only through the `BoardStore` trait
//! - Uses integer arithmetic only for derived figures

// =============================================================================
// MODULES
// =============================================================================

pub mod board;
pub mod catalog;
pub mod history;
pub mod primitives;
pub mod runs;
pub mod session;
pub mod stake;
pub mod stats;
pub mod storage;
pub mod types;
pub mod view;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use stake::StakeLevel;
pub use types::{ItemId, ItemKind, SaveError, StakeError, TrackedItem};

// =============================================================================
// RE-EXPORTS: Model
// =============================================================================

pub use board::{Board, BoardConfig, BoardData, SavedItem};
pub use catalog::{Catalog, CatalogEntry};
pub use history::{
    ApplySummary, History, ProgressionEntry, ProgressionEvent, apply_event, bulk_progression,
    parse_date, parse_entries,
};
pub use runs::{RunEntry, RunLog, RunScore};
pub use session::ClientSession;
pub use stats::{AggregateStats, Progress, compute_stats};
pub use view::{SortKey, apply_view, compare_names};

// =============================================================================
// RE-EXPORTS: Storage
// =============================================================================

pub use storage::{BoardStore, Credential, MemoryStore, RedbStore, UserSummary};
