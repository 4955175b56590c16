//! # Board
//!
//! One user's tracked state: an item per catalog entry plus a bounded game
//! history. The board is the only owner of item stakes; every mutation goes
//! through one of its methods.
//!
//! ## Variants as configuration
//!
//! History capacity and deck tracking are `BoardConfig` settings. A board
//! without deck tracking simply has no deck items; saved deck stakes are
//! ignored on load.
//!
//! Each board also carries its naneinf run log. Runs are independent of item
//! stakes: recording or deleting one never touches an item.

use crate::history::{self, ApplySummary, History, ProgressionEvent};
use crate::primitives::{
    DEFAULT_HISTORY_CAP, MAX_BOARD_ITEMS, MAX_EVENT_ENTRIES, MAX_ITEM_NAME_LENGTH,
    MAX_RUN_NOTES_LENGTH,
};
use crate::runs::{RunEntry, RunLog, RunScore};
use crate::stats::{AggregateStats, compute_stats};
use crate::view::{SortKey, apply_view};
use crate::{Catalog, ItemId, ItemKind, StakeError, StakeLevel, TrackedItem};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Per-deployment board settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of games kept in history.
    pub history_cap: usize,
    /// Track starting decks alongside jokers.
    pub track_decks: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            track_decks: false,
        }
    }
}

// =============================================================================
// PERSISTED SHAPE
// =============================================================================

/// An item as persisted: only identity and stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub id: ItemId,
    pub name: String,
    pub stake_sticker: StakeLevel,
}

impl From<&TrackedItem> for SavedItem {
    fn from(item: &TrackedItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            stake_sticker: item.stake,
        }
    }
}

/// A board as persisted and exchanged over the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    #[serde(default)]
    pub jokers: Vec<SavedItem>,
    #[serde(default)]
    pub recent_games: Vec<ProgressionEvent>,
    #[serde(default)]
    pub decks: Vec<SavedItem>,
    #[serde(default)]
    pub naneinf_runs: Vec<RunEntry>,
}

impl BoardData {
    /// Count of saved jokers at the top tier. Decks are not counted.
    #[must_use]
    pub fn gold_count(&self) -> usize {
        self.jokers
            .iter()
            .filter(|item| item.stake_sticker.is_top_tier())
            .count()
    }

    /// Check the payload as a whole. Nothing is applied from an invalid
    /// payload.
    pub fn validate(&self) -> Result<(), StakeError> {
        let item_count = self.jokers.len() + self.decks.len();
        if item_count > MAX_BOARD_ITEMS {
            return Err(StakeError::InvalidPayload(format!(
                "{} items exceeds maximum {}",
                item_count, MAX_BOARD_ITEMS
            )));
        }

        let mut ids = BTreeSet::new();
        for item in self.jokers.iter().chain(&self.decks) {
            check_name(&item.name)?;
            if !ids.insert(item.id) {
                return Err(StakeError::InvalidPayload(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }

        for game in &self.recent_games {
            if game.entries.is_empty() {
                return Err(StakeError::InvalidPayload(format!(
                    "game on {} has no entries",
                    game.date
                )));
            }
            if game.entries.len() > MAX_EVENT_ENTRIES {
                return Err(StakeError::InvalidPayload(format!(
                    "game on {} has {} entries, maximum {}",
                    game.date,
                    game.entries.len(),
                    MAX_EVENT_ENTRIES
                )));
            }
            for entry in &game.entries {
                check_name(&entry.item_name)?;
            }
        }

        let mut run_ids = BTreeSet::new();
        for run in &self.naneinf_runs {
            if !run_ids.insert(run.id) {
                return Err(StakeError::InvalidPayload(format!(
                    "duplicate run id {}",
                    run.id
                )));
            }
            if run.notes.len() > MAX_RUN_NOTES_LENGTH {
                return Err(StakeError::InvalidPayload(format!(
                    "run {} notes exceed maximum {} bytes",
                    run.id, MAX_RUN_NOTES_LENGTH
                )));
            }
        }

        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), StakeError> {
    if name.trim().is_empty() {
        return Err(StakeError::InvalidPayload("empty item name".to_string()));
    }
    if name.len() > MAX_ITEM_NAME_LENGTH {
        return Err(StakeError::InvalidPayload(format!(
            "item name length {} exceeds maximum {} bytes",
            name.len(),
            MAX_ITEM_NAME_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// BOARD
// =============================================================================

/// A user's items and game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    items: Vec<TrackedItem>,
    history: History,
    runs: RunLog,
    config: BoardConfig,
}

impl Board {
    /// Fresh board: one item per catalog entry, all at `None`.
    pub fn new(catalog: &Catalog, config: BoardConfig) -> Result<Self, StakeError> {
        let items = catalog
            .entries()
            .iter()
            .filter(|entry| config.track_decks || entry.kind != ItemKind::Deck)
            .map(|entry| TrackedItem::blank(entry.id, entry.name.clone(), entry.kind))
            .collect();

        Ok(Self {
            items,
            history: History::new(config.history_cap)?,
            runs: RunLog::new(),
            config,
        })
    }

    /// Board built from the catalog with saved state applied.
    pub fn from_data(
        catalog: &Catalog,
        config: BoardConfig,
        data: &BoardData,
    ) -> Result<Self, StakeError> {
        let mut board = Self::new(catalog, config)?;
        board.import(data)?;
        Ok(board)
    }

    /// Replace this board's state with `data`.
    ///
    /// The payload is validated first. Then every item is reset to `None`,
    /// saved stakes are applied by id (unknown ids are ignored), and the
    /// history and run log are replaced, each truncated to capacity. Returns
    /// the number of saved items that matched.
    pub fn import(&mut self, data: &BoardData) -> Result<usize, StakeError> {
        data.validate()?;
        let history = History::with_events(self.config.history_cap, data.recent_games.clone())?;

        self.reset_all();
        let mut matched = 0;
        for saved in data.jokers.iter().chain(&data.decks) {
            if let Some(item) = self.items.iter_mut().find(|i| i.id == saved.id) {
                item.stake = saved.stake_sticker;
                matched += 1;
            }
        }
        self.history = history;
        self.runs = RunLog::with_runs(data.naneinf_runs.iter().cloned());

        Ok(matched)
    }

    /// The persisted shape of this board.
    #[must_use]
    pub fn snapshot(&self) -> BoardData {
        BoardData {
            jokers: self.items_of(ItemKind::Joker).map(SavedItem::from).collect(),
            recent_games: self.history.to_vec(),
            decks: self.items_of(ItemKind::Deck).map(SavedItem::from).collect(),
            naneinf_runs: self.runs.to_vec(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[TrackedItem] {
        &self.items
    }

    pub fn items_of(&self, kind: ItemKind) -> impl Iterator<Item = &TrackedItem> {
        self.items.iter().filter(move |i| i.kind == kind)
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&TrackedItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// First item with exactly this name.
    #[must_use]
    pub fn item_by_name(&self, name: &str) -> Option<&TrackedItem> {
        self.items.iter().find(|i| i.name == name)
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn runs(&self) -> &RunLog {
        &self.runs
    }

    #[must_use]
    pub fn config(&self) -> BoardConfig {
        self.config
    }

    /// Set one item's stake.
    pub fn set_stake(&mut self, id: ItemId, stake: StakeLevel) -> Result<(), StakeError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StakeError::NotFound(format!("item {}", id)))?;
        item.stake = stake;
        Ok(())
    }

    /// Clear every stake back to `None`. History is kept.
    pub fn reset_all(&mut self) {
        for item in &mut self.items {
            item.stake = StakeLevel::None;
        }
    }

    /// Apply a game to the items and add it to the head of the history.
    pub fn record_game(&mut self, event: ProgressionEvent) -> Result<ApplySummary, StakeError> {
        if event.entries.is_empty() {
            return Err(StakeError::InvalidInput("game has no entries".to_string()));
        }
        if event.entries.len() > MAX_EVENT_ENTRIES {
            return Err(StakeError::InvalidInput(format!(
                "game has {} entries, maximum {}",
                event.entries.len(),
                MAX_EVENT_ENTRIES
            )));
        }
        let summary = history::apply_event(&mut self.items, &event);
        self.history.record(event);
        Ok(summary)
    }

    /// Move every selected item to `target` and log it as one game.
    pub fn record_bulk(
        &mut self,
        selected: &[ItemId],
        target: StakeLevel,
        date: NaiveDate,
    ) -> Result<ApplySummary, StakeError> {
        let event = history::bulk_progression(&self.items, selected, target, date)?;
        self.record_game(event)
    }

    /// Remove the first game on `date`. Item stakes are left as they are.
    pub fn delete_game(&mut self, date: NaiveDate) -> Result<ProgressionEvent, StakeError> {
        self.history.delete_by_date(date)
    }

    /// Log a naneinf run at the head of the run log and return its id.
    pub fn record_run(
        &mut self,
        date: NaiveDate,
        score: RunScore,
        notes: &str,
    ) -> Result<u64, StakeError> {
        self.runs.record(date, score, notes)
    }

    /// Change a logged run's score and notes.
    pub fn edit_run(&mut self, id: u64, score: RunScore, notes: &str) -> Result<(), StakeError> {
        self.runs.edit(id, score, notes)
    }

    pub fn delete_run(&mut self, id: u64) -> Result<RunEntry, StakeError> {
        self.runs.delete(id)
    }

    /// Statistics over every item on the board.
    #[must_use]
    pub fn stats(&self) -> AggregateStats {
        compute_stats(&self.items)
    }

    /// Statistics over one kind of item.
    #[must_use]
    pub fn stats_for(&self, kind: ItemKind) -> AggregateStats {
        compute_stats(self.items_of(kind))
    }

    /// Jokers at the top tier.
    #[must_use]
    pub fn gold_count(&self) -> usize {
        self.items_of(ItemKind::Joker)
            .filter(|i| i.stake.is_top_tier())
            .count()
    }

    /// Filtered, sorted projection of the items.
    #[must_use]
    pub fn view(&self, catalog: &Catalog, search: &str, sort: SortKey) -> Vec<TrackedItem> {
        apply_view(&self.items, catalog, search, sort)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{ProgressionEntry, parse_date};

    fn board() -> Board {
        Board::new(&Catalog::builtin(), BoardConfig::default()).expect("board")
    }

    fn day(s: &str) -> NaiveDate {
        parse_date(s).expect("date")
    }

    #[test]
    fn new_board_has_jokers_only_by_default() {
        let board = board();
        assert_eq!(board.items().len(), 150);
        assert!(board.items().iter().all(|i| i.stake == StakeLevel::None));
        assert_eq!(board.items_of(ItemKind::Deck).count(), 0);
    }

    #[test]
    fn deck_tracking_adds_decks() {
        let config = BoardConfig {
            track_decks: true,
            ..BoardConfig::default()
        };
        let board = Board::new(&Catalog::builtin(), config).expect("board");
        assert_eq!(board.items().len(), 165);
        assert_eq!(board.stats_for(ItemKind::Deck).item_count, 15);
        assert_eq!(board.stats_for(ItemKind::Joker).item_count, 150);
    }

    #[test]
    fn set_stake_and_reset() {
        let mut board = board();
        board.set_stake(ItemId(0), StakeLevel::Gold).expect("set");
        assert_eq!(board.gold_count(), 1);
        assert!(matches!(
            board.set_stake(ItemId(9999), StakeLevel::Gold),
            Err(StakeError::NotFound(_))
        ));
        board.reset_all();
        assert_eq!(board.gold_count(), 0);
    }

    #[test]
    fn record_game_applies_and_logs() {
        let mut board = board();
        let summary = board
            .record_game(ProgressionEvent::new(
                day("2024-01-01"),
                vec![
                    ProgressionEntry::new("Bull", StakeLevel::Black, StakeLevel::Gold),
                    ProgressionEntry::new("Nobody", StakeLevel::None, StakeLevel::Gold),
                ],
            ))
            .expect("record");
        assert_eq!(summary.applied, 1);
        assert_eq!(board.item_by_name("Bull").map(|i| i.stake), Some(StakeLevel::Gold));
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn record_empty_game_is_rejected() {
        let mut board = board();
        assert!(board
            .record_game(ProgressionEvent::new(day("2024-01-01"), Vec::new()))
            .is_err());
        assert!(board.history().is_empty());
    }

    #[test]
    fn record_bulk_moves_selection() {
        let mut board = board();
        board.set_stake(ItemId(1), StakeLevel::Red).expect("set");
        board
            .record_bulk(&[ItemId(1), ItemId(2)], StakeLevel::Orange, day("2024-04-01"))
            .expect("bulk");
        assert_eq!(board.item(ItemId(1)).map(|i| i.stake), Some(StakeLevel::Orange));
        assert_eq!(board.item(ItemId(2)).map(|i| i.stake), Some(StakeLevel::Orange));
        let logged = board.history().latest().expect("logged");
        assert_eq!(logged.entries[0].from, StakeLevel::Red);
        assert_eq!(logged.entries[1].from, StakeLevel::None);
    }

    #[test]
    fn snapshot_round_trips_through_import() {
        let mut board = board();
        board.set_stake(ItemId(5), StakeLevel::Blue).expect("set");
        board
            .record_game(ProgressionEvent::new(
                day("2024-01-01"),
                vec![ProgressionEntry::new("Joker", StakeLevel::None, StakeLevel::White)],
            ))
            .expect("record");

        let data = board.snapshot();
        let restored =
            Board::from_data(&Catalog::builtin(), BoardConfig::default(), &data).expect("restore");
        assert_eq!(restored, board);
    }

    #[test]
    fn import_ignores_unknown_ids_and_resets_others() {
        let mut board = board();
        board.set_stake(ItemId(3), StakeLevel::Gold).expect("set");

        let data = BoardData {
            jokers: vec![
                SavedItem {
                    id: ItemId(0),
                    name: "Joker".into(),
                    stake_sticker: StakeLevel::Green,
                },
                SavedItem {
                    id: ItemId(4242),
                    name: "Ghost".into(),
                    stake_sticker: StakeLevel::Gold,
                },
            ],
            ..BoardData::default()
        };
        let matched = board.import(&data).expect("import");
        assert_eq!(matched, 1);
        assert_eq!(board.item(ItemId(0)).map(|i| i.stake), Some(StakeLevel::Green));
        assert_eq!(board.item(ItemId(3)).map(|i| i.stake), Some(StakeLevel::None));
    }

    #[test]
    fn invalid_import_changes_nothing() {
        let mut board = board();
        board.set_stake(ItemId(3), StakeLevel::Gold).expect("set");
        let before = board.clone();

        let saved = |name: &str| SavedItem {
            id: ItemId(0),
            name: name.into(),
            stake_sticker: StakeLevel::Red,
        };
        let data = BoardData {
            jokers: vec![saved("Joker"), saved("Joker again")],
            ..BoardData::default()
        };
        assert!(matches!(board.import(&data), Err(StakeError::InvalidPayload(_))));
        assert_eq!(board, before);
    }

    #[test]
    fn import_truncates_history_to_capacity() {
        let config = BoardConfig {
            history_cap: 2,
            ..BoardConfig::default()
        };
        let mut board = Board::new(&Catalog::builtin(), config).expect("board");
        let game = |d: &str| {
            ProgressionEvent::new(
                day(d),
                vec![ProgressionEntry::new("Joker", StakeLevel::None, StakeLevel::Red)],
            )
        };
        let data = BoardData {
            recent_games: vec![game("2024-01-03"), game("2024-01-02"), game("2024-01-01")],
            ..BoardData::default()
        };
        board.import(&data).expect("import");
        assert_eq!(board.history().len(), 2);
    }

    #[test]
    fn import_rejects_games_without_entries() {
        let mut board = board();
        board.set_stake(ItemId(0), StakeLevel::Blue).expect("set");
        let before = board.clone();

        let data = BoardData {
            jokers: vec![SavedItem {
                id: ItemId(0),
                name: "Joker".into(),
                stake_sticker: StakeLevel::Gold,
            }],
            recent_games: vec![ProgressionEvent::new(day("2024-01-01"), Vec::new())],
            ..BoardData::default()
        };
        assert!(matches!(board.import(&data), Err(StakeError::InvalidPayload(_))));
        assert_eq!(board, before);
    }

    #[test]
    fn gold_count_ignores_decks() {
        let config = BoardConfig {
            track_decks: true,
            ..BoardConfig::default()
        };
        let mut board = Board::new(&Catalog::builtin(), config).expect("board");
        board.set_stake(ItemId(0), StakeLevel::Gold).expect("set");
        board.set_stake(ItemId(150), StakeLevel::Gold).expect("set");

        assert_eq!(board.gold_count(), 1);
        assert_eq!(board.snapshot().gold_count(), 1);
        assert_eq!(board.stats().gold_count(), 2);
    }

    #[test]
    fn runs_survive_snapshot_and_leave_stakes_alone() {
        let mut board = board();
        let score: RunScore = "3.984e115".parse().expect("score");
        let id = board
            .record_run(day("2025-09-09"), score, "found Perkeo")
            .expect("run");
        assert!(board.items().iter().all(|i| i.stake == StakeLevel::None));

        let data = board.snapshot();
        assert_eq!(data.naneinf_runs.len(), 1);
        let restored =
            Board::from_data(&Catalog::builtin(), BoardConfig::default(), &data).expect("restore");
        assert_eq!(restored.runs().get(id).map(|r| r.score), Some(score));

        board
            .edit_run(id, "1e200".parse().expect("score"), "")
            .expect("edit");
        board.delete_run(id).expect("delete");
        assert!(board.runs().is_empty());
    }

    #[test]
    fn import_rejects_duplicate_run_ids() {
        let mut board = board();
        let run = RunEntry {
            id: 1,
            date: day("2025-09-09"),
            score: RunScore::new(4, 115),
            notes: String::new(),
        };
        let data = BoardData {
            naneinf_runs: vec![run.clone(), run],
            ..BoardData::default()
        };
        assert!(matches!(board.import(&data), Err(StakeError::InvalidPayload(_))));
    }

    #[test]
    fn delete_game_keeps_stakes() {
        let mut board = board();
        board
            .record_game(ProgressionEvent::new(
                day("2024-06-01"),
                vec![ProgressionEntry::new("Egg", StakeLevel::None, StakeLevel::Red)],
            ))
            .expect("record");
        board.delete_game(day("2024-06-01")).expect("delete");
        assert!(board.history().is_empty());
        assert_eq!(board.item_by_name("Egg").map(|i| i.stake), Some(StakeLevel::Red));
    }

    #[test]
    fn board_data_json_shape() {
        let json = r#"{
            "jokers": [{"id": 0, "name": "Joker", "stakeSticker": "goldStake"}],
            "recentGames": [{"date": "2024-01-01", "jokers": [{"name": "Joker", "from": "redStake", "to": "goldStake"}]}]
        }"#;
        let data: BoardData = serde_json::from_str(json).expect("parse");
        assert_eq!(data.gold_count(), 1);
        assert!(data.decks.is_empty());
        assert_eq!(data.recent_games.len(), 1);
    }

    #[test]
    fn board_data_rejects_unknown_stake_tag() {
        let json = r#"{"jokers": [{"id": 0, "name": "Joker", "stakeSticker": "silverStake"}]}"#;
        assert!(serde_json::from_str::<BoardData>(json).is_err());
    }
}
