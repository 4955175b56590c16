//! # Progression Events & History
//!
//! A progression event ("game") records stake transitions for a set of items
//! on one date. Applying an event sets each named item to the event's `to`
//! stake. A board keeps a bounded history of events, most recent first.
//!
//! ## Leniency
//!
//! - An entry's `from` stake is recorded but never checked against the
//!   item's actual stake. `to` is authoritative.
//! - Entries naming an item that does not exist are skipped, not rejected.
//! - Deleting by date removes only the first event with that date.

use crate::primitives::{MAX_EVENT_ENTRIES, MAX_HISTORY_CAP};
use crate::{ItemId, StakeError, StakeLevel, TrackedItem};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// =============================================================================
// EVENT TYPES
// =============================================================================

/// One item's stake transition within an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionEntry {
    #[serde(rename = "name")]
    pub item_name: String,
    pub from: StakeLevel,
    pub to: StakeLevel,
}

impl ProgressionEntry {
    #[must_use]
    pub fn new(item_name: impl Into<String>, from: StakeLevel, to: StakeLevel) -> Self {
        Self {
            item_name: item_name.into(),
            from,
            to,
        }
    }
}

/// A logged game: a date and the transitions it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionEvent {
    pub date: NaiveDate,
    #[serde(rename = "jokers")]
    pub entries: Vec<ProgressionEntry>,
}

impl ProgressionEvent {
    #[must_use]
    pub fn new(date: NaiveDate, entries: Vec<ProgressionEntry>) -> Self {
        Self { date, entries }
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate, StakeError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| StakeError::InvalidInput(format!("invalid date '{}', expected YYYY-MM-DD", text)))
}

// =============================================================================
// EVENT APPLICATION
// =============================================================================

/// Outcome of applying an event to a set of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    /// Entries that matched an item and were applied.
    pub applied: usize,
    /// Names of entries that matched no item, in entry order.
    pub skipped: Vec<String>,
}

/// Apply `event` to `items`, matching entries to items by exact name.
///
/// The first item with a matching name takes the entry's `to` stake,
/// whatever its current stake. Unmatched entries are reported in the
/// summary and otherwise ignored.
pub fn apply_event(items: &mut [TrackedItem], event: &ProgressionEvent) -> ApplySummary {
    let mut summary = ApplySummary::default();

    for entry in &event.entries {
        match items.iter_mut().find(|item| item.name == entry.item_name) {
            Some(item) => {
                item.stake = entry.to;
                summary.applied += 1;
            }
            None => summary.skipped.push(entry.item_name.clone()),
        }
    }

    summary
}

/// Build a game-mode event moving every selected item to `target`.
///
/// Each entry's `from` is the item's current stake. The items themselves are
/// not modified; apply the returned event to commit it.
pub fn bulk_progression(
    items: &[TrackedItem],
    selected: &[ItemId],
    target: StakeLevel,
    date: NaiveDate,
) -> Result<ProgressionEvent, StakeError> {
    if selected.is_empty() {
        return Err(StakeError::InvalidInput("no items selected".to_string()));
    }
    if selected.len() > MAX_EVENT_ENTRIES {
        return Err(StakeError::InvalidInput(format!(
            "{} items selected, at most {} allowed",
            selected.len(),
            MAX_EVENT_ENTRIES
        )));
    }

    let entries = selected
        .iter()
        .map(|id| {
            items
                .iter()
                .find(|item| item.id == *id)
                .map(|item| ProgressionEntry::new(item.name.clone(), item.stake, target))
                .ok_or_else(|| StakeError::NotFound(format!("item {}", id)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProgressionEvent::new(date, entries))
}

/// Parse the quick-entry format `"Name:from:to, Name:from:to"`.
///
/// Segments that do not split into exactly three parts are skipped. Stakes
/// may be tags or labels. An unknown stake rejects the whole input, as does
/// an input with no usable segment.
pub fn parse_entries(text: &str) -> Result<Vec<ProgressionEntry>, StakeError> {
    let mut entries = Vec::new();

    for segment in text.split(',') {
        let parts: Vec<&str> = segment.split(':').map(str::trim).collect();
        let [name, from, to] = parts.as_slice() else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        entries.push(ProgressionEntry::new(*name, from.parse()?, to.parse()?));
    }

    if entries.is_empty() {
        return Err(StakeError::InvalidInput(
            "no valid entries, expected \"Name:fromStake:toStake\"".to_string(),
        ));
    }
    if entries.len() > MAX_EVENT_ENTRIES {
        return Err(StakeError::InvalidInput(format!(
            "{} entries, at most {} allowed",
            entries.len(),
            MAX_EVENT_ENTRIES
        )));
    }
    Ok(entries)
}

// =============================================================================
// BOUNDED HISTORY
// =============================================================================

/// Most-recent-first list of events with a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    events: VecDeque<ProgressionEvent>,
    capacity: usize,
}

impl History {
    /// Empty history holding at most `capacity` events.
    pub fn new(capacity: usize) -> Result<Self, StakeError> {
        if capacity == 0 || capacity > MAX_HISTORY_CAP {
            return Err(StakeError::InvalidInput(format!(
                "history capacity must be between 1 and {}, got {}",
                MAX_HISTORY_CAP, capacity
            )));
        }
        Ok(Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// History seeded from stored events (most recent first), truncated to
    /// `capacity`.
    pub fn with_events(
        capacity: usize,
        events: impl IntoIterator<Item = ProgressionEvent>,
    ) -> Result<Self, StakeError> {
        let mut history = Self::new(capacity)?;
        history.events.extend(events.into_iter().take(capacity));
        Ok(history)
    }

    /// Insert `event` at the head, dropping the oldest beyond capacity.
    pub fn record(&mut self, event: ProgressionEvent) {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    /// Remove the first event dated `date`.
    pub fn delete_by_date(&mut self, date: NaiveDate) -> Result<ProgressionEvent, StakeError> {
        let index = self
            .events
            .iter()
            .position(|event| event.date == date)
            .ok_or_else(|| StakeError::NotFound(format!("game on {}", date)))?;
        self.events
            .remove(index)
            .ok_or_else(|| StakeError::NotFound(format!("game on {}", date)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProgressionEvent> {
        self.events.iter()
    }

    /// The most recent event.
    #[must_use]
    pub fn latest(&self) -> Option<&ProgressionEvent> {
        self.events.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events as a `Vec`, most recent first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ProgressionEvent> {
        self.events.iter().cloned().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).expect("date")
    }

    fn event(day: &str) -> ProgressionEvent {
        ProgressionEvent::new(
            date(day),
            vec![ProgressionEntry::new("A", StakeLevel::None, StakeLevel::White)],
        )
    }

    fn items() -> Vec<TrackedItem> {
        vec![
            TrackedItem::new(ItemId(0), "A", StakeLevel::Purple),
            TrackedItem::new(ItemId(1), "B", StakeLevel::None),
        ]
    }

    #[test]
    fn apply_sets_to_stake_regardless_of_from() {
        let mut items = items();
        let event = ProgressionEvent::new(
            date("2024-01-01"),
            vec![ProgressionEntry::new("A", StakeLevel::Red, StakeLevel::Gold)],
        );
        let summary = apply_event(&mut items, &event);
        assert_eq!(items[0].stake, StakeLevel::Gold);
        assert_eq!(items[1].stake, StakeLevel::None);
        assert_eq!(summary.applied, 1);
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn apply_can_lower_a_stake() {
        let mut items = items();
        let event = ProgressionEvent::new(
            date("2024-01-02"),
            vec![ProgressionEntry::new("A", StakeLevel::Purple, StakeLevel::White)],
        );
        apply_event(&mut items, &event);
        assert_eq!(items[0].stake, StakeLevel::White);
    }

    #[test]
    fn unmatched_entries_are_skipped() {
        let mut items = items();
        let event = ProgressionEvent::new(
            date("2024-01-03"),
            vec![
                ProgressionEntry::new("Missing", StakeLevel::None, StakeLevel::Gold),
                ProgressionEntry::new("B", StakeLevel::None, StakeLevel::Blue),
            ],
        );
        let summary = apply_event(&mut items, &event);
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.skipped, vec!["Missing".to_string()]);
        assert_eq!(items[0].stake, StakeLevel::Purple);
        assert_eq!(items[1].stake, StakeLevel::Blue);
    }

    #[test]
    fn history_drops_oldest_beyond_capacity() {
        let mut history = History::new(2).expect("history");
        history.record(event("2024-01-01"));
        history.record(event("2024-01-02"));
        history.record(event("2024-01-03"));

        let dates: Vec<NaiveDate> = history.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date("2024-01-03"), date("2024-01-02")]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn history_rejects_zero_capacity() {
        assert!(History::new(0).is_err());
        assert!(History::new(MAX_HISTORY_CAP + 1).is_err());
    }

    #[test]
    fn with_events_truncates() {
        let history = History::with_events(
            2,
            vec![event("2024-03-03"), event("2024-03-02"), event("2024-03-01")],
        )
        .expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|e| e.date), Some(date("2024-03-03")));
    }

    #[test]
    fn delete_removes_only_first_match() {
        let mut history = History::new(10).expect("history");
        let mut older = event("2024-05-05");
        older.entries[0].item_name = "older".into();
        history.record(older);
        history.record(event("2024-05-06"));
        history.record(event("2024-05-05"));

        let removed = history.delete_by_date(date("2024-05-05")).expect("delete");
        assert_eq!(removed.entries[0].item_name, "A");
        assert_eq!(history.len(), 2);
        assert!(history.iter().any(|e| e.entries[0].item_name == "older"));
    }

    #[test]
    fn delete_missing_date_is_not_found() {
        let mut history = History::new(10).expect("history");
        history.record(event("2024-05-05"));
        assert!(matches!(
            history.delete_by_date(date("2023-01-01")),
            Err(StakeError::NotFound(_))
        ));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn parse_quick_entries() {
        let entries =
            parse_entries("Bull:blackStake:goldStake, Baseball Card:purpleStake:Gold Stake")
                .expect("parse");
        assert_eq!(
            entries,
            vec![
                ProgressionEntry::new("Bull", StakeLevel::Black, StakeLevel::Gold),
                ProgressionEntry::new("Baseball Card", StakeLevel::Purple, StakeLevel::Gold),
            ]
        );
    }

    #[test]
    fn parse_skips_malformed_segments() {
        let entries = parse_entries("Bull:goldStake, Egg:noStake:redStake").expect("parse");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].item_name, "Egg");
    }

    #[test]
    fn parse_rejects_unknown_stake() {
        assert_eq!(
            parse_entries("Bull:blackStake:diamondStake"),
            Err(StakeError::UnknownStakeLevel("diamondStake".into()))
        );
        assert!(matches!(parse_entries("nonsense"), Err(StakeError::InvalidInput(_))));
    }

    #[test]
    fn bulk_progression_records_current_stakes() {
        let items = items();
        let event =
            bulk_progression(&items, &[ItemId(1), ItemId(0)], StakeLevel::Gold, date("2024-02-02"))
                .expect("event");
        assert_eq!(
            event.entries,
            vec![
                ProgressionEntry::new("B", StakeLevel::None, StakeLevel::Gold),
                ProgressionEntry::new("A", StakeLevel::Purple, StakeLevel::Gold),
            ]
        );
    }

    #[test]
    fn bulk_progression_rejects_unknown_or_empty_selection() {
        let items = items();
        let day = date("2024-02-02");
        assert!(matches!(
            bulk_progression(&items, &[ItemId(42)], StakeLevel::Gold, day),
            Err(StakeError::NotFound(_))
        ));
        assert!(matches!(
            bulk_progression(&items, &[], StakeLevel::Gold, day),
            Err(StakeError::InvalidInput(_))
        ));
    }

    #[test]
    fn event_wire_shape() {
        let json = serde_json::to_value(event("2024-01-01")).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2024-01-01",
                "jokers": [{"name": "A", "from": "noStake", "to": "whiteStake"}]
            })
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
        assert_eq!(
            parse_date(" 2024-02-29 ").map(|d| d.to_string()),
            Ok("2024-02-29".to_string())
        );
    }
}
