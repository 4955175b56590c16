//! # View Projection
//!
//! Filtering and sorting of a board's items for display.
//!
//! The filter runs first, then the filtered subset is sorted. All sorts are
//! stable, so re-running a view over unchanged input yields the same list in
//! the same order.

use crate::{Catalog, StakeError, TrackedItem};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Sort orders offered by the board view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Alphabetical by name.
    Name,
    /// Rarest first, then by name.
    Rarity,
    /// Highest stake first, then by name.
    Stake,
    /// Catalog collection order; unknown names last.
    #[default]
    Collection,
}

impl SortKey {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Rarity => "rarity",
            SortKey::Stake => "stake",
            SortKey::Collection => "collection",
        }
    }
}

impl FromStr for SortKey {
    type Err = StakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "rarity" => Ok(SortKey::Rarity),
            "stake" => Ok(SortKey::Stake),
            "collection" => Ok(SortKey::Collection),
            other => Err(StakeError::InvalidInput(format!("unknown sort key '{}'", other))),
        }
    }
}

/// Name comparison used by every sort key.
///
/// Letters compare without case or accents first, so "Séance" sits between
/// "Scholar" and "Seeing Double". Ties fall back to a case-insensitive
/// comparison that keeps accents, then to exact comparison to keep the order
/// total.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| lowercase(a).cmp(lowercase(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn lowercase(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}

/// True when `item` matches the lowercase search needle.
fn matches(item: &TrackedItem, catalog: &Catalog, needle: &str) -> bool {
    needle.is_empty()
        || item.name.to_lowercase().contains(needle)
        || catalog.description(&item.name).to_lowercase().contains(needle)
}

/// Filter `items` by `search` and sort the result by `sort`.
///
/// `search` is a case-insensitive substring matched against the item name or
/// its catalog description.
#[must_use]
pub fn apply_view(
    items: &[TrackedItem],
    catalog: &Catalog,
    search: &str,
    sort: SortKey,
) -> Vec<TrackedItem> {
    let needle = search.trim().to_lowercase();

    let mut view: Vec<TrackedItem> = items
        .iter()
        .filter(|item| matches(item, catalog, &needle))
        .cloned()
        .collect();

    match sort {
        SortKey::Name => view.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::Rarity => view.sort_by(|a, b| {
            catalog
                .rarity(&b.name)
                .cmp(&catalog.rarity(&a.name))
                .then_with(|| compare_names(&a.name, &b.name))
        }),
        SortKey::Stake => view.sort_by(|a, b| {
            b.stake
                .rank()
                .cmp(&a.stake.rank())
                .then_with(|| compare_names(&a.name, &b.name))
        }),
        SortKey::Collection => view.sort_by_key(|item| catalog.collection_order(&item.name)),
    }

    view
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogEntry, ItemId, ItemKind, StakeLevel};

    fn entry(id: u32, name: &str, description: &str, rarity: u8, order: u32) -> CatalogEntry {
        CatalogEntry {
            id: ItemId(id),
            name: name.to_string(),
            kind: ItemKind::Joker,
            description: description.to_string(),
            rarity: Some(rarity),
            collection_order: order,
        }
    }

    fn fixture() -> (Catalog, Vec<TrackedItem>) {
        let catalog = Catalog::new(vec![
            entry(0, "Joker", "+4 Mult", 1, 1),
            entry(1, "Blueprint", "Copies the ability of Joker to the right", 3, 123),
            entry(2, "Bull", "+2 Chips for each $1 you have", 2, 93),
            entry(3, "Perkeo", "Creates a Negative copy of a consumable", 4, 150),
        ])
        .expect("catalog");
        let items = vec![
            TrackedItem::new(ItemId(3), "Perkeo", StakeLevel::Red),
            TrackedItem::new(ItemId(1), "Blueprint", StakeLevel::Gold),
            TrackedItem::new(ItemId(0), "Joker", StakeLevel::Gold),
            TrackedItem::new(ItemId(2), "Bull", StakeLevel::None),
        ];
        (catalog, items)
    }

    fn names(view: &[TrackedItem]) -> Vec<&str> {
        view.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn sort_by_name() {
        let (catalog, items) = fixture();
        let view = apply_view(&items, &catalog, "", SortKey::Name);
        assert_eq!(names(&view), vec!["Blueprint", "Bull", "Joker", "Perkeo"]);
    }

    #[test]
    fn sort_by_rarity_descending() {
        let (catalog, items) = fixture();
        let view = apply_view(&items, &catalog, "", SortKey::Rarity);
        assert_eq!(names(&view), vec!["Perkeo", "Blueprint", "Bull", "Joker"]);
    }

    #[test]
    fn sort_by_stake_breaks_ties_by_name() {
        let (catalog, items) = fixture();
        let view = apply_view(&items, &catalog, "", SortKey::Stake);
        assert_eq!(names(&view), vec!["Blueprint", "Joker", "Perkeo", "Bull"]);
    }

    #[test]
    fn sort_by_collection() {
        let (catalog, items) = fixture();
        let view = apply_view(&items, &catalog, "", SortKey::Collection);
        assert_eq!(names(&view), vec!["Joker", "Bull", "Blueprint", "Perkeo"]);
    }

    #[test]
    fn unknown_names_sort_last_in_collection_order() {
        let (catalog, mut items) = fixture();
        items.insert(0, TrackedItem::new(ItemId(90), "Homebrew", StakeLevel::None));
        items.insert(2, TrackedItem::new(ItemId(91), "Another", StakeLevel::None));
        let view = apply_view(&items, &catalog, "", SortKey::Collection);
        assert_eq!(
            names(&view),
            vec!["Joker", "Bull", "Blueprint", "Perkeo", "Homebrew", "Another"]
        );
    }

    #[test]
    fn search_matches_name_or_description() {
        let (catalog, items) = fixture();
        let by_name = apply_view(&items, &catalog, "BLUE", SortKey::Name);
        assert_eq!(names(&by_name), vec!["Blueprint"]);

        let by_description = apply_view(&items, &catalog, "mult", SortKey::Name);
        assert_eq!(names(&by_description), vec!["Joker"]);

        let nothing = apply_view(&items, &catalog, "zzz", SortKey::Name);
        assert!(nothing.is_empty());
    }

    #[test]
    fn view_is_idempotent() {
        let (catalog, items) = fixture();
        let first = apply_view(&items, &catalog, "j", SortKey::Stake);
        let second = apply_view(&items, &catalog, "j", SortKey::Stake);
        assert_eq!(first, second);
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("Stake".parse::<SortKey>(), Ok(SortKey::Stake));
        assert_eq!("collection".parse::<SortKey>(), Ok(SortKey::Collection));
        assert!(matches!(
            "price".parse::<SortKey>(),
            Err(StakeError::InvalidInput(_))
        ));
    }

    #[test]
    fn name_compare_is_case_insensitive_first() {
        assert_eq!(compare_names("abstract", "Blueprint"), Ordering::Less);
        assert_eq!(compare_names("Joker", "joker"), Ordering::Less);
        assert_eq!(compare_names("Joker", "Joker"), Ordering::Equal);
    }

    #[test]
    fn accented_names_sort_with_their_base_letters() {
        let catalog = Catalog::new(Vec::new()).expect("catalog");
        let items: Vec<TrackedItem> = [
            "Sly Joker",
            "Seltzer",
            "Séance",
            "Seeing Double",
            "Swashbuckler",
            "Blueprint",
        ]
        .iter()
        .enumerate()
        .map(|(id, name)| TrackedItem::new(ItemId(id as u32), *name, StakeLevel::None))
        .collect();

        let view = apply_view(&items, &catalog, "", SortKey::Name);
        assert_eq!(
            names(&view),
            vec!["Blueprint", "Séance", "Seeing Double", "Seltzer", "Sly Joker", "Swashbuckler"]
        );

        assert_eq!(compare_names("Seance", "Séance"), Ordering::Less);
        assert_eq!(compare_names("séance", "Séance"), Ordering::Greater);
    }
}
