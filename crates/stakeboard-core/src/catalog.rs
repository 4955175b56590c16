//! # Item Catalog
//!
//! Load-time metadata for every collectible: id, kind, description, rarity
//! and collection ordinal. Boards are built from a catalog, and the view
//! projection reads descriptions, rarities and ordinals from it.
//!
//! The built-in catalog carries the 150 jokers in collection order, each
//! with its rarity tier and effect text, followed by the 15 decks. Deployments can replace it with a TOML file:
//!
//! ```toml
//! [[item]]
//! id = 0
//! name = "Joker"
//! kind = "joker"
//! description = "+4 Mult"
//! rarity = 1
//! collection = 1
//! ```

use crate::primitives::UNKNOWN_COLLECTION_ORDER;
use crate::{ItemId, ItemKind, StakeError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Rarity tiers used by the built-in catalog.
pub const COMMON: u8 = 1;
pub const UNCOMMON: u8 = 2;
pub const RARE: u8 = 3;
pub const LEGENDARY: u8 = 4;

/// Jokers in the order the game's collection screen lists them, with their
/// rarity tier and effect text.
const JOKER_COLLECTION: [(&str, u8, &str); 150] = [
    ("Joker", COMMON, "+4 Mult"),
    ("Greedy Joker", COMMON, "Played cards with Diamond suit give +3 Mult when scored"),
    ("Lusty Joker", COMMON, "Played cards with Heart suit give +3 Mult when scored"),
    ("Wrathful Joker", COMMON, "Played cards with Spade suit give +3 Mult when scored"),
    ("Gluttonous Joker", COMMON, "Played cards with Club suit give +3 Mult when scored"),
    ("Jolly Joker", COMMON, "+8 Mult if played hand contains a Pair"),
    ("Zany Joker", COMMON, "+12 Mult if played hand contains a Three of a Kind"),
    ("Mad Joker", COMMON, "+10 Mult if played hand contains a Two Pair"),
    ("Crazy Joker", COMMON, "+12 Mult if played hand contains a Straight"),
    ("Droll Joker", COMMON, "+10 Mult if played hand contains a Flush"),
    ("Sly Joker", COMMON, "+50 Chips if played hand contains a Pair"),
    ("Wily Joker", COMMON, "+100 Chips if played hand contains a Three of a Kind"),
    ("Clever Joker", COMMON, "+80 Chips if played hand contains a Two Pair"),
    ("Devious Joker", COMMON, "+100 Chips if played hand contains a Straight"),
    ("Crafty Joker", COMMON, "+80 Chips if played hand contains a Flush"),
    ("Half Joker", COMMON, "+20 Mult if played hand contains 3 or fewer cards"),
    ("Joker Stencil", UNCOMMON, "X1 Mult for each empty Joker slot"),
    ("Four Fingers", UNCOMMON, "All Flushes and Straights can be made with 4 cards"),
    ("Mime", UNCOMMON, "Retrigger all card held in hand abilities"),
    ("Credit Card", COMMON, "Go up to -$20 in debt"),
    (
        "Ceremonial Dagger",
        UNCOMMON,
        "When Blind is selected, destroy Joker to the right and permanently add double its sell value to this Mult",
    ),
    ("Banner", COMMON, "+30 Chips for each remaining discard"),
    ("Mystic Summit", COMMON, "+15 Mult when 0 discards remaining"),
    ("Marble Joker", UNCOMMON, "Adds one Stone card to the deck when Blind is selected"),
    ("Loyalty Card", UNCOMMON, "X4 Mult every 6 hands played"),
    ("8 Ball", COMMON, "1 in 4 chance for each played 8 to create a Tarot card when scored"),
    ("Misprint", COMMON, "+0 to +23 Mult"),
    ("Dusk", UNCOMMON, "Retrigger all played cards in final hand of round"),
    ("Raised Fist", COMMON, "Adds double the rank of lowest ranked card held in hand to Mult"),
    ("Chaos the Clown", COMMON, "1 free Reroll per shop"),
    ("Fibonacci", UNCOMMON, "Each played Ace, 2, 3, 5, or 8 gives +8 Mult when scored"),
    ("Steel Joker", UNCOMMON, "Gives X0.2 Mult for each Steel Card in your full deck"),
    ("Scary Face", COMMON, "Played face cards give +30 Chips when scored"),
    ("Abstract Joker", COMMON, "+3 Mult for each Joker card"),
    (
        "Delayed Gratification",
        COMMON,
        "Earn $2 per discard if no discards are used by end of the round",
    ),
    ("Hack", UNCOMMON, "Retrigger each played 2, 3, 4, or 5"),
    ("Pareidolia", UNCOMMON, "All cards are considered face cards"),
    ("Gros Michel", COMMON, "+15 Mult, 1 in 6 chance this is destroyed at the end of round"),
    ("Even Steven", COMMON, "Played cards with even rank give +4 Mult when scored"),
    ("Odd Todd", COMMON, "Played cards with odd rank give +31 Chips when scored"),
    ("Scholar", COMMON, "Played Aces give +20 Chips and +4 Mult when scored"),
    ("Business Card", COMMON, "Played face cards have a 1 in 2 chance to give $2 when scored"),
    ("Supernova", COMMON, "Adds the number of times poker hand has been played this run to Mult"),
    (
        "Ride the Bus",
        COMMON,
        "This Joker gains +1 Mult per consecutive hand played without a scoring face card",
    ),
    ("Space Joker", UNCOMMON, "1 in 4 chance to upgrade level of played poker hand"),
    ("Egg", COMMON, "Gains $3 of sell value at end of round"),
    ("Burglar", UNCOMMON, "When Blind is selected, gain +3 Hands and lose all discards"),
    ("Blackboard", UNCOMMON, "X3 Mult if all cards held in hand are Spades or Clubs"),
    ("Runner", COMMON, "Gains +15 Chips if played hand contains a Straight"),
    ("Ice Cream", COMMON, "+100 Chips, -5 Chips for every hand played"),
    (
        "DNA",
        RARE,
        "If first hand of round has only 1 card, add a permanent copy to deck and draw it to hand",
    ),
    ("Splash", COMMON, "Every played card counts in scoring"),
    ("Blue Joker", COMMON, "+2 Chips for each remaining card in deck"),
    (
        "Sixth Sense",
        UNCOMMON,
        "If first hand of round is a single 6, destroy it and create a Spectral card",
    ),
    ("Constellation", UNCOMMON, "This Joker gains X0.1 Mult every time a Planet card is used"),
    ("Hiker", UNCOMMON, "Every played card permanently gains +5 Chips when scored"),
    ("Faceless Joker", COMMON, "Earn $5 if 3 or more face cards are discarded at the same time"),
    ("Green Joker", COMMON, "+1 Mult per hand played, -1 Mult per discard"),
    ("Superposition", COMMON, "Create a Tarot card if poker hand contains an Ace and a Straight"),
    (
        "To Do List",
        COMMON,
        "Earn $4 if poker hand is the listed hand, hand changes at end of round",
    ),
    ("Cavendish", COMMON, "X3 Mult, 1 in 1000 chance this card is destroyed at the end of round"),
    ("Card Sharp", UNCOMMON, "X3 Mult if played poker hand has already been played this round"),
    ("Red Card", COMMON, "This Joker gains +3 Mult when any Booster Pack is skipped"),
    (
        "Madness",
        UNCOMMON,
        "When Small Blind or Big Blind is selected, gain X0.5 Mult and destroy a random Joker",
    ),
    ("Square Joker", COMMON, "This Joker gains +4 Chips if played hand has exactly 4 cards"),
    ("Séance", UNCOMMON, "If poker hand is a Straight Flush, create a random Spectral card"),
    ("Riff-raff", COMMON, "When Blind is selected, create 2 Common Jokers"),
    (
        "Vampire",
        UNCOMMON,
        "This Joker gains X0.1 Mult per scoring Enhanced card played and removes the card Enhancement",
    ),
    ("Shortcut", UNCOMMON, "Allows Straights to be made with gaps of 1 rank"),
    (
        "Hologram",
        UNCOMMON,
        "This Joker gains X0.25 Mult every time a playing card is added to your deck",
    ),
    ("Vagabond", RARE, "Create a Tarot card if hand is played with $4 or less"),
    ("Baron", RARE, "Each King held in hand gives X1.5 Mult"),
    ("Cloud 9", UNCOMMON, "Earn $1 for each 9 in your full deck at end of round"),
    (
        "Rocket",
        UNCOMMON,
        "Earn $1 at end of round, payout increases by $2 when Boss Blind is defeated",
    ),
    (
        "Obelisk",
        RARE,
        "This Joker gains X0.2 Mult per consecutive hand played without playing your most played poker hand",
    ),
    ("Midas Mask", UNCOMMON, "All played face cards become Gold cards when scored"),
    ("Luchador", UNCOMMON, "Sell this card to disable the current Boss Blind"),
    ("Photograph", COMMON, "First played face card gives X2 Mult when scored"),
    (
        "Gift Card",
        UNCOMMON,
        "Add $1 of sell value to every Joker and Consumable card at end of round",
    ),
    ("Turtle Bean", UNCOMMON, "+5 hand size, reduces by 1 each round"),
    ("Erosion", UNCOMMON, "+4 Mult for each card below the deck's starting size in your full deck"),
    ("Reserved Parking", COMMON, "Each face card held in hand has a 1 in 2 chance to give $1"),
    (
        "Mail-In Rebate",
        COMMON,
        "Earn $5 for each discarded card of the listed rank, rank changes every round",
    ),
    ("To the Moon", UNCOMMON, "Earn an extra $1 of interest for every $5 you have at end of round"),
    (
        "Hallucination",
        COMMON,
        "1 in 2 chance to create a Tarot card when any Booster Pack is opened",
    ),
    ("Fortune Teller", COMMON, "+1 Mult per Tarot card used this run"),
    ("Juggler", COMMON, "+1 hand size"),
    ("Drunkard", COMMON, "+1 discard each round"),
    ("Stone Joker", UNCOMMON, "Gives +25 Chips for each Stone Card in your full deck"),
    ("Golden Joker", COMMON, "Earn $4 at end of round"),
    (
        "Lucky Cat",
        UNCOMMON,
        "This Joker gains X0.25 Mult every time a Lucky card successfully triggers",
    ),
    ("Baseball Card", RARE, "Uncommon Jokers each give X1.5 Mult"),
    ("Bull", UNCOMMON, "+2 Chips for each $1 you have"),
    ("Diet Cola", UNCOMMON, "Sell this card to create a free Double Tag"),
    ("Trading Card", UNCOMMON, "If first discard of round has only 1 card, destroy it and earn $3"),
    ("Flash Card", UNCOMMON, "This Joker gains +2 Mult per reroll in the shop"),
    ("Popcorn", COMMON, "+20 Mult, -4 Mult per round played"),
    ("Spare Trousers", UNCOMMON, "This Joker gains +2 Mult if played hand contains a Two Pair"),
    (
        "Ancient Joker",
        RARE,
        "Each played card with the listed suit gives X1.5 Mult when scored, suit changes at end of round",
    ),
    ("Ramen", UNCOMMON, "X2 Mult, loses X0.01 Mult per card discarded"),
    ("Walkie Talkie", COMMON, "Each played 10 or 4 gives +10 Chips and +4 Mult when scored"),
    ("Seltzer", UNCOMMON, "Retrigger all cards played for the next 10 hands"),
    (
        "Castle",
        UNCOMMON,
        "This Joker gains +3 Chips per discarded card of the listed suit, suit changes every round",
    ),
    ("Smiley Face", COMMON, "Played face cards give +5 Mult when scored"),
    (
        "Campfire",
        RARE,
        "This Joker gains X0.25 Mult for each card sold, resets when Boss Blind is defeated",
    ),
    ("Golden Ticket", COMMON, "Played Gold cards earn $4 when scored"),
    (
        "Mr. Bones",
        UNCOMMON,
        "Prevents Death if chips scored are at least 25% of required chips, self destructs",
    ),
    ("Acrobat", UNCOMMON, "X3 Mult on final hand of round"),
    ("Sock and Buskin", UNCOMMON, "Retrigger all played face cards"),
    ("Swashbuckler", COMMON, "Adds the sell value of all other owned Jokers to Mult"),
    ("Troubadour", UNCOMMON, "+2 hand size, -1 hand each round"),
    (
        "Certificate",
        UNCOMMON,
        "When round begins, add a random playing card with a random seal to your hand",
    ),
    (
        "Smeared Joker",
        UNCOMMON,
        "Hearts and Diamonds count as the same suit, Spades and Clubs count as the same suit",
    ),
    ("Throwback", UNCOMMON, "X0.25 Mult for each Blind skipped this run"),
    ("Hanging Chad", COMMON, "Retrigger first played card used in scoring 2 additional times"),
    ("Rough Gem", UNCOMMON, "Played cards with Diamond suit earn $1 when scored"),
    (
        "Bloodstone",
        UNCOMMON,
        "1 in 2 chance for played cards with Heart suit to give X1.5 Mult when scored",
    ),
    ("Arrowhead", UNCOMMON, "Played cards with Spade suit give +50 Chips when scored"),
    ("Onyx Agate", UNCOMMON, "Played cards with Club suit give +7 Mult when scored"),
    ("Glass Joker", UNCOMMON, "This Joker gains X0.75 Mult for every Glass Card that is destroyed"),
    ("Showman", UNCOMMON, "Joker, Tarot, Planet, and Spectral cards may appear multiple times"),
    (
        "Flower Pot",
        UNCOMMON,
        "X3 Mult if poker hand contains a Diamond card, Club card, Heart card, and Spade card",
    ),
    ("Blueprint", RARE, "Copies ability of Joker to the right"),
    ("Wee Joker", RARE, "This Joker gains +8 Chips when each played 2 is scored"),
    ("Merry Andy", UNCOMMON, "+3 discards each round, -1 hand size"),
    ("Oops! All 6s", UNCOMMON, "Doubles all listed probabilities"),
    (
        "The Idol",
        UNCOMMON,
        "Each played card of the listed rank and suit gives X2 Mult when scored, card changes every round",
    ),
    (
        "Seeing Double",
        UNCOMMON,
        "X2 Mult if played hand has a scoring Club card and a scoring card of any other suit",
    ),
    ("Matador", UNCOMMON, "Earn $8 if played hand triggers the Boss Blind ability"),
    ("Hit the Road", RARE, "This Joker gains X0.5 Mult for every Jack discarded this round"),
    ("The Duo", RARE, "X2 Mult if played hand contains a Pair"),
    ("The Trio", RARE, "X3 Mult if played hand contains a Three of a Kind"),
    ("The Family", RARE, "X4 Mult if played hand contains a Four of a Kind"),
    ("The Order", RARE, "X3 Mult if played hand contains a Straight"),
    ("The Tribe", RARE, "X2 Mult if played hand contains a Flush"),
    ("Stuntman", RARE, "+250 Chips, -2 hand size"),
    ("Invisible Joker", RARE, "After 2 rounds, sell this card to Duplicate a random Joker"),
    ("Brainstorm", RARE, "Copies the ability of leftmost Joker"),
    ("Satellite", UNCOMMON, "Earn $1 at end of round per unique Planet card used this run"),
    ("Shoot the Moon", COMMON, "Each Queen held in hand gives +13 Mult"),
    ("Driver's License", RARE, "X3 Mult if you have at least 16 Enhanced cards in your full deck"),
    ("Cartomancer", UNCOMMON, "Create a Tarot card when Blind is selected"),
    ("Astronomer", UNCOMMON, "All Planet cards and Celestial Packs in the shop are free"),
    ("Burnt Joker", RARE, "Upgrade the level of the first discarded poker hand each round"),
    ("Bootstraps", UNCOMMON, "+2 Mult for every $5 you have"),
    ("Canio", LEGENDARY, "This Joker gains X1 Mult when a face card is destroyed"),
    ("Triboulet", LEGENDARY, "Played Kings and Queens each give X2 Mult when scored"),
    ("Yorick", LEGENDARY, "This Joker gains X1 Mult every 23 cards discarded"),
    ("Chicot", LEGENDARY, "Disables effect of every Boss Blind"),
    (
        "Perkeo",
        LEGENDARY,
        "Creates a Negative copy of 1 random consumable card in your possession at the end of the shop",
    ),
];

/// Starting decks in collection order, with their effect text. Decks carry
/// no rarity.
const DECK_COLLECTION: [(&str, &str); 15] = [
    ("Red Deck", "+1 discard every round"),
    ("Blue Deck", "+1 hand every round"),
    ("Yellow Deck", "Start with an extra $10"),
    ("Green Deck", "No interest, earn $2 per remaining hand and $1 per remaining discard"),
    ("Black Deck", "+1 Joker slot, -1 hand every round"),
    ("Magic Deck", "Start run with the Crystal Ball voucher and 2 copies of The Fool"),
    ("Nebula Deck", "Start run with the Telescope voucher, -1 consumable slot"),
    ("Ghost Deck", "Spectral cards may appear in the shop, start with a Hex card"),
    ("Abandoned Deck", "Start run with no face cards in your deck"),
    ("Checkered Deck", "Start run with 26 Spades and 26 Hearts in deck"),
    ("Zodiac Deck", "Start run with Tarot Merchant, Planet Merchant, and Overstock"),
    ("Painted Deck", "+2 hand size, -1 Joker slot"),
    ("Anaglyph Deck", "After defeating each Boss Blind, gain a Double Tag"),
    (
        "Plasma Deck",
        "Balance Chips and Mult when calculating score for played hand, X2 base Blind size",
    ),
    ("Erratic Deck", "All ranks and suits in deck are randomized"),
];

/// Static metadata for one collectible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub description: String,
    /// Numeric rarity, higher is rarer. `None` when unknown.
    #[serde(default)]
    pub rarity: Option<u8>,
    /// Position in the in-game collection (1-based).
    #[serde(rename = "collection", default = "unknown_order")]
    pub collection_order: u32,
}

fn unknown_order() -> u32 {
    UNKNOWN_COLLECTION_ORDER
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "item", default)]
    items: Vec<CatalogEntry>,
}

/// An immutable set of catalog entries indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_name: BTreeMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids or names.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, StakeError> {
        let mut ids = BTreeSet::new();
        let mut by_name = BTreeMap::new();

        for (index, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(StakeError::InvalidInput(format!(
                    "catalog entry {} has an empty name",
                    entry.id
                )));
            }
            if !ids.insert(entry.id) {
                return Err(StakeError::InvalidInput(format!(
                    "duplicate catalog id {}",
                    entry.id
                )));
            }
            if by_name.insert(entry.name.clone(), index).is_some() {
                return Err(StakeError::InvalidInput(format!(
                    "duplicate catalog name '{}'",
                    entry.name
                )));
            }
        }

        Ok(Self { entries, by_name })
    }

    /// The built-in joker and deck catalog.
    ///
    /// Jokers take ids 0..150 in collection order and decks follow from 150.
    /// Collection ordinals run on from the jokers, so decks list as 151..165.
    #[must_use]
    pub fn builtin() -> Self {
        let jokers = JOKER_COLLECTION.iter().map(|(name, rarity, description)| {
            (ItemKind::Joker, *name, Some(*rarity), *description)
        });
        let decks = DECK_COLLECTION
            .iter()
            .map(|(name, description)| (ItemKind::Deck, *name, None, *description));

        let entries: Vec<CatalogEntry> = jokers
            .chain(decks)
            .enumerate()
            .map(|(id, (kind, name, rarity, description))| CatalogEntry {
                id: ItemId(id as u32),
                name: name.to_string(),
                kind,
                description: description.to_string(),
                rarity,
                collection_order: id as u32 + 1,
            })
            .collect();

        let by_name = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.name.clone(), index))
            .collect();

        Self { entries, by_name }
    }

    /// Parse a TOML catalog (`[[item]]` tables).
    pub fn from_toml_str(source: &str) -> Result<Self, StakeError> {
        let file: CatalogFile = toml::from_str(source)
            .map_err(|e| StakeError::SerializationError(format!("catalog: {}", e)))?;
        Self::new(file.items)
    }

    /// All entries in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries of one kind, in catalog order.
    pub fn entries_of(&self, kind: ItemKind) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name.get(name).and_then(|&i| self.entries.get(i))
    }

    /// Collection ordinal, or `UNKNOWN_COLLECTION_ORDER` for unknown names.
    #[must_use]
    pub fn collection_order(&self, name: &str) -> u32 {
        self.get(name)
            .map_or(UNKNOWN_COLLECTION_ORDER, |e| e.collection_order)
    }

    /// Rarity, 0 when unknown.
    #[must_use]
    pub fn rarity(&self, name: &str) -> u8 {
        self.get(name).and_then(|e| e.rarity).unwrap_or(0)
    }

    /// Description text, empty when unknown.
    #[must_use]
    pub fn description(&self, name: &str) -> &str {
        self.get(name).map_or("", |e| e.description.as_str())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_jokers_then_decks() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.entries_of(ItemKind::Joker).count(), 150);
        assert_eq!(catalog.entries_of(ItemKind::Deck).count(), 15);
        assert_eq!(catalog.get("Joker").map(|e| e.id), Some(ItemId(0)));
        assert_eq!(catalog.get("Perkeo").map(|e| e.id), Some(ItemId(149)));
        assert_eq!(catalog.get("Red Deck").map(|e| e.id), Some(ItemId(150)));
    }

    #[test]
    fn builtin_collection_order_matches_listing() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.collection_order("Joker"), 1);
        assert_eq!(catalog.collection_order("Séance"), 66);
        assert_eq!(catalog.collection_order("Perkeo"), 150);
        assert_eq!(catalog.collection_order("Red Deck"), 151);
        assert_eq!(catalog.collection_order("Erratic Deck"), 165);
    }

    #[test]
    fn builtin_collection_ordinals_are_distinct() {
        let catalog = Catalog::builtin();
        let ordinals: BTreeSet<u32> = catalog
            .entries()
            .iter()
            .map(|e| e.collection_order)
            .collect();
        assert_eq!(ordinals.len(), catalog.len());
    }

    #[test]
    fn builtin_rarity_tiers() {
        let catalog = Catalog::builtin();
        let count = |tier: u8| {
            catalog
                .entries_of(ItemKind::Joker)
                .filter(|e| e.rarity == Some(tier))
                .count()
        };
        assert_eq!(count(COMMON), 61);
        assert_eq!(count(UNCOMMON), 64);
        assert_eq!(count(RARE), 20);
        assert_eq!(count(LEGENDARY), 5);

        assert_eq!(catalog.rarity("Joker"), COMMON);
        assert_eq!(catalog.rarity("Blueprint"), RARE);
        assert_eq!(catalog.rarity("Perkeo"), LEGENDARY);
        assert_eq!(catalog.rarity("Red Deck"), 0);
    }

    #[test]
    fn builtin_describes_every_item() {
        let catalog = Catalog::builtin();
        assert!(catalog.entries().iter().all(|e| !e.description.is_empty()));
        assert_eq!(catalog.description("Joker"), "+4 Mult");
        assert!(catalog.description("Red Deck").contains("discard"));
    }

    #[test]
    fn unknown_names_fall_back() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.collection_order("Not A Joker"), UNKNOWN_COLLECTION_ORDER);
        assert_eq!(catalog.rarity("Not A Joker"), 0);
        assert_eq!(catalog.description("Not A Joker"), "");
    }

    #[test]
    fn parses_toml_catalog() {
        let source = r#"
            [[item]]
            id = 0
            name = "Joker"
            description = "+4 Mult"
            rarity = 1
            collection = 1

            [[item]]
            id = 1
            name = "Red Deck"
            kind = "deck"
        "#;
        let catalog = Catalog::from_toml_str(source).expect("parse");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.rarity("Joker"), 1);
        assert_eq!(catalog.description("Joker"), "+4 Mult");
        assert_eq!(catalog.get("Red Deck").map(|e| e.kind), Some(ItemKind::Deck));
        assert_eq!(catalog.collection_order("Red Deck"), UNKNOWN_COLLECTION_ORDER);
    }

    #[test]
    fn rejects_duplicate_names() {
        let source = r#"
            [[item]]
            id = 0
            name = "Joker"

            [[item]]
            id = 1
            name = "Joker"
        "#;
        assert!(matches!(
            Catalog::from_toml_str(source),
            Err(StakeError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let entry = |name: &str| CatalogEntry {
            id: ItemId(7),
            name: name.to_string(),
            kind: ItemKind::Joker,
            description: String::new(),
            rarity: None,
            collection_order: 1,
        };
        assert!(Catalog::new(vec![entry("A"), entry("B")]).is_err());
    }
}
