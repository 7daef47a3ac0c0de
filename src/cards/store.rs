//! Card store: named decks with versioned snapshots.
//!
//! The `CardStore` owns every deck used by the engine. Decks are never
//! restructured during a run; only `mutableTags` of cards inside them grow.
//! Every such write bumps the store version.
//!
//! Storage uses `im` persistent structures, so `snapshot()` and `clone()`
//! are O(1) and writes after a snapshot copy only the touched path. That is
//! what lets the engine hand each run its own isolated view.

use im::{OrdMap, Vector};
use super::card::Card;
use crate::core::Result;

/// An ordered collection of cards.
pub type Deck = Vector<Card>;

/// In-memory set of named decks.
///
/// ## Example
///
/// ```
/// use quest_engine::cards::{Card, CardStore};
///
/// let store = CardStore::new()
///     .with_deck("verbs", [Card::new("Defend")])
///     .with_deck("targets", [Card::new("Raider")]);
///
/// let snapshot = store.snapshot();
/// assert_eq!(snapshot.deck_len("targets"), 1);
/// assert_eq!(snapshot.deck_len("missing"), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardStore {
    decks: OrdMap<String, Deck>,
    version: u64,
}

impl CardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON object mapping deck names to card arrays.
    pub fn from_json(input: &str) -> Result<Self> {
        let decks: OrdMap<String, Deck> = serde_json::from_str(input)?;
        Ok(Self { decks, version: 0 })
    }

    /// Export decks (including mutable tags) in the same JSON shape.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.decks)?)
    }

    /// Add a deck (builder pattern). Replaces any deck with the same name.
    #[must_use]
    pub fn with_deck(mut self, name: impl Into<String>, cards: impl IntoIterator<Item = Card>) -> Self {
        self.insert_deck(name, cards);
        self
    }

    /// Insert or replace a deck.
    pub fn insert_deck(&mut self, name: impl Into<String>, cards: impl IntoIterator<Item = Card>) {
        self.decks.insert(name.into(), cards.into_iter().collect());
        self.version += 1;
    }

    /// Get a deck by name.
    #[must_use]
    pub fn deck(&self, name: &str) -> Option<&Deck> {
        self.decks.get(name)
    }

    /// Number of cards in a deck; missing decks count as empty.
    #[must_use]
    pub fn deck_len(&self, name: &str) -> usize {
        self.decks.get(name).map_or(0, Vector::len)
    }

    /// Get a card by deck and index.
    #[must_use]
    pub fn card(&self, deck: &str, index: usize) -> Option<&Card> {
        self.decks.get(deck).and_then(|d| d.get(index))
    }

    /// Append tags to one card's `mutableTags`.
    ///
    /// Returns `false` if the card does not exist.
    pub fn add_mutable_tags(&mut self, deck: &str, index: usize, tags: &[String]) -> bool {
        let Some(card) = self.decks.get_mut(deck).and_then(|d| d.get_mut(index)) else {
            return false;
        };
        card.add_mutable_tags(tags);
        self.version += 1;
        true
    }

    /// Deck names in sorted order.
    pub fn deck_names(&self) -> impl Iterator<Item = &str> {
        self.decks.keys().map(String::as_str)
    }

    /// Number of decks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decks.len()
    }

    /// Check if the store has no decks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    /// Monotonic version, bumped on every write.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Immutable view of the current version.
    #[must_use]
    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot {
            decks: self.decks.clone(),
            version: self.version,
        }
    }
}

impl From<CardSnapshot> for CardStore {
    fn from(snapshot: CardSnapshot) -> Self {
        Self {
            decks: snapshot.decks,
            version: snapshot.version,
        }
    }
}

/// Read-only view of a `CardStore` at one version.
///
/// Later writes to the store never show through a snapshot.
#[derive(Clone, Debug)]
pub struct CardSnapshot {
    decks: OrdMap<String, Deck>,
    version: u64,
}

impl CardSnapshot {
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn deck(&self, name: &str) -> Option<&Deck> {
        self.decks.get(name)
    }

    #[must_use]
    pub fn deck_len(&self, name: &str) -> usize {
        self.decks.get(name).map_or(0, Vector::len)
    }

    #[must_use]
    pub fn card(&self, deck: &str, index: usize) -> Option<&Card> {
        self.decks.get(deck).and_then(|d| d.get(index))
    }
}
