//! Pending-instruction ledger.
//!
//! When a drawn card carries an instruction aimed at another deck, the
//! ledger keeps it until that deck's stage resolves its requirement.
//! Lookups go through a map keyed on the case-folded deck name; which of
//! several instructions for one deck wins is decided by a named
//! `CollisionPolicy`.
//!
//! Entries stay live after a stage consumes them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Which instruction wins when several target the same deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// The earliest recorded instruction keeps the deck.
    FirstWins,
    /// Each new instruction replaces the previous one.
    LastWins,
}

/// Collision policy used unless configured otherwise.
pub const LEDGER_COLLISION_POLICY: CollisionPolicy = CollisionPolicy::FirstWins;

/// A deferred requirement on a later deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInstruction {
    /// Name of the card that issued it.
    pub source: String,
    /// Target deck name as authored.
    pub target: String,
    pub tags: Vec<String>,
    pub face_down: bool,
}

/// Requirement chosen for one stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub tags: Vec<String>,
    /// Issuing card when a pending instruction applied.
    pub source: Option<String>,
    pub face_down: bool,
}

/// Ordered record of pending instructions with per-deck lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLedger {
    policy: CollisionPolicy,
    /// Every recorded instruction, in insertion order.
    history: Vec<PendingInstruction>,
    /// Case-folded deck name -> index into `history`.
    by_deck: FxHashMap<String, usize>,
}

impl Default for PendingLedger {
    fn default() -> Self {
        Self::new(LEDGER_COLLISION_POLICY)
    }
}

impl PendingLedger {
    #[must_use]
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            history: Vec::new(),
            by_deck: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Record every instruction of `card` aimed at a deck other than
    /// `ThisCard`. Returns the newly recorded entries.
    pub fn record(&mut self, card: &Card) -> Vec<PendingInstruction> {
        let mut recorded = Vec::new();

        for instruction in card.instructions.iter().filter(|i| !i.targets_this_card()) {
            let entry = PendingInstruction {
                source: card.name.clone(),
                target: instruction.target_deck.clone(),
                tags: instruction.tags.to_vec(),
                face_down: instruction.face_down,
            };
            self.insert(entry.clone());
            recorded.push(entry);
        }

        recorded
    }

    /// Add one entry, applying the collision policy.
    pub fn insert(&mut self, entry: PendingInstruction) {
        let key = entry.target.to_ascii_lowercase();
        let index = self.history.len();
        self.history.push(entry);

        match self.policy {
            CollisionPolicy::FirstWins => {
                self.by_deck.entry(key).or_insert(index);
            }
            CollisionPolicy::LastWins => {
                self.by_deck.insert(key, index);
            }
        }
    }

    /// The winning instruction for a deck, if any.
    #[must_use]
    pub fn get(&self, deck_name: &str) -> Option<&PendingInstruction> {
        self.by_deck
            .get(&deck_name.to_ascii_lowercase())
            .and_then(|&i| self.history.get(i))
    }

    /// Requirement for `deck_name`: the winning pending instruction's tags,
    /// or `default_tags` when nothing targets the deck.
    #[must_use]
    pub fn resolve_requirement(&self, deck_name: &str, default_tags: &[String]) -> Resolution {
        match self.get(deck_name) {
            Some(pending) => Resolution {
                tags: pending.tags.clone(),
                source: Some(pending.source.clone()),
                face_down: pending.face_down,
            },
            None => Resolution {
                tags: default_tags.to_vec(),
                source: None,
                face_down: false,
            },
        }
    }

    /// All recorded entries in insertion order, including shadowed ones.
    #[must_use]
    pub fn history(&self) -> &[PendingInstruction] {
        &self.history
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.by_deck.clear();
    }
}
