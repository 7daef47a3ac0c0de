//! Card system: card records, tag evaluation, and the card store.
//!
//! ## Key Types
//!
//! - `Card`: Authored content unit with static and mutable tags
//! - `Instruction`: Deferred effect a card exerts on later draws
//! - `CardStore`: Named decks with versioned snapshots
//! - `tags`: Current-tag evaluation and requirement matching

pub mod card;
pub mod store;
pub mod tags;

pub use card::{tag_list, Card, Instruction, InstructionKind, ModifyOp, TagList};
pub use store::{CardSnapshot, CardStore, Deck};
pub use tags::{current_tags, intersects, matched_tags, matches};
