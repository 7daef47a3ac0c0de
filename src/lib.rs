//! # quest-engine
//!
//! Assembles quests (Verb, Target, Location, Twist, Reward, Failure) from
//! independently authored decks of tagged cards.
//!
//! ## Design Principles
//!
//! 1. **Constrained random draws**: Each stage draws from its deck under a
//!    tag requirement, retrying a bounded number of times before accepting
//!    any card.
//!
//! 2. **Deferred instructions**: Cards drawn early leave requirements for
//!    later decks in a ledger; Modify effects grow cards' mutable tags.
//!
//! 3. **Explicit state**: The pipeline is a finite-state machine with
//!    serializable state, so full runs and step-through debugging share
//!    one driver.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: The card store uses `im` so per-run
//!   snapshots are O(1) and copy-on-write.
//!
//! - **Deterministic RNG**: ChaCha8 seeded from configuration; same seed
//!   and store give the same quest.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors
//! - `cards`: Card records, tag evaluation, card store
//! - `quest`: Ledger, draw resolver, Modify effects, engine, run log

pub mod core;
pub mod cards;
pub mod quest;

// Re-export commonly used types
pub use crate::core::{
    DeckNames, EngineConfig, MutationScope, QuestError, QuestRng, QuestRngState, Result, Role,
    THIS_CARD,
};

pub use crate::cards::{
    current_tags, intersects, matches, Card, CardSnapshot, CardStore, Deck, Instruction,
    InstructionKind, ModifyOp, TagList,
};

pub use crate::quest::{
    CollisionPolicy, DrawOutcome, DrawResolver, DrawnCard, EngineState, LogData, LogEntry,
    LogLevel, PendingInstruction, PendingLedger, Quest, QuestEngine, QuestStage, QuestSummary,
    RunLog, RunStats, LEDGER_COLLISION_POLICY,
};
