//! Quest generation: ledger, draw policy, Modify effects, and the engine.
//!
//! ## Key Types
//!
//! - `QuestEngine`: Finite-state driver for full runs and step-through
//! - `QuestStage`: Pipeline states
//! - `PendingLedger`: Deferred cross-deck requirements
//! - `DrawResolver`: Bounded-retry draw with fallback
//! - `Quest` / `QuestSummary`: Run output
//! - `RunLog` / `RunStats`: Diagnostics produced by a run

pub mod draw;
pub mod engine;
pub mod ledger;
pub mod log;
pub mod modify;
pub mod output;
pub mod stage;

pub use draw::{DrawContext, DrawResolver, DrawResult};
pub use engine::{EngineState, QuestEngine};
pub use ledger::{CollisionPolicy, PendingInstruction, PendingLedger, Resolution, LEDGER_COLLISION_POLICY};
pub use log::{DrawOutcome, LogData, LogEntry, LogLevel, RunLog, RunStats};
pub use modify::{apply_card_modifies, apply_modify, ModifyContext};
pub use output::{AppliedModification, DrawnCard, Quest, QuestSummary};
pub use stage::QuestStage;
