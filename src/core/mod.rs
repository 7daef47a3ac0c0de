//! Core engine types: RNG, configuration, errors.
//!
//! These are shared by the card store and the quest pipeline.

pub mod rng;
pub mod config;
pub mod error;

pub use rng::{QuestRng, QuestRngState};
pub use config::{DeckNames, EngineConfig, MutationScope, Role, THIS_CARD};
pub use error::{QuestError, Result};
