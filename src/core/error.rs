//! Error types for the quest engine.

use thiserror::Error;

use crate::quest::QuestStage;

#[derive(Error, Debug)]
pub enum QuestError {
    /// A mandatory stage had nothing to draw from. The run is aborted.
    #[error("stage {stage} aborted: deck '{deck}' is empty")]
    EmptyDeck { stage: QuestStage, deck: String },

    /// A step-through call arrived in the wrong state.
    #[error("cannot run {attempted} while the engine is in {current}")]
    OutOfOrder {
        attempted: QuestStage,
        current: QuestStage,
    },

    #[error("card store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("engine state codec error: {0}")]
    Codec(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, QuestError>;
