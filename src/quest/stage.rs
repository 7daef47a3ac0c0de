//! Pipeline stages of a quest run.
//!
//! The engine is a linear state machine:
//!
//! ```text
//! Idle → DrawVerb → DrawTarget → DrawLocation → DrawTwist
//!      → DrawRewardAndFailure → Complete
//! ```
//!
//! The engine's current stage is the last step that ran to completion.
//! A mandatory draw that finds no card moves the run to `Aborted(role)`.

use serde::{Deserialize, Serialize};

use crate::core::Role;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestStage {
    #[default]
    Idle,
    DrawVerb,
    DrawTarget,
    DrawLocation,
    DrawTwist,
    DrawRewardAndFailure,
    Complete,
    /// Run stopped because the role's deck had nothing to draw.
    Aborted(Role),
}

impl QuestStage {
    /// Stage that must have completed before this one may run.
    ///
    /// `DrawVerb` starts a run, so it has none.
    #[must_use]
    pub const fn predecessor(self) -> Option<QuestStage> {
        match self {
            QuestStage::DrawTarget => Some(QuestStage::DrawVerb),
            QuestStage::DrawLocation => Some(QuestStage::DrawTarget),
            QuestStage::DrawTwist => Some(QuestStage::DrawLocation),
            QuestStage::DrawRewardAndFailure => Some(QuestStage::DrawTwist),
            QuestStage::Complete => Some(QuestStage::DrawRewardAndFailure),
            _ => None,
        }
    }

    /// No further steps can run without a reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, QuestStage::Complete | QuestStage::Aborted(_))
    }

    /// The stage that draws a role.
    #[must_use]
    pub const fn for_role(role: Role) -> QuestStage {
        match role {
            Role::Verb => QuestStage::DrawVerb,
            Role::Target => QuestStage::DrawTarget,
            Role::Location => QuestStage::DrawLocation,
            Role::Twist => QuestStage::DrawTwist,
            Role::Reward | Role::Failure => QuestStage::DrawRewardAndFailure,
        }
    }
}

impl std::fmt::Display for QuestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestStage::Idle => f.write_str("Idle"),
            QuestStage::DrawVerb => f.write_str("DrawVerb"),
            QuestStage::DrawTarget => f.write_str("DrawTarget"),
            QuestStage::DrawLocation => f.write_str("DrawLocation"),
            QuestStage::DrawTwist => f.write_str("DrawTwist"),
            QuestStage::DrawRewardAndFailure => f.write_str("DrawRewardAndFailure"),
            QuestStage::Complete => f.write_str("Complete"),
            QuestStage::Aborted(role) => write!(f, "Aborted({role})"),
        }
    }
}
