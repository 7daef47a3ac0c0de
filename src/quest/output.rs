//! Quest output: one card per role plus applied modifications.

use serde::{Deserialize, Serialize};

use crate::cards::{current_tags, Card};
use crate::core::Role;

use super::log::RunStats;

/// A card placed in a quest slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    /// The card as it stands now, including mutable tags added this run.
    pub card: Card,
    /// Store key of the deck it came from.
    pub deck: String,
    /// Position in that deck; `None` for a caller-supplied card.
    pub index: Option<usize>,
    /// Drawn under a face-down instruction.
    pub face_down: bool,
}

impl DrawnCard {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.card.name
    }

    /// Current tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        current_tags(&self.card).into_iter().map(str::to_string).collect()
    }
}

/// A Modify effect that changed a card during the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedModification {
    /// Card carrying the effect.
    pub source: String,
    /// Card that received the tags.
    pub target: String,
    pub tags: Vec<String>,
}

/// Output of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub verb: Option<DrawnCard>,
    pub target: Option<DrawnCard>,
    pub location: Option<DrawnCard>,
    pub twist: Option<DrawnCard>,
    pub reward: Option<DrawnCard>,
    pub failure: Option<DrawnCard>,
    pub modifications: Vec<AppliedModification>,
}

impl Quest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn slot(&self, role: Role) -> Option<&DrawnCard> {
        match role {
            Role::Verb => self.verb.as_ref(),
            Role::Target => self.target.as_ref(),
            Role::Location => self.location.as_ref(),
            Role::Twist => self.twist.as_ref(),
            Role::Reward => self.reward.as_ref(),
            Role::Failure => self.failure.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, role: Role) -> &mut Option<DrawnCard> {
        match role {
            Role::Verb => &mut self.verb,
            Role::Target => &mut self.target,
            Role::Location => &mut self.location,
            Role::Twist => &mut self.twist,
            Role::Reward => &mut self.reward,
            Role::Failure => &mut self.failure,
        }
    }

    /// Card name in a slot.
    #[must_use]
    pub fn name(&self, role: Role) -> Option<&str> {
        self.slot(role).map(DrawnCard::name)
    }

    /// Reduce to names and current tags.
    #[must_use]
    pub fn summary(&self, stats: &RunStats) -> QuestSummary {
        let name = |role: Role| self.name(role).map(str::to_string);
        let tags = |role: Role| self.slot(role).map(DrawnCard::tags).unwrap_or_default();

        QuestSummary {
            verb: name(Role::Verb),
            target: name(Role::Target),
            target_tags: tags(Role::Target),
            location: name(Role::Location),
            location_tags: tags(Role::Location),
            twist: name(Role::Twist),
            twist_tags: tags(Role::Twist),
            reward: name(Role::Reward),
            failure: name(Role::Failure),
            stats: stats.clone(),
        }
    }
}

/// Display and analytics view of a quest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSummary {
    pub verb: Option<String>,
    pub target: Option<String>,
    pub target_tags: Vec<String>,
    pub location: Option<String>,
    pub location_tags: Vec<String>,
    pub twist: Option<String>,
    pub twist_tags: Vec<String>,
    pub reward: Option<String>,
    pub failure: Option<String>,
    pub stats: RunStats,
}
