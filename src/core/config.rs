//! Engine configuration types.
//!
//! Callers configure the engine at construction by providing:
//! - `DeckNames`: which card-store deck feeds each quest role
//! - `EngineConfig`: draw budget, seed, ledger and mutation policies
//!
//! The engine never hardcodes store keys; the defaults match the
//! authoring tool's deck names.

use serde::{Deserialize, Serialize};

use crate::quest::ledger::{CollisionPolicy, LEDGER_COLLISION_POLICY};

/// Instruction target naming the drawn card itself.
pub const THIS_CARD: &str = "ThisCard";

/// One slot of a quest. Each role is filled from its own deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Verb,
    Target,
    Location,
    Twist,
    Reward,
    Failure,
}

impl Role {
    /// All roles in pipeline order.
    pub const ALL: [Role; 6] = [
        Role::Verb,
        Role::Target,
        Role::Location,
        Role::Twist,
        Role::Reward,
        Role::Failure,
    ];

    /// Name used by card instructions to address this role's deck.
    #[must_use]
    pub const fn instruction_name(self) -> &'static str {
        match self {
            Role::Verb => "Verb",
            Role::Target => "Target",
            Role::Location => "Location",
            Role::Twist => "Twist",
            Role::Reward => "Reward",
            Role::Failure => "Failure",
        }
    }

    /// Parse an instruction target, case-insensitively.
    #[must_use]
    pub fn from_instruction_name(name: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| role.instruction_name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.instruction_name())
    }
}

/// Card-store deck key for every role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckNames {
    pub verbs: String,
    pub targets: String,
    pub locations: String,
    pub twists: String,
    pub rewards: String,
    pub failures: String,
}

impl Default for DeckNames {
    fn default() -> Self {
        Self {
            verbs: "verbs".to_string(),
            targets: "targets".to_string(),
            locations: "locations".to_string(),
            twists: "twists".to_string(),
            rewards: "rewards".to_string(),
            failures: "failures".to_string(),
        }
    }
}

impl DeckNames {
    /// Store key for a role.
    #[must_use]
    pub fn for_role(&self, role: Role) -> &str {
        match role {
            Role::Verb => &self.verbs,
            Role::Target => &self.targets,
            Role::Location => &self.locations,
            Role::Twist => &self.twists,
            Role::Reward => &self.rewards,
            Role::Failure => &self.failures,
        }
    }
}

/// Whether Modify effects outlive the run that applied them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationScope {
    /// Mutable tags accumulate on the engine's store across runs.
    #[default]
    Shared,
    /// Every run starts from the pristine store snapshot.
    Isolated,
}

/// Engine configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Random seed for deck draws.
    /// Same seed and store produce identical quests.
    pub seed: u64,

    /// Draws per constrained resolution, the last one being the fallback.
    /// Clamped to at least 1.
    pub max_draw_attempts: u32,

    /// Store keys for each role.
    pub decks: DeckNames,

    /// Which pending instruction wins when several target the same deck.
    pub collision_policy: CollisionPolicy,

    /// Lifetime of Modify effects.
    pub mutation_scope: MutationScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_draw_attempts: 4,
            decks: DeckNames::default(),
            collision_policy: LEDGER_COLLISION_POLICY,
            mutation_scope: MutationScope::Shared,
        }
    }
}

impl EngineConfig {
    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom draw budget.
    #[must_use]
    pub fn with_max_draw_attempts(mut self, attempts: u32) -> Self {
        self.max_draw_attempts = attempts.max(1);
        self
    }

    /// Create a new config with custom deck keys.
    #[must_use]
    pub fn with_decks(mut self, decks: DeckNames) -> Self {
        self.decks = decks;
        self
    }

    /// Create a new config with a custom ledger collision policy.
    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Create a new config with a custom mutation scope.
    #[must_use]
    pub fn with_mutation_scope(mut self, scope: MutationScope) -> Self {
        self.mutation_scope = scope;
        self
    }
}
