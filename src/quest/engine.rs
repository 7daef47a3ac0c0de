//! The quest engine: a finite-state driver over the draw pipeline.
//!
//! `generate_quest` runs every stage in order. The `step_*` methods run
//! one stage each against the same state, for step-through debugging.
//! Both drivers go through the same transitions, so a step-through run and
//! a full run with the same seed and store produce the same quest.
//!
//! ## Card mutations
//!
//! Modify effects write to the engine's working store. Under
//! `MutationScope::Shared` those writes persist across runs (a reset clears
//! quest, log, stats and ledger but not mutable tags). Under
//! `MutationScope::Isolated` every reset restores the store given at
//! construction.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardStore, Deck};
use crate::core::{EngineConfig, MutationScope, QuestError, QuestRng, QuestRngState, Result, Role};

use super::draw::{DrawContext, DrawResolver};
use super::ledger::PendingLedger;
use super::log::{LogData, LogEntry, RunLog, RunStats};
use super::modify::{apply_card_modifies, ModifyContext};
use super::output::{DrawnCard, Quest, QuestSummary};
use super::stage::QuestStage;

/// Quest generation engine.
///
/// ## Example
///
/// ```
/// use quest_engine::cards::{Card, CardStore};
/// use quest_engine::quest::QuestEngine;
///
/// let store = CardStore::new()
///     .with_deck("verbs", [Card::new("Defend").with_target_requirement(["Evil Monster"])])
///     .with_deck("targets", [Card::new("Raider").with_type_tags(["Evil Monster"])])
///     .with_deck("locations", [Card::new("Fort")])
///     .with_deck("twists", [Card::new("Storm")])
///     .with_deck("rewards", [Card::new("Gold")])
///     .with_deck("failures", [Card::new("Death")]);
///
/// let mut engine = QuestEngine::with_store(store);
/// let quest = engine.generate_quest(None).unwrap();
///
/// assert_eq!(quest.target.unwrap().name(), "Raider");
/// assert_eq!(engine.stats().fallbacks_triggered, 0);
/// ```
#[derive(Clone, Debug)]
pub struct QuestEngine {
    config: EngineConfig,
    resolver: DrawResolver,
    /// Store given at construction or by `set_store`.
    base: CardStore,
    /// Store draws read from and Modify effects write to.
    store: CardStore,
    rng: QuestRng,
    stage: QuestStage,
    quest: Quest,
    log: RunLog,
    stats: RunStats,
    ledger: PendingLedger,
}

impl QuestEngine {
    /// Create an engine over `store`.
    #[must_use]
    pub fn new(store: CardStore, config: EngineConfig) -> Self {
        Self {
            resolver: DrawResolver::new(config.max_draw_attempts),
            base: store.clone(),
            store,
            rng: QuestRng::new(config.seed),
            stage: QuestStage::Idle,
            quest: Quest::new(),
            log: RunLog::new(),
            stats: RunStats::new(),
            ledger: PendingLedger::new(config.collision_policy),
            config,
        }
    }

    /// Create an engine with the default configuration.
    #[must_use]
    pub fn with_store(store: CardStore) -> Self {
        Self::new(store, EngineConfig::default())
    }

    /// Rebuild an engine from a saved state.
    ///
    /// The state does not include cards; pass the store the run was using
    /// (for a shared-scope run, the engine's `store()` at capture time).
    ///
    /// The saved ledger keeps the collision policy its entries were recorded
    /// under. If `config` names a different one, the config is overridden.
    #[must_use]
    pub fn restore(store: CardStore, mut config: EngineConfig, state: EngineState) -> Self {
        let saved_policy = state.ledger.policy();
        if saved_policy != config.collision_policy {
            tracing::warn!(
                saved = ?saved_policy,
                configured = ?config.collision_policy,
                "restored ledger keeps its saved collision policy"
            );
            config.collision_policy = saved_policy;
        }
        let mut engine = Self::new(store, config);
        engine.rng = QuestRng::from_state(&state.rng);
        engine.stage = state.stage;
        engine.quest = state.quest;
        engine.log = state.log;
        engine.stats = state.stats;
        engine.ledger = state.ledger;
        engine
    }

    /// Capture the run state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        EngineState {
            stage: self.stage,
            quest: self.quest.clone(),
            log: self.log.clone(),
            stats: self.stats.clone(),
            ledger: self.ledger.clone(),
            rng: self.rng.state(),
        }
    }

    /// Swap in new decks (e.g. after an import). Resets the current run.
    pub fn set_store(&mut self, store: CardStore) {
        self.base = store.clone();
        self.store = store;
        self.reset();
    }

    /// Return to `Idle`, clearing quest, log, stats and ledger.
    pub fn reset(&mut self) {
        self.stage = QuestStage::Idle;
        self.quest = Quest::new();
        self.log.clear();
        self.stats.reset();
        self.ledger.clear();
        if self.config.mutation_scope == MutationScope::Isolated {
            self.store = self.base.clone();
        }
    }

    /// Run the whole pipeline once.
    ///
    /// Starts a fresh run. Fails if Verb, Target, Location or Twist cannot
    /// be drawn; the partial quest stays readable through `quest()`.
    pub fn generate_quest(&mut self, specific_verb: Option<Card>) -> Result<Quest> {
        self.step_draw_verb(specific_verb)?;
        self.step_draw_target()?;
        self.step_draw_location()?;
        self.step_draw_twist()?;
        self.step_draw_reward_and_failure()?;
        Ok(self.quest.clone())
    }

    /// Draw (or take) the Verb. Starts a fresh run if one is under way.
    ///
    /// The Verb is a single uniform draw, not subject to the fallback
    /// policy.
    pub fn step_draw_verb(&mut self, specific_verb: Option<Card>) -> Result<()> {
        if self.stage != QuestStage::Idle {
            self.reset();
        }
        let stage = QuestStage::DrawVerb;
        let deck_name = self.config.decks.verbs.clone();

        let drawn = match specific_verb {
            Some(card) => {
                self.log.info(stage, format!("Using supplied verb {}", card.name), None);
                DrawnCard {
                    card,
                    deck: deck_name,
                    index: None,
                    face_down: false,
                }
            }
            None => {
                let empty = Deck::new();
                let deck = self.store.deck(&deck_name).unwrap_or(&empty);
                let Some((index, card)) = self
                    .rng
                    .pick_index(deck.len())
                    .and_then(|i| deck.get(i).map(|card| (i, card.clone())))
                else {
                    return Err(self.abort(Role::Verb, deck_name));
                };
                self.log.info(stage, format!("Drew verb {}", card.name), None);
                DrawnCard {
                    card,
                    deck: deck_name,
                    index: Some(index),
                    face_down: false,
                }
            }
        };

        self.log_drawn(stage, &drawn);
        self.record_pending(stage, &drawn.card);
        self.quest.verb = Some(drawn);
        self.stage = stage;
        Ok(())
    }

    /// Draw the Target, constrained by the Verb's requirement unless a
    /// pending instruction targets `Target`.
    pub fn step_draw_target(&mut self) -> Result<()> {
        self.expect_stage(QuestStage::DrawTarget)?;
        let default_tags = self
            .quest
            .verb
            .as_ref()
            .map(|v| v.card.target_requirement.to_vec())
            .unwrap_or_default();
        self.draw_mandatory(Role::Target, &default_tags)?;
        self.stage = QuestStage::DrawTarget;
        Ok(())
    }

    /// Draw the Location. Unconstrained unless an instruction targets it.
    pub fn step_draw_location(&mut self) -> Result<()> {
        self.expect_stage(QuestStage::DrawLocation)?;
        self.draw_mandatory(Role::Location, &[])?;
        self.stage = QuestStage::DrawLocation;
        Ok(())
    }

    /// Draw the Twist. Unconstrained unless an instruction targets it.
    pub fn step_draw_twist(&mut self) -> Result<()> {
        self.expect_stage(QuestStage::DrawTwist)?;
        self.draw_mandatory(Role::Twist, &[])?;
        self.stage = QuestStage::DrawTwist;
        Ok(())
    }

    /// Draw Reward then Failure independently and complete the run.
    ///
    /// Either may be missing; that is logged and tolerated.
    pub fn step_draw_reward_and_failure(&mut self) -> Result<()> {
        self.expect_stage(QuestStage::DrawRewardAndFailure)?;
        for role in [Role::Reward, Role::Failure] {
            if self.draw_role(role, &[]).is_none() {
                let deck = self.config.decks.for_role(role).to_string();
                self.log.warn(
                    QuestStage::DrawRewardAndFailure,
                    format!("No {role} drawn from '{deck}'; continuing"),
                    Some(LogData::EmptyDeck { deck }),
                );
            }
        }
        self.stage = QuestStage::Complete;
        self.log.info(QuestStage::Complete, "Quest complete", None);
        Ok(())
    }

    fn expect_stage(&self, attempted: QuestStage) -> Result<()> {
        if attempted.predecessor() == Some(self.stage) {
            Ok(())
        } else {
            Err(QuestError::OutOfOrder {
                attempted,
                current: self.stage,
            })
        }
    }

    fn draw_mandatory(&mut self, role: Role, default_tags: &[String]) -> Result<()> {
        match self.draw_role(role, default_tags) {
            Some(()) => {
                self.apply_and_record(role);
                Ok(())
            }
            None => {
                let deck_name = self.config.decks.for_role(role).to_string();
                Err(self.abort(role, deck_name))
            }
        }
    }

    /// Resolve the requirement for `role`, draw, and fill its slot.
    fn draw_role(&mut self, role: Role, default_tags: &[String]) -> Option<()> {
        let stage = QuestStage::for_role(role);
        let resolution = self
            .ledger
            .resolve_requirement(role.instruction_name(), default_tags);

        let reason = match &resolution.source {
            Some(source) => format!("pending instruction from {source}"),
            None => "default".to_string(),
        };
        self.log.info(
            stage,
            format!("{role} requirement [{}] ({reason})", resolution.tags.join(", ")),
            Some(LogData::Requirement {
                deck: role.instruction_name().to_string(),
                tags: resolution.tags.clone(),
                source: resolution.source.clone(),
            }),
        );

        let deck_name = self.config.decks.for_role(role).to_string();
        let empty = Deck::new();
        let deck = self.store.deck(&deck_name).unwrap_or(&empty);
        let mut ctx = DrawContext {
            rng: &mut self.rng,
            log: &mut self.log,
            stats: &mut self.stats,
        };
        let result = self.resolver.draw_with_fallback(
            deck,
            &resolution.tags,
            stage,
            role.instruction_name(),
            &mut ctx,
        )?;
        let card = deck.get(result.index)?.clone();

        let drawn = DrawnCard {
            card,
            deck: deck_name,
            index: Some(result.index),
            face_down: resolution.face_down,
        };
        self.log_drawn(stage, &drawn);
        *self.quest.slot_mut(role) = Some(drawn);
        Some(())
    }

    fn apply_and_record(&mut self, role: Role) {
        let stage = QuestStage::for_role(role);
        let mut ctx = ModifyContext {
            quest: &mut self.quest,
            store: &mut self.store,
            log: &mut self.log,
            stats: &mut self.stats,
        };
        // Deferred effects reach later decks through `record_pending`.
        apply_card_modifies(role, stage, &mut ctx);

        if let Some(card) = self.quest.slot(role).map(|d| d.card.clone()) {
            self.record_pending(stage, &card);
        }
    }

    fn record_pending(&mut self, stage: QuestStage, card: &Card) {
        for pending in self.ledger.record(card) {
            self.log.info(
                stage,
                format!(
                    "{} leaves [{}] pending for {}",
                    pending.source,
                    pending.tags.join(", "),
                    pending.target
                ),
                Some(LogData::Pending {
                    source: pending.source,
                    target: pending.target,
                    tags: pending.tags,
                }),
            );
        }
    }

    fn log_drawn(&mut self, stage: QuestStage, drawn: &DrawnCard) {
        self.log.info(
            stage,
            format!("{stage}: {}", drawn.name()),
            Some(LogData::Drawn {
                card: drawn.name().to_string(),
                tags: drawn.tags(),
            }),
        );
    }

    fn abort(&mut self, role: Role, deck: String) -> QuestError {
        let stage = QuestStage::for_role(role);
        self.log.error(
            stage,
            format!("Aborting: no {role} could be drawn from '{deck}'"),
            Some(LogData::EmptyDeck { deck: deck.clone() }),
        );
        self.stage = QuestStage::Aborted(role);
        QuestError::EmptyDeck { stage, deck }
    }

    /// Current pipeline state.
    #[must_use]
    pub fn stage(&self) -> QuestStage {
        self.stage
    }

    /// The last completed or in-progress quest.
    #[must_use]
    pub fn quest(&self) -> &Quest {
        &self.quest
    }

    #[must_use]
    pub fn logs(&self) -> &[LogEntry] {
        self.log.entries()
    }

    #[must_use]
    pub fn run_log(&self) -> &RunLog {
        &self.log
    }

    #[must_use]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    #[must_use]
    pub fn ledger(&self) -> &PendingLedger {
        &self.ledger
    }

    /// Names and current tags of the quest, with run stats.
    #[must_use]
    pub fn quest_summary(&self) -> QuestSummary {
        self.quest.summary(&self.stats)
    }

    /// Working store, including mutations made so far.
    #[must_use]
    pub fn store(&self) -> &CardStore {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Serializable run state of a `QuestEngine`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub stage: QuestStage,
    pub quest: Quest,
    pub log: RunLog,
    pub stats: RunStats,
    pub ledger: PendingLedger,
    pub rng: QuestRngState,
}

impl EngineState {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
