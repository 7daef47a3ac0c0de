//! Quest pipeline tests.
//!
//! These tests drive the full engine over small decks:
//! - End-to-end generation and abort behavior
//! - Pending-instruction precedence across stages
//! - Reset semantics and shared mutable tags
//! - Step-through and saved-state drivers

use quest_engine::cards::{Card, CardStore, Instruction};
use quest_engine::core::{EngineConfig, MutationScope, QuestError, Role, THIS_CARD};
use quest_engine::quest::{EngineState, LogData, LogLevel, QuestEngine, QuestStage};

fn scenario_store() -> CardStore {
    CardStore::from_json(
        r#"{
            "verbs": [{"CardName": "Defend", "TargetRequirement": ["Evil Monster"]}],
            "targets": [{"CardName": "Raider", "TypeTags": ["Evil Monster"]}],
            "locations": [{"CardName": "Fort", "TypeTags": []}],
            "twists": [{"CardName": "Storm", "TypeTags": []}],
            "rewards": [{"CardName": "Gold"}],
            "failures": [{"CardName": "Death"}]
        }"#,
    )
    .expect("scenario JSON should parse")
}

fn varied_store() -> CardStore {
    CardStore::new()
        .with_deck(
            "verbs",
            [
                Card::new("Defend").with_target_requirement(["Evil Monster"]),
                Card::new("Escort").with_target_requirement(["Ally"]),
                Card::new("Hunt").with_target_requirement(["Beast"]),
            ],
        )
        .with_deck(
            "targets",
            [
                Card::new("Raider")
                    .with_type_tags(["Evil Monster"])
                    .with_instruction(Instruction::require("Location", ["Perilous"])),
                Card::new("Merchant").with_type_tags(["Ally"]),
                Card::new("Wolf")
                    .with_type_tags(["Beast"])
                    .with_instruction(Instruction::modify_add(THIS_CARD, ["Hungry"])),
            ],
        )
        .with_deck(
            "locations",
            [
                Card::new("Fort").with_type_tags(["Stone"]),
                Card::new("Swamp").with_aspect_tags(["Perilous"]),
                Card::new("Market"),
            ],
        )
        .with_deck("twists", [Card::new("Storm"), Card::new("Betrayal")])
        .with_deck("rewards", [Card::new("Gold"), Card::new("Title")])
        .with_deck("failures", [Card::new("Death"), Card::new("Exile")])
}

/// The single-card scenario is fully determined.
#[test]
fn test_end_to_end_single_card_decks() {
    let mut engine = QuestEngine::with_store(scenario_store());

    let quest = engine.generate_quest(None).expect("quest should generate");

    assert_eq!(quest.name(Role::Verb), Some("Defend"));
    assert_eq!(quest.name(Role::Target), Some("Raider"));
    assert_eq!(quest.name(Role::Location), Some("Fort"));
    assert_eq!(quest.name(Role::Twist), Some("Storm"));
    assert_eq!(quest.name(Role::Reward), Some("Gold"));
    assert_eq!(quest.name(Role::Failure), Some("Death"));

    let summary = engine.quest_summary();
    assert_eq!(summary.verb.as_deref(), Some("Defend"));
    assert_eq!(summary.target_tags, vec!["Evil Monster".to_string()]);
    assert_eq!(summary.stats.fallbacks_triggered, 0);
    assert_eq!(engine.stage(), QuestStage::Complete);
}

/// An empty Target deck aborts the run; the partial quest stays readable.
#[test]
fn test_empty_targets_aborts() {
    let store = scenario_store().with_deck("targets", Vec::<Card>::new());
    let mut engine = QuestEngine::with_store(store);

    let err = engine.generate_quest(None).unwrap_err();

    match err {
        QuestError::EmptyDeck { stage, deck } => {
            assert_eq!(stage, QuestStage::DrawTarget);
            assert_eq!(deck, "targets");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(engine.quest().target.is_none());
    assert_eq!(engine.quest().name(Role::Verb), Some("Defend"));
    assert_eq!(engine.stage(), QuestStage::Aborted(Role::Target));
    assert!(engine.logs().iter().any(|e| e.level == LogLevel::Error));
}

/// A missing Verb deck aborts before anything is drawn.
#[test]
fn test_missing_verb_deck_aborts() {
    let mut engine = QuestEngine::with_store(CardStore::new());

    let err = engine.generate_quest(None).unwrap_err();

    assert!(matches!(err, QuestError::EmptyDeck { stage: QuestStage::DrawVerb, .. }));
    assert!(engine.quest().verb.is_none());
    assert_eq!(engine.stage(), QuestStage::Aborted(Role::Verb));
}

/// A Target's instruction for Location overrides the empty default.
#[test]
fn test_pending_instruction_sets_location_requirement() {
    let store = varied_store();
    let defend = store.card("verbs", 0).cloned().expect("Defend exists");
    let mut engine = QuestEngine::with_store(store);

    for seed_run in 0..20 {
        engine.generate_quest(Some(defend.clone())).expect("quest should generate");
        if engine.quest().name(Role::Target) != Some("Raider") {
            continue;
        }

        let location_requirement = engine.run_log().data().find_map(|d| match d {
            LogData::Requirement { deck, tags, source } if deck == "Location" => {
                Some((tags.clone(), source.clone()))
            }
            _ => None,
        });
        assert_eq!(
            location_requirement,
            Some((vec!["Perilous".to_string()], Some("Raider".to_string()))),
            "run {seed_run}"
        );
        return;
    }
    panic!("Raider was never drawn as target");
}

/// Without instructions, Location and later stages are unconstrained.
#[test]
fn test_location_does_not_inherit_target_requirement() {
    let mut engine = QuestEngine::with_store(scenario_store());
    engine.generate_quest(None).unwrap();

    let requirements: Vec<_> = engine
        .run_log()
        .data()
        .filter_map(|d| match d {
            LogData::Requirement { deck, tags, source } => Some((deck.clone(), tags.clone(), source.clone())),
            _ => None,
        })
        .collect();

    assert_eq!(requirements.len(), 5);
    assert_eq!(requirements[0], ("Target".to_string(), vec!["Evil Monster".to_string()], None));
    for (deck, tags, source) in &requirements[1..] {
        assert!(tags.is_empty(), "{deck} should be unconstrained");
        assert!(source.is_none());
    }
}

/// A supplied Verb is used instead of drawing.
#[test]
fn test_specific_verb() {
    let mut engine = QuestEngine::with_store(varied_store());
    let hunt = Card::new("Hunt").with_target_requirement(["Beast"]);

    let quest = engine.generate_quest(Some(hunt)).unwrap();

    let verb = quest.verb.expect("verb is set");
    assert_eq!(verb.name(), "Hunt");
    assert_eq!(verb.index, None);
}

/// Runs do not share quest modifications, but shared mutable tags persist.
#[test]
fn test_reset_between_runs_with_shared_tags() {
    let store = scenario_store().with_deck(
        "targets",
        [Card::new("Raider")
            .with_type_tags(["Evil Monster"])
            .with_instruction(Instruction::modify_add(THIS_CARD, ["Wounded"]))],
    );
    let mut engine = QuestEngine::with_store(store);

    let first = engine.generate_quest(None).unwrap();
    let first_log_len = engine.logs().len();
    let second = engine.generate_quest(None).unwrap();

    assert_eq!(first.modifications.len(), 1);
    assert_eq!(second.modifications.len(), 1);
    assert_eq!(engine.stats().modify_effects_applied, 1);
    assert_eq!(engine.logs().len(), first_log_len);
    assert_eq!(engine.logs()[0].timestamp, 0);

    // Shared scope: the store card has been tagged by both runs.
    assert_eq!(engine.store().card("targets", 0).unwrap().mutable_tags.len(), 2);
    assert_eq!(second.target.unwrap().card.mutable_tags.len(), 2);
}

/// Isolated scope gives every run the pristine store.
#[test]
fn test_isolated_runs_are_repeatable() {
    let store = scenario_store().with_deck(
        "targets",
        [Card::new("Raider")
            .with_type_tags(["Evil Monster"])
            .with_instruction(Instruction::modify_add(THIS_CARD, ["Wounded"]))],
    );
    let config = EngineConfig::default().with_mutation_scope(MutationScope::Isolated);
    let mut engine = QuestEngine::new(store, config);

    let first = engine.generate_quest(None).unwrap();
    let second = engine.generate_quest(None).unwrap();

    assert_eq!(first, second);
}

/// Step-through and full run produce the same quest for the same seed.
#[test]
fn test_step_through_matches_full_run() {
    let config = EngineConfig::default().with_seed(99);
    let mut full = QuestEngine::new(varied_store(), config.clone());
    let mut stepped = QuestEngine::new(varied_store(), config);

    full.generate_quest(None).unwrap();

    stepped.step_draw_verb(None).unwrap();
    stepped.step_draw_target().unwrap();
    stepped.step_draw_location().unwrap();
    stepped.step_draw_twist().unwrap();
    stepped.step_draw_reward_and_failure().unwrap();

    assert_eq!(full.quest_summary(), stepped.quest_summary());
    assert_eq!(full.logs(), stepped.logs());
}

/// A run suspended to bytes resumes exactly where it left off.
#[test]
fn test_saved_state_resumes_run() {
    let config = EngineConfig::default().with_seed(7);
    let mut original = QuestEngine::new(varied_store(), config.clone());
    original.step_draw_verb(None).unwrap();
    original.step_draw_target().unwrap();

    let bytes = original.state().to_bytes().unwrap();
    let store = original.store().clone();

    original.step_draw_location().unwrap();
    original.step_draw_twist().unwrap();
    original.step_draw_reward_and_failure().unwrap();

    let state = EngineState::from_bytes(&bytes).unwrap();
    let mut resumed = QuestEngine::restore(store, config, state);
    assert_eq!(resumed.stage(), QuestStage::DrawTarget);

    resumed.step_draw_location().unwrap();
    resumed.step_draw_twist().unwrap();
    resumed.step_draw_reward_and_failure().unwrap();

    assert_eq!(original.quest(), resumed.quest());
    assert_eq!(original.stats(), resumed.stats());
}

/// Steps after completion need a new run.
#[test]
fn test_completed_run_rejects_further_steps() {
    let mut engine = QuestEngine::with_store(scenario_store());
    engine.generate_quest(None).unwrap();

    assert!(matches!(
        engine.step_draw_twist(),
        Err(QuestError::OutOfOrder { current: QuestStage::Complete, .. })
    ));

    engine.step_draw_verb(None).unwrap();
    assert_eq!(engine.stage(), QuestStage::DrawVerb);
    assert!(engine.quest().target.is_none());
}
