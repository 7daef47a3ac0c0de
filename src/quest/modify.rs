//! Modify-effect application.
//!
//! A `Modify`/`Add` instruction appends tags to a card's `mutableTags`:
//! - `ThisCard`: the card that carries the instruction
//! - a role already drawn this run: that role's card
//! - any other deck: nothing changes now. The effect is only logged as
//!   marked for that deck; the ledger carries it to the later draw.

use crate::cards::{CardStore, Instruction};
use crate::core::Role;

use super::ledger::PendingInstruction;
use super::log::{LogData, RunLog, RunStats};
use super::output::{AppliedModification, Quest};
use super::stage::QuestStage;

/// Run state touched by Modify effects.
pub struct ModifyContext<'a> {
    pub quest: &'a mut Quest,
    pub store: &'a mut CardStore,
    pub log: &'a mut RunLog,
    pub stats: &'a mut RunStats,
}

/// Apply every Modify/Add instruction of the card in `acting`'s slot.
///
/// Returns the instructions deferred to later decks. They are already
/// covered by the ledger and must not be recorded again.
pub fn apply_card_modifies(
    acting: Role,
    stage: QuestStage,
    ctx: &mut ModifyContext<'_>,
) -> Vec<PendingInstruction> {
    let instructions: Vec<Instruction> = match ctx.quest.slot(acting) {
        Some(drawn) => drawn.card.instructions.iter().filter(|i| i.is_modify_add()).cloned().collect(),
        None => return Vec::new(),
    };

    instructions
        .iter()
        .filter_map(|instruction| apply_modify(acting, stage, instruction, ctx))
        .collect()
}

/// Apply one instruction carried by the card in `acting`'s slot.
///
/// Returns the deferred instruction when the target is a deck not yet drawn.
pub fn apply_modify(
    acting: Role,
    stage: QuestStage,
    instruction: &Instruction,
    ctx: &mut ModifyContext<'_>,
) -> Option<PendingInstruction> {
    if !instruction.is_modify_add() {
        return None;
    }
    let source = ctx.quest.name(acting)?.to_string();
    let tags = instruction.tags.to_vec();

    let target_role = if instruction.targets_this_card() {
        Some(acting)
    } else {
        instruction
            .target_role()
            .filter(|role| ctx.quest.slot(*role).is_some())
    };

    match target_role.and_then(|role| add_tags(ctx, role, &tags)) {
        Some(target) => {
            ctx.stats.modify_effects_applied += 1;
            ctx.log.info(
                stage,
                format!("{source} adds [{}] to {target}", tags.join(", ")),
                Some(LogData::Modify {
                    source: source.clone(),
                    target: target.clone(),
                    tags: tags.clone(),
                }),
            );
            ctx.quest.modifications.push(AppliedModification {
                source,
                target,
                tags,
            });
            None
        }
        None => {
            ctx.log.info(
                stage,
                format!(
                    "{source}: [{}] marked for {}",
                    tags.join(", "),
                    instruction.target_deck
                ),
                Some(LogData::Modify {
                    source: source.clone(),
                    target: instruction.target_deck.clone(),
                    tags: tags.clone(),
                }),
            );
            Some(PendingInstruction {
                source,
                target: instruction.target_deck.clone(),
                tags,
                face_down: instruction.face_down,
            })
        }
    }
}

/// Add tags to the card in a slot and its store copy. Returns its name.
fn add_tags(ctx: &mut ModifyContext<'_>, role: Role, tags: &[String]) -> Option<String> {
    let drawn = ctx.quest.slot_mut(role).as_mut()?;
    drawn.card.add_mutable_tags(tags);
    if let Some(index) = drawn.index {
        ctx.store.add_mutable_tags(&drawn.deck, index, tags);
    }
    Some(drawn.card.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::core::THIS_CARD;
    use crate::quest::output::DrawnCard;

    struct Harness {
        quest: Quest,
        store: CardStore,
        log: RunLog,
        stats: RunStats,
    }

    impl Harness {
        fn new() -> Self {
            let store = CardStore::new()
                .with_deck("targets", [Card::new("Raider")])
                .with_deck("locations", [Card::new("Fort")]);
            Self {
                quest: Quest::new(),
                store,
                log: RunLog::new(),
                stats: RunStats::new(),
            }
        }

        fn place(&mut self, role: Role, deck: &str) {
            let card = self.store.card(deck, 0).unwrap().clone();
            *self.quest.slot_mut(role) = Some(DrawnCard {
                card,
                deck: deck.to_string(),
                index: Some(0),
                face_down: false,
            });
        }

        fn apply(&mut self, acting: Role, instruction: &Instruction) -> Option<PendingInstruction> {
            let mut ctx = ModifyContext {
                quest: &mut self.quest,
                store: &mut self.store,
                log: &mut self.log,
                stats: &mut self.stats,
            };
            apply_modify(acting, QuestStage::for_role(acting), instruction, &mut ctx)
        }
    }

    #[test]
    fn test_this_card_updates_slot_and_store() {
        let mut h = Harness::new();
        h.place(Role::Target, "targets");

        let deferred = h.apply(Role::Target, &Instruction::modify_add(THIS_CARD, ["Wounded"]));

        assert!(deferred.is_none());
        assert_eq!(h.stats.modify_effects_applied, 1);
        assert_eq!(h.quest.target.as_ref().unwrap().card.mutable_tags.to_vec(), vec!["Wounded".to_string()]);
        assert_eq!(h.store.card("targets", 0).unwrap().mutable_tags.len(), 1);
        assert_eq!(h.quest.modifications.len(), 1);
        assert_eq!(h.quest.modifications[0].target, "Raider");
    }

    #[test]
    fn test_already_drawn_role_is_modified() {
        let mut h = Harness::new();
        h.place(Role::Target, "targets");
        h.place(Role::Location, "locations");

        let deferred = h.apply(Role::Location, &Instruction::modify_add("target", ["Cornered"]));

        assert!(deferred.is_none());
        assert_eq!(h.quest.target.as_ref().unwrap().tags(), vec!["Cornered".to_string()]);
        assert!(h.quest.location.as_ref().unwrap().card.mutable_tags.is_empty());
        assert_eq!(h.quest.modifications[0].source, "Fort");
    }

    #[test]
    fn test_own_role_named_explicitly_is_modified() {
        let mut h = Harness::new();
        h.place(Role::Target, "targets");

        let deferred = h.apply(Role::Target, &Instruction::modify_add("Target", ["Cornered"]));

        assert!(deferred.is_none());
        assert_eq!(h.stats.modify_effects_applied, 1);
        assert_eq!(h.quest.target.as_ref().unwrap().card.mutable_tags.to_vec(), vec!["Cornered".to_string()]);
        assert_eq!(h.store.card("targets", 0).unwrap().mutable_tags.to_vec(), vec!["Cornered".to_string()]);
        assert_eq!(h.quest.modifications.len(), 1);
        assert_eq!(h.quest.modifications[0].target, "Raider");
    }

    #[test]
    fn test_later_deck_is_only_marked() {
        let mut h = Harness::new();
        h.place(Role::Target, "targets");

        let deferred = h.apply(Role::Target, &Instruction::modify_add("Location", ["Burning"])).unwrap();

        assert_eq!(deferred.target, "Location");
        assert_eq!(deferred.tags, vec!["Burning".to_string()]);
        assert_eq!(h.stats.modify_effects_applied, 0);
        assert!(h.quest.modifications.is_empty());
        assert!(h.store.card("locations", 0).unwrap().mutable_tags.is_empty());
        assert!(h.log.entries()[0].message.contains("marked for Location"));
    }

    #[test]
    fn test_requirements_are_ignored() {
        let mut h = Harness::new();
        h.place(Role::Target, "targets");

        assert!(h.apply(Role::Target, &Instruction::require(THIS_CARD, ["x"])).is_none());
        assert!(h.log.is_empty());
        assert_eq!(h.stats.modify_effects_applied, 0);
    }

    #[test]
    fn test_apply_card_modifies_runs_each_instruction() {
        let mut h = Harness::new();
        let card = Card::new("Raider")
            .with_instruction(Instruction::modify_add(THIS_CARD, ["Wounded"]))
            .with_instruction(Instruction::require("Twist", ["Storm"]))
            .with_instruction(Instruction::modify_add("Reward", ["Cursed"]));
        h.quest.target = Some(DrawnCard {
            card,
            deck: "targets".into(),
            index: Some(0),
            face_down: false,
        });

        let mut ctx = ModifyContext {
            quest: &mut h.quest,
            store: &mut h.store,
            log: &mut h.log,
            stats: &mut h.stats,
        };
        let deferred = apply_card_modifies(Role::Target, QuestStage::DrawTarget, &mut ctx);

        assert_eq!(deferred.len(), 1);
        assert_eq!(deferred[0].target, "Reward");
        assert_eq!(h.stats.modify_effects_applied, 1);
    }
}
