//! Card records as authored in the content tools.
//!
//! A `Card` keeps its static tags (`TypeTags`, `AspectTags`) apart from the
//! `mutableTags` grown by Modify effects during a run. Field names follow
//! the authoring tool's JSON so stores load without a mapping layer.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Role, THIS_CARD};

/// Tag list stored on cards and instructions.
///
/// Most cards carry only a handful of tags.
pub type TagList = SmallVec<[String; 4]>;

/// Collect anything string-like into a `TagList`.
pub fn tag_list<I, S>(tags: I) -> TagList
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tags.into_iter().map(Into::into).collect()
}

/// What an instruction does when its card is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Constrain the draw of the target deck.
    #[default]
    Require,
    /// Change the tags of a card.
    Modify,
    /// Unrecognized type from authored data; only its deck routing applies.
    #[serde(other)]
    Other,
}

/// Modify operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifyOp {
    Add,
    #[serde(other)]
    Other,
}

/// A deferred effect a card exerts on later draws or on cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Deck (role) name, or `ThisCard`.
    #[serde(rename = "TargetDeck", alias = "InstructionDeck")]
    pub target_deck: String,

    #[serde(rename = "Tags", alias = "InstructionTags", default)]
    pub tags: TagList,

    /// Card drawn under this instruction is presented face down.
    #[serde(rename = "faceDown", default)]
    pub face_down: bool,

    #[serde(rename = "Type", default)]
    pub kind: InstructionKind,

    #[serde(rename = "Subtype", default)]
    pub subtype: Option<ModifyOp>,
}

impl Instruction {
    /// Requirement on a later deck's draw.
    #[must_use]
    pub fn require<I, S>(target_deck: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_deck: target_deck.into(),
            tags: tag_list(tags),
            face_down: false,
            kind: InstructionKind::Require,
            subtype: None,
        }
    }

    /// Modify effect adding tags to the target.
    #[must_use]
    pub fn modify_add<I, S>(target_deck: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_deck: target_deck.into(),
            tags: tag_list(tags),
            face_down: false,
            kind: InstructionKind::Modify,
            subtype: Some(ModifyOp::Add),
        }
    }

    /// Mark the instruction face down (builder pattern).
    #[must_use]
    pub fn with_face_down(mut self) -> Self {
        self.face_down = true;
        self
    }

    #[must_use]
    pub fn targets_this_card(&self) -> bool {
        self.target_deck.eq_ignore_ascii_case(THIS_CARD)
    }

    #[must_use]
    pub fn is_modify_add(&self) -> bool {
        self.kind == InstructionKind::Modify && self.subtype == Some(ModifyOp::Add)
    }

    /// Role addressed by the target deck name, if any.
    #[must_use]
    pub fn target_role(&self) -> Option<Role> {
        Role::from_instruction_name(&self.target_deck)
    }
}

/// One authored content unit.
///
/// ## Example
///
/// ```
/// use quest_engine::cards::{Card, Instruction};
///
/// let raider = Card::new("Raider")
///     .with_type_tags(["Evil Monster"])
///     .with_instruction(Instruction::require("Location", ["Perilous"]));
///
/// assert_eq!(raider.name, "Raider");
/// assert!(raider.mutable_tags.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "CardName")]
    pub name: String,

    /// Display-only label of the originating deck type.
    #[serde(rename = "Deck", default)]
    pub deck: String,

    #[serde(rename = "TypeTags", default)]
    pub type_tags: TagList,

    #[serde(rename = "AspectTags", default)]
    pub aspect_tags: TagList,

    /// Grown by Modify effects; never shrinks within a run.
    #[serde(rename = "mutableTags", default)]
    pub mutable_tags: TagList,

    #[serde(rename = "Instructions", default)]
    pub instructions: SmallVec<[Instruction; 1]>,

    /// Tags a drawn Target must satisfy (Verb cards).
    #[serde(rename = "TargetRequirement", default)]
    pub target_requirement: TagList,
}

impl Card {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_deck(mut self, deck: impl Into<String>) -> Self {
        self.deck = deck.into();
        self
    }

    #[must_use]
    pub fn with_type_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_aspect_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aspect_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_target_requirement<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_requirement.extend(tags.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Append tags to `mutableTags`. Duplicates are kept.
    pub fn add_mutable_tags(&mut self, tags: &[String]) {
        self.mutable_tags.extend(tags.iter().cloned());
    }
}
