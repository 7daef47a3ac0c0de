//! Tag evaluation: effective tag sets and requirement matching.
//!
//! A requirement matches a card when it is empty (no constraint) or when it
//! shares at least one tag with the card's current tags.

use std::collections::BTreeSet;

use super::card::Card;

/// Union of a card's type, aspect and mutable tags.
#[must_use]
pub fn current_tags(card: &Card) -> BTreeSet<&str> {
    card.type_tags
        .iter()
        .chain(card.aspect_tags.iter())
        .chain(card.mutable_tags.iter())
        .map(String::as_str)
        .collect()
}

/// Required tags present in `actual`, in requirement order.
#[must_use]
pub fn intersects(required: &[String], actual: &BTreeSet<&str>) -> Vec<String> {
    required
        .iter()
        .filter(|tag| actual.contains(tag.as_str()))
        .cloned()
        .collect()
}

/// Does `card` satisfy `required`?
#[must_use]
pub fn matches(required: &[String], card: &Card) -> bool {
    required.is_empty() || !matched_tags(required, card).is_empty()
}

/// Overlap between `required` and the card's current tags.
#[must_use]
pub fn matched_tags(required: &[String], card: &Card) -> Vec<String> {
    intersects(required, &current_tags(card))
}
