//! Draw resolution with bounded retries and a fallback.
//!
//! A constrained draw picks uniformly (with replacement) from the deck.
//! A card matching the requirement is accepted; otherwise the draw is
//! rejected and retried. The final attempt accepts whatever comes up.
//! With the default budget of 4 that is three rejections, then a fallback.

use crate::cards::{matched_tags, Deck};
use crate::core::QuestRng;

use super::log::{DrawOutcome, LogData, RunLog, RunStats};
use super::stage::QuestStage;

/// Mutable run state a draw writes to.
pub struct DrawContext<'a> {
    pub rng: &'a mut QuestRng,
    pub log: &'a mut RunLog,
    pub stats: &'a mut RunStats,
}

/// A settled draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawResult {
    /// Index of the chosen card in the deck.
    pub index: usize,
    /// Attempts used, including the accepted one.
    pub attempts: u32,
    pub outcome: DrawOutcome,
}

/// Bounded-retry draw policy.
#[derive(Clone, Copy, Debug)]
pub struct DrawResolver {
    max_attempts: u32,
}

impl Default for DrawResolver {
    fn default() -> Self {
        Self::new(4)
    }
}

impl DrawResolver {
    /// Create a resolver; `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draw a card satisfying `required`, falling back on the last attempt.
    ///
    /// Returns `None` only when the deck is empty. Every attempt increments
    /// `draw_attempts` and logs one entry. An empty deck logs nothing; the
    /// caller decides whether that is fatal.
    pub fn draw_with_fallback(
        &self,
        deck: &Deck,
        required: &[String],
        stage: QuestStage,
        label: &str,
        ctx: &mut DrawContext<'_>,
    ) -> Option<DrawResult> {
        for attempt in 1..=self.max_attempts {
            let Some((index, card)) = ctx
                .rng
                .pick_index(deck.len())
                .and_then(|i| deck.get(i).map(|card| (i, card)))
            else {
                return None;
            };
            ctx.stats.draw_attempts += 1;

            let matched = matched_tags(required, card);
            let final_attempt = attempt == self.max_attempts;
            let outcome = if required.is_empty() || (!final_attempt && !matched.is_empty()) {
                DrawOutcome::Accepted
            } else if final_attempt {
                ctx.stats.fallbacks_triggered += 1;
                DrawOutcome::Fallback
            } else {
                DrawOutcome::Rejected
            };

            let message = match outcome {
                DrawOutcome::Accepted if required.is_empty() => {
                    format!("{label} attempt {attempt}: {outcome} {} (no requirement)", card.name)
                }
                DrawOutcome::Accepted => format!(
                    "{label} attempt {attempt}: {outcome} {} (matched {})",
                    card.name,
                    matched.join(", ")
                ),
                _ => format!(
                    "{label} attempt {attempt}: {outcome} {} (required any of {})",
                    card.name,
                    required.join(", ")
                ),
            };
            ctx.log.debug(
                stage,
                message,
                LogData::Draw {
                    attempt,
                    card: card.name.clone(),
                    outcome,
                    required: required.to_vec(),
                    matched,
                },
            );

            if outcome != DrawOutcome::Rejected {
                return Some(DrawResult {
                    index,
                    attempts: attempt,
                    outcome,
                });
            }
        }

        None
    }
}
