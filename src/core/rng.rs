//! Deterministic random number generation for quest draws.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical draw sequence
//! - **Serializable**: O(1) state capture and restore, so a step-through
//!   run can be suspended and resumed mid-pipeline
//!
//! ```
//! use quest_engine::core::QuestRng;
//!
//! let mut rng = QuestRng::new(42);
//! let first = rng.pick_index(10);
//!
//! let mut replay = QuestRng::new(42);
//! assert_eq!(first, replay.pick_index(10));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backing every deck draw.
///
/// Uses ChaCha8 for speed while keeping a position counter that can be
/// captured and restored.
#[derive(Clone, Debug)]
pub struct QuestRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl QuestRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pick a uniform index in `0..len`.
    ///
    /// Returns `None` for `len == 0` (nothing to draw from).
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..len))
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> QuestRngState {
        QuestRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &QuestRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many draws have been made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
