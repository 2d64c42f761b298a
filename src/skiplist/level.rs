//! Level promotion policy
//!
//! Each new node gets a height drawn from a geometric distribution: keep
//! flipping a fair coin while it comes up heads, one level per head.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws node levels in `0..max_level`
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    max_level: usize,
    rng: StdRng,
}

impl LevelGenerator {
    /// Create a generator. `seed = None` seeds from OS entropy.
    pub fn new(max_level: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            max_level: max_level.max(1),
            rng,
        }
    }

    /// Draw a level. P(level = L) halves with each L; clamped to `max_level - 1`.
    pub fn random_level(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < self.max_level && self.rng.gen::<bool>() {
            level += 1;
        }
        level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }
}
