//! Deterministic random number generation for locally originated shuffles.
//!
//! Randomness is only ever consumed by the peer that *originates* a shuffle.
//! Everything replicated over the log is a pure function of the recorded
//! shuffle descriptor, so the RNG never needs to be synchronized.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences for different purposes
//! - **Serializable**: O(1) state capture and restore

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a random index in `0..=max`.
    pub fn gen_index_inclusive(&mut self, max: usize) -> usize {
        self.inner.gen_range(0..=max)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for i in 0..100 {
            assert_eq!(rng1.gen_index_inclusive(i), rng2.gen_index_inclusive(i));
        }
    }

    #[test]
    fn test_index_in_range() {
        let mut rng = GameRng::new(7);
        for _ in 0..200 {
            assert!(rng.gen_index_inclusive(3) <= 3);
        }
        assert_eq!(rng.gen_index_inclusive(0), 0);
    }

    #[test]
    fn test_context_is_deterministic_and_distinct() {
        let rng = GameRng::new(42);
        let mut a1 = rng.for_context("shuffle");
        let mut a2 = GameRng::new(42).for_context("shuffle");
        let mut b = rng.for_context("tokens");

        let seq_a1: Vec<_> = (0..10).map(|_| a1.gen_index_inclusive(1000)).collect();
        let seq_a2: Vec<_> = (0..10).map(|_| a2.gen_index_inclusive(1000)).collect();
        let seq_b: Vec<_> = (0..10).map(|_| b.gen_index_inclusive(1000)).collect();

        assert_eq!(seq_a1, seq_a2);
        assert_ne!(seq_a1, seq_b);
    }

    #[test]
    fn test_state_restore() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.gen_index_inclusive(100);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_index_inclusive(100)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_index_inclusive(100)).collect();

        assert_eq!(expected, actual);
    }
}
