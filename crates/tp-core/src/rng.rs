//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! A run draws every random number from one `SimRng` seeded with
//! `SimConfig::seed`.  The draws happen in a fixed program order:
//!
//! 1. spawn positions (agent 0, then each later agent until collision-free),
//! 2. parent sampling for the initial dependency graph (ascending id),
//! 3. per tick: the dependency shuffle, then parent sampling for promotions.
//!
//! Because the whole run is single-threaded there is no need for per-agent
//! streams; the same seed always replays the same run.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// The single seeded randomness source of a run.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }

    /// Pick two distinct elements uniformly at random, without replacement.
    ///
    /// Returns `None` if the slice has fewer than two elements.
    pub fn choose_two<T: Copy>(&mut self, slice: &[T]) -> Option<(T, T)> {
        if slice.len() < 2 {
            return None;
        }
        let picked = rand::seq::index::sample(&mut self.0, slice.len(), 2);
        Some((slice[picked.index(0)], slice[picked.index(1)]))
    }
}
