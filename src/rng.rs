//! Randomness for termination draws and neighbor choice.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Uniform draws consumed by the walk sampler.
///
/// Implementations are owned by exactly one walk executor at a time; concurrent workers each
/// get their own instance.
pub trait RandomSource {
    /// A float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// An index in `[0, n)`, every value equally likely.
    ///
    /// # Panics
    ///
    /// May panic if `n == 0`.
    fn next_index(&mut self, n: usize) -> usize;
}

/// Deterministic [`RandomSource`] backed by ChaCha8.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Independent stream for one worker of a batch.
    ///
    /// Depends only on `(seed, worker)`, so a batch is reproducible for a fixed seed no
    /// matter how threads get scheduled.
    pub fn for_worker(seed: u64, worker: usize) -> Self {
        Self::new(mix64(seed ^ ((worker as u64) << 32) ^ worker as u64))
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_index(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }
}

/// SplitMix64 finalizer.
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}
