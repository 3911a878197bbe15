//! Offset sources for uniform random selection.
//!
//! `random_one` counts the matches and asks an [`OffsetSource`] for a position in `[0, count)`.
//! Injecting the source makes the distribution testable.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait OffsetSource: Send + Sync {
    /// Returns an offset in `[0, count)`. Callers never pass `count == 0`.
    fn pick(&self, count: u64) -> u64;
}

/// Draws from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngOffsets;

impl OffsetSource for ThreadRngOffsets {
    fn pick(&self, count: u64) -> u64 {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Deterministic source seeded once; reproducible sequences for tests and tooling.
pub struct SeededOffsets {
    rng: Mutex<StdRng>,
}

impl SeededOffsets {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl OffsetSource for SeededOffsets {
    fn pick(&self, count: u64) -> u64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..count)
    }
}
