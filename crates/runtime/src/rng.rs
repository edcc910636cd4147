//! `rand`-backed random sources for hosts.

use combat_core::RandomSource;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Adapts any [`rand::RngCore`] to the engine's [`RandomSource`].
#[derive(Clone, Debug)]
pub struct StdRandom<R = StdRng> {
    rng: R,
}

impl<R: RngCore> StdRandom<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl StdRandom<StdRng> {
    /// Reproducible source; the same seed replays the same battle.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when `seed` is set, from entropy otherwise.
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seed_from_u64(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: RngCore + Send> RandomSource for StdRandom<R> {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }
}
