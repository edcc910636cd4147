//! Injectable random sources for turn order jitter, critical rolls and AI draws.
//!
//! Every random decision in a battle goes through [`RandomSource`], which the
//! host passes in at construction time. Seeding the source makes a whole
//! battle reproducible, which is what tests and replays rely on.

/// Source of randomness for combat mechanics.
///
/// Implementations must be deterministic for a given seed.
pub trait RandomSource: Send {
    /// Generate the next random u32 value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform value in `[0, 100)`.
    ///
    /// Common for percentage-based mechanics like critical chance.
    fn roll_percent(&mut self) -> f64 {
        self.next_f64() * 100.0
    }

    /// Returns true with probability `percent / 100`.
    ///
    /// `percent <= 0` never succeeds, `percent >= 100` always does.
    fn chance(&mut self, percent: f64) -> bool {
        self.roll_percent() < percent
    }

    /// Pick an index with probability proportional to its weight.
    ///
    /// Returns None if all weights are zero.
    fn pick_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut roll = u64::from(self.next_u32()) % total;
        for (index, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if roll < weight {
                return Some(index);
            }
            roll -= weight;
        }
        None
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR variant: 64-bit LCG state, 32-bit permuted output.
/// Small, fast, and good enough statistically for game mechanics.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a seed.
    ///
    /// The seed is run through one avalanche round so that nearby seeds
    /// (0, 1, 2, ...) start from unrelated states.
    pub fn new(seed: u64) -> Self {
        let mut hash = seed ^ 0x9e3779b97f4a7c15;
        hash ^= hash >> 33;
        hash = hash.wrapping_mul(0xff51afd7ed558ccd);
        hash ^= hash >> 33;
        Self { state: hash }
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PcgRng::new(7);
        let mut b = PcgRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = PcgRng::new(1);
        let mut b = PcgRng::new(2);
        let left: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn unit_interval_is_half_open() {
        let mut rng = PcgRng::new(42);
        for _ in 0..1000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn chance_edges() {
        let mut rng = PcgRng::new(3);
        for _ in 0..200 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(100.0));
        }
    }

    #[test]
    fn weighted_pick_skips_zero_weights() {
        let mut rng = PcgRng::new(11);
        for _ in 0..200 {
            assert_eq!(rng.pick_weighted(&[0, 5, 0]), Some(1));
        }
        assert_eq!(rng.pick_weighted(&[0, 0]), None);
        assert_eq!(rng.pick_weighted(&[]), None);
    }
}
