//! Injected randomness.
//!
//! Everything stochastic in the match (shot noise, pass requests, pot shots,
//! regulator jitter) draws from a [`RandomSource`] owned by the world, so a
//! seed fully determines a match and tests can script the draws.

use std::fmt::Debug;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource: Debug {
    /// Uniform in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[lo, hi]`. Bounds are swapped when reversed.
    fn next_int(&mut self, lo: i32, hi: i32) -> i32;

    /// Difference of two unit draws, in `(-1, 1)`.
    fn next_clamped(&mut self) -> f64 {
        self.next_unit() - self.next_unit()
    }
}

/// Seeded ChaCha8 source used for real matches.
#[derive(Debug, Clone)]
pub struct SimRng(ChaCha8Rng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
        let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
        self.0.gen_range(lo..=hi)
    }
}

/// Deterministic sources for unit tests. Downstream crates enable the
/// `testing` feature to script draws in their own tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use std::collections::VecDeque;

    use super::RandomSource;

    /// Returns the same unit value forever. Integers map the unit value onto
    /// the requested range, so `0.0` always yields `lo`.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedRandom {
        pub unit: f64,
    }

    impl FixedRandom {
        pub fn new(unit: f64) -> Self {
            Self {
                unit: unit.clamp(0.0, 0.999_999),
            }
        }
    }

    impl RandomSource for FixedRandom {
        fn next_unit(&mut self) -> f64 {
            self.unit
        }

        fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
            let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
            let span = (hi - lo + 1) as f64;
            (lo + (span * self.unit).floor() as i32).min(hi)
        }
    }

    /// Plays back queued draws, then falls back to a fixed source.
    /// Scripted integers are clamped into the requested range.
    #[derive(Debug, Clone)]
    pub struct ScriptedRandom {
        units: VecDeque<f64>,
        ints: VecDeque<i32>,
        fallback: FixedRandom,
    }

    impl ScriptedRandom {
        pub fn new(units: impl IntoIterator<Item = f64>, ints: impl IntoIterator<Item = i32>) -> Self {
            Self {
                units: units.into_iter().collect(),
                ints: ints.into_iter().collect(),
                fallback: FixedRandom::new(0.5),
            }
        }

        pub fn with_fallback(mut self, fallback: FixedRandom) -> Self {
            self.fallback = fallback;
            self
        }

        pub fn remaining(&self) -> (usize, usize) {
            (self.units.len(), self.ints.len())
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_unit(&mut self) -> f64 {
            self.units
                .pop_front()
                .unwrap_or_else(|| self.fallback.next_unit())
        }

        fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
            let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
            match self.ints.pop_front() {
                Some(v) => v.clamp(lo, hi),
                None => self.fallback.next_int(lo, hi),
            }
        }
    }
}
