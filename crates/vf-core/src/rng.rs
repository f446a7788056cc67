//! The single shared random stream.
//!
//! # Determinism strategy
//!
//! A run owns exactly one `SimRng`, seeded from the configuration.  Every
//! stochastic draw in the model goes through it, and draws happen only on the
//! scheduler's dispatch path, so the stream is consumed in event-dispatch
//! order.  Same seed + same configuration ⇒ same draws in the same order ⇒
//! identical output.
//!
//! Independent replications each get their own `SimRng`, seeded with
//! [`SimRng::derive_seed`] so replication `i` is stable regardless of how
//! many replications run alongside it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, StandardNormal};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-wide deterministic RNG.
///
/// Deliberately not `Clone`: two copies of the stream would silently
/// duplicate draws.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed for replication `index` of a sweep rooted at `base`.
    pub fn derive_seed(base: u64, index: u64) -> u64 {
        base ^ index.wrapping_add(1).wrapping_mul(MIXING_CONSTANT)
    }

    /// Sample from any `rand` distribution.
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.0)
    }

    /// `true` with probability `p`.  `p` must already be validated to [0, 1].
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        debug_assert!((0.0..=1.0).contains(&p), "probability {p} outside [0, 1]");
        self.0.gen_bool(p)
    }

    /// Uniform on `[lo, hi)`; a degenerate range (`hi <= lo`) returns `lo`
    /// without consuming a draw.
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..hi)
    }

    /// Exponentially distributed with the given mean.
    #[inline]
    pub fn exponential(&mut self, mean: f64) -> f64 {
        let unit: f64 = Exp1.sample(&mut self.0);
        unit * mean
    }

    /// Normally distributed with the given mean and standard deviation.
    #[inline]
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.0);
        mean + std_dev * z
    }
}
