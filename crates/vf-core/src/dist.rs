//! Discrete and delay distributions built from configuration.

use rand::distributions::WeightedIndex;

use crate::{ConfigError, ConfigResult, SimRng};

/// Probability vectors must sum to 1 within this tolerance.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Reject a probability vector that is empty, has an entry outside [0, 1],
/// or does not sum to 1.
pub fn check_probabilities(what: &str, probs: &[f64]) -> ConfigResult<()> {
    if probs.is_empty() {
        return Err(ConfigError::Empty { what: what.to_owned() });
    }
    for &p in probs {
        check_probability(what, p)?;
    }
    let sum: f64 = probs.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ConfigError::ProbabilitySum { what: what.to_owned(), sum });
    }
    Ok(())
}

/// Reject a scalar probability outside [0, 1] (NaN included).
pub fn check_probability(what: &str, p: f64) -> ConfigResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ConfigError::ProbabilityRange { what: what.to_owned(), value: p });
    }
    Ok(())
}

// ── Categorical ───────────────────────────────────────────────────────────────

/// A finite distribution over `T` values.  One draw per `sample`.
#[derive(Clone, Debug)]
pub struct Categorical<T> {
    outcomes: Vec<T>,
    index:    WeightedIndex<f64>,
}

impl<T> Categorical<T> {
    /// Build from `(outcome, probability)` pairs.  The probabilities must
    /// already form a distribution; they are not renormalised.
    pub fn new(what: &str, pairs: impl IntoIterator<Item = (T, f64)>) -> ConfigResult<Self> {
        let (outcomes, probs): (Vec<T>, Vec<f64>) = pairs.into_iter().unzip();
        check_probabilities(what, &probs)?;
        let index = WeightedIndex::new(&probs)
            .map_err(|e| ConfigError::Invalid(format!("{what}: {e}")))?;
        Ok(Self { outcomes, index })
    }

    /// Draw an outcome index.
    #[inline]
    pub fn sample_index(&self, rng: &mut SimRng) -> usize {
        rng.sample(&self.index)
    }

    /// Draw an outcome.
    #[inline]
    pub fn sample(&self, rng: &mut SimRng) -> &T {
        &self.outcomes[self.sample_index(rng)]
    }

    pub fn outcomes(&self) -> &[T] {
        &self.outcomes
    }
}

// ── DelaySpec ─────────────────────────────────────────────────────────────────

/// A non-negative random delay, in seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DelaySpec {
    /// No delay and no draw.
    None,
    Fixed { secs: f64 },
    /// Uniform on `[min_secs, max_secs)`.
    Uniform { min_secs: f64, max_secs: f64 },
    /// Normal, clamped below at zero.
    Normal { mean_secs: f64, std_secs: f64 },
    Exponential { mean_secs: f64 },
}

impl DelaySpec {
    /// Draw one delay.  `None` and `Fixed` consume nothing from the stream.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        match *self {
            DelaySpec::None => 0.0,
            DelaySpec::Fixed { secs } => secs,
            DelaySpec::Uniform { min_secs, max_secs } => rng.uniform(min_secs, max_secs),
            DelaySpec::Normal { mean_secs, std_secs } => rng.normal(mean_secs, std_secs).max(0.0),
            DelaySpec::Exponential { mean_secs } => rng.exponential(mean_secs),
        }
    }

    pub fn validate(&self, what: &str) -> ConfigResult<()> {
        match *self {
            DelaySpec::None => Ok(()),
            DelaySpec::Fixed { secs } => check_non_negative(what, secs),
            DelaySpec::Uniform { min_secs, max_secs } => check_range(what, min_secs, max_secs),
            DelaySpec::Normal { mean_secs, std_secs } => {
                check_non_negative(&format!("{what} mean"), mean_secs)?;
                check_non_negative(&format!("{what} std"), std_secs)
            }
            DelaySpec::Exponential { mean_secs } => check_positive(what, mean_secs),
        }
    }
}

// ── Scalar checks shared with `config` ────────────────────────────────────────

pub(crate) fn check_non_negative(what: &str, value: f64) -> ConfigResult<()> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(ConfigError::Negative { what: what.to_owned(), value });
    }
    Ok(())
}

pub(crate) fn check_positive(what: &str, value: f64) -> ConfigResult<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(ConfigError::NonPositive { what: what.to_owned(), value });
    }
    Ok(())
}

pub(crate) fn check_range(what: &str, min: f64, max: f64) -> ConfigResult<()> {
    check_non_negative(&format!("{what} min"), min)?;
    check_non_negative(&format!("{what} max"), max)?;
    if min > max {
        return Err(ConfigError::InvertedRange { what: what.to_owned(), min, max });
    }
    Ok(())
}
