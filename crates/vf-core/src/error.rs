//! Configuration errors.
//!
//! Raised once, when a configuration is validated at simulation
//! construction.  Nothing downstream clamps or renormalises a rejected value.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{what} probabilities sum to {sum}, expected 1")]
    ProbabilitySum { what: String, sum: f64 },

    #[error("{what} probability {value} is outside [0, 1]")]
    ProbabilityRange { what: String, value: f64 },

    #[error("{what} must not be negative (got {value})")]
    Negative { what: String, value: f64 },

    #[error("{what} range is inverted: min {min} > max {max}")]
    InvertedRange { what: String, min: f64, max: f64 },

    #[error("{what} must be positive (got {value})")]
    NonPositive { what: String, value: f64 },

    #[error("{what} must not be empty")]
    Empty { what: String },

    #[error("configuration error: {0}")]
    Invalid(String),
}

/// Shorthand result type for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;
