use thiserror::Error;

/// Engine failures.  Apart from `InvalidDelay` these are invariant
/// violations: the run is no longer in a valid state and must stop.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid delay {0}: delays must be finite and non-negative")]
    InvalidDelay(f64),

    #[error("resource {0:?} released without a matching acquire")]
    ReleaseWithoutAcquire(String),

    #[error("resource {0:?} created with zero capacity")]
    ZeroCapacity(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
