use thiserror::Error;

use vf_core::{ConfigError, PathId};
use vf_engine::EngineError;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("path {0} occupancy would go negative")]
    NegativeOccupancy(PathId),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type ModelResult<T> = Result<T, ModelError>;
