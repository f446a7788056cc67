use thiserror::Error;

use vf_core::{ConfigError, EntityId};
use vf_engine::EngineError;
use vf_model::ModelError;

use crate::Phase;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("{entity} completed while still holding {resource}")]
    ResourceLeak {
        entity:   EntityId,
        resource: String,
    },

    #[error("{entity} tried to release {resource} without holding it")]
    ReleaseMismatch {
        entity:   EntityId,
        resource: String,
    },

    #[error("{entity} woken while {phase}, which has nothing pending")]
    UnexpectedResume {
        entity: EntityId,
        phase:  Phase,
    },
}

pub type SimResult<T> = Result<T, SimError>;
