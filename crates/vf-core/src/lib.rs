//! `vf-core` — foundational types for the venue-funnel ingress simulator.
//!
//! This crate is a dependency of every other `vf-*` crate.  It has no `vf-*`
//! dependencies and only small external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `GroupId`, `PathId`, `LaneId`, `CheckpointId` |
//! | [`time`]        | `SimTime` (virtual seconds)                               |
//! | [`rng`]         | `SimRng`: the single shared random stream                |
//! | [`dist`]        | `Categorical<T>`, `DelaySpec`                             |
//! | [`transport`]   | `TransportMode` enum                                      |
//! | [`config`]      | `IngressConfig` and its sections, `validate()`            |
//! | [`error`]       | `ConfigError`, `ConfigResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config, ids, and enums.  |

pub mod config;
pub mod dist;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    CheckpointSpec, DescentConfig, GroupSizeSpec, IngressConfig, PathSpec, SecurityConfig,
    TransportOption, WalkingConfig,
};
pub use dist::{Categorical, DelaySpec};
pub use error::{ConfigError, ConfigResult};
pub use ids::{CheckpointId, EntityId, GroupId, LaneId, PathId};
pub use rng::SimRng;
pub use time::SimTime;
pub use transport::TransportMode;
