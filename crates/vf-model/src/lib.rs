//! `vf-model` — the domain policies an entity consults on its way through
//! the funnel.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`arrival`]    | `ArrivalGenerator`, `Group`: population split and arrival draws |
//! | [`transport`]  | `TransportModel`: mode choice and perimeter delay              |
//! | [`congestion`] | `CongestionLaw`, `PathNetwork`, `Walk`: density-driven speed   |
//! | [`security`]   | `SecurityCheckpoints`, `SecurityPolicy`: tent/lane choice, retries, outages |
//! | [`descent`]    | `DescentFacilities`, `DescentPolicy`, `DescentMode`             |
//! | [`error`]      | `ModelError`, `ModelResult<T>`                                  |
//!
//! # Design notes
//!
//! Policies are plain data plus pure decision functions over the current
//! resource state and the shared [`SimRng`][vf_core::SimRng].  They never
//! schedule events and never hold an entity's place in a queue on their own:
//! `vf-sim` sequences the calls and owns the suspension points.  Every
//! method that draws from the RNG documents how many draws it makes, because
//! draw order is part of the determinism contract.

pub mod arrival;
pub mod congestion;
pub mod descent;
pub mod error;
pub mod security;
pub mod transport;


pub use arrival::{ArrivalGenerator, Group};
pub use congestion::{CongestionLaw, PathNetwork, PathSegment, Walk};
pub use descent::{DescentFacilities, DescentMode, DescentPolicy};
pub use error::{ModelError, ModelResult};
pub use security::{CheckpointGroup, SecurityCheckpoints, SecurityPolicy};
pub use transport::TransportModel;
