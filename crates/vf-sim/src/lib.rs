//! `vf-sim` — the simulation context and per-entity flow for the
//! venue-funnel simulator.
//!
//! # Entity flow
//!
//! ```text
//! group arrival ─→ one Start per member (zero delay, member order)
//!   ① Transport   — draw mode and delay, sleep
//!   ② Walk        — sample path density, fix speed, sleep walk + disturbance
//!   ③ Security    — pick tent and lane, queue, screen until a pass,
//!                   maybe hold the lane through an outage, release
//!   ④ Descent     — pick escalator or stairs against the live queue,
//!                   queue, hold for the crossing time, release
//!   ⑤ Completed   — record finalised
//! ```
//!
//! A released pool unit passes straight to the head of its queue, and that
//! waiter resumes through a zero-delay event, so the releasing entity always
//! finishes its own step first.  The monitor samples every pool and path at
//! a fixed interval from t = 0.
//!
//! All randomness comes from one [`SimRng`][vf_core::SimRng] consumed in
//! dispatch order: group generation at build time, then each handler's
//! draws as it runs.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | [`run_replications`] runs replications on Rayon's pool.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use vf_core::IngressConfig;
//! use vf_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(IngressConfig::baseline()).build()?;
//! sim.run(&mut NoopObserver)?;
//! let output = sim.finish();
//! ```

pub mod builder;
pub mod error;
pub mod monitor;
pub mod observer;
mod process;
pub mod record;
pub mod replication;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use monitor::Monitor;
pub use observer::{NoopObserver, SimObserver};
pub use record::{CheckpointSample, EntityRecord, LaneSample, PathSample, Phase, SimOutput, SystemSnapshot};
pub use replication::{run_once, run_replications};
pub use sim::{SimEvent, Simulation};
