//! `vf-engine` — the discrete-event kernel: a virtual clock with an ordered
//! event queue, and finite-capacity resources with strict FIFO waiting.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`scheduler`]  | `EventScheduler<E>` (`BinaryHeap` keyed by (time, seq)) |
//! | [`resource`]   | `ResourcePool<W>`, `Grant`                              |
//! | [`error`]      | `EngineError`, `EngineResult<T>`                        |
//!
//! # Dispatch model (summary)
//!
//! ```text
//! loop:
//!   (t, seq, event) = earliest entry in the queue
//!   if t >= until: stop, clock := until
//!   clock := t
//!   dispatch(event)        # may schedule more events at t + delay, delay ≥ 0
//! ```
//!
//! Ties at the same `t` dispatch in scheduling order (`seq`), so a run is a
//! pure function of its inputs.  The engine knows nothing about what an event
//! means; the caller's dispatch closure owns all domain state.

pub mod error;
pub mod resource;
pub mod scheduler;


pub use error::{EngineError, EngineResult};
pub use resource::{Grant, ResourcePool};
pub use scheduler::EventScheduler;
