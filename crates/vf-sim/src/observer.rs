//! Run observer trait for progress reporting and streaming collection.

use vf_core::SimTime;
use vf_model::Group;

use crate::{EntityRecord, SystemSnapshot};

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] as
/// events are dispatched.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers see state; they can never
/// change it, so attaching one does not alter a run.
///
/// # Example: completion counter
///
/// ```rust,ignore
/// struct Counter(u32);
///
/// impl SimObserver for Counter {
///     fn on_entity_completed(&mut self, _record: &EntityRecord) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// A group reached the perimeter; its members start next.
    fn on_group_arrival(&mut self, _now: SimTime, _group: &Group) {}

    /// An entity finished descending.  The record is final.
    fn on_entity_completed(&mut self, _record: &EntityRecord) {}

    /// The monitor appended a snapshot.
    fn on_snapshot(&mut self, _snapshot: &SystemSnapshot) {}

    /// Dispatch stopped at the horizon.
    fn on_run_end(&mut self, _horizon: SimTime, _completed: u32) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
