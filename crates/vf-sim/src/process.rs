//! Per-entity flow state.
//!
//! An entity is an explicit state machine rather than a coroutine: each
//! suspension point (timer or resource grant) is a [`Step`] variant, and the
//! simulation advances the entity when its `Resume` event is dispatched.
//!
//! ```text
//! Scheduled → Arrived → Transporting → Walking → [AwaitingLane] → Screening ⟲
//!   → [Outage] → [AwaitingDescent] → Descending → Completed
//! ```
//!
//! Bracketed steps are skipped when the pool grants at once or no outage
//! is drawn.
//!
//! At most one `Resume` is ever pending per entity: either a timer, or a
//! queued request whose grant schedules it.

use std::fmt;

use vf_core::{EntityId, LaneId, PathId, SimTime};
use vf_model::{DescentMode, Group};

use crate::{EntityRecord, Phase};

/// Where an entity is suspended and what its next `Resume` means.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Step {
    Scheduled,
    /// Group dispatched; waiting for its own start event.
    Arrived,
    Transporting,
    Walking(PathId),
    AwaitingLane(LaneId),
    /// One service sample running; `passed` says whether it is the last.
    Screening { lane: LaneId, passed: bool },
    Outage(LaneId),
    AwaitingDescent(DescentMode),
    Descending(DescentMode),
    Completed,
}

impl Step {
    pub(crate) fn phase(self) -> Phase {
        match self {
            Step::Scheduled          => Phase::Scheduled,
            Step::Arrived            => Phase::Arrived,
            Step::Transporting       => Phase::Transporting,
            Step::Walking(_)         => Phase::Walking,
            Step::AwaitingLane(_)    => Phase::AwaitingSecurity,
            Step::Screening { .. }   => Phase::InSecurity,
            Step::Outage(_)          => Phase::LaneOutage,
            Step::AwaitingDescent(_) => Phase::AwaitingDescent,
            Step::Descending(_)      => Phase::Descending,
            Step::Completed          => Phase::Completed,
        }
    }
}

/// A pool unit the entity currently holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Held {
    Lane(LaneId),
    Descent(DescentMode),
}

impl fmt::Display for Held {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Held::Lane(lane)    => write!(f, "security {lane}"),
            Held::Descent(mode) => write!(f, "the {mode}"),
        }
    }
}

/// Live state of one entity plus the record it is filling in.
#[derive(Clone, Debug)]
pub(crate) struct EntityProcess {
    pub(crate) step:         Step,
    pub(crate) held:         Option<Held>,
    /// When the pending pool request was made.
    pub(crate) requested_at: SimTime,
    pub(crate) record:       EntityRecord,
}

impl EntityProcess {
    pub(crate) fn new(entity: EntityId, group: &Group) -> Self {
        Self {
            step:         Step::Scheduled,
            held:         None,
            requested_at: SimTime::ZERO,
            record:       EntityRecord::new(entity, group.id, group.size() as u32, group.path, group.arrival),
        }
    }

    pub(crate) fn id(&self) -> EntityId {
        self.record.entity
    }

    /// Members of multi-person groups pay the coordination penalty.
    pub(crate) fn in_group(&self) -> bool {
        self.record.group_size > 1
    }

    pub(crate) fn set_step(&mut self, step: Step) {
        self.step = step;
        self.record.phase = step.phase();
    }

    pub(crate) fn acquire(&mut self, resource: Held) {
        debug_assert!(self.held.is_none(), "{} already holds {:?}", self.id(), self.held);
        self.held = Some(resource);
    }

    /// Clears the hold on `resource`, or returns `false` if it is not the
    /// one held.
    pub(crate) fn relinquish(&mut self, resource: Held) -> bool {
        if self.held == Some(resource) {
            self.held = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn into_record(self) -> EntityRecord {
        self.record
    }
}
