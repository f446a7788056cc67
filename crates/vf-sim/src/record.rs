//! The two read-only outputs of a run: per-entity records and the snapshot
//! series.

use std::fmt;

use vf_core::{CheckpointId, EntityId, GroupId, LaneId, PathId, SimTime, TransportMode};
use vf_model::DescentMode;

/// Furthest point an entity reached.  Anything other than `Completed` in a
/// finished run means the horizon cut the entity off.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Group arrival not yet dispatched.
    Scheduled,
    Arrived,
    Transporting,
    Walking,
    AwaitingSecurity,
    InSecurity,
    /// Screened, but the lane went down and is still held.
    LaneOutage,
    AwaitingDescent,
    Descending,
    Completed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Scheduled        => "scheduled",
            Phase::Arrived          => "arrived",
            Phase::Transporting     => "transporting",
            Phase::Walking          => "walking",
            Phase::AwaitingSecurity => "awaiting_security",
            Phase::InSecurity       => "in_security",
            Phase::LaneOutage       => "lane_outage",
            Phase::AwaitingDescent  => "awaiting_descent",
            Phase::Descending       => "descending",
            Phase::Completed        => "completed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── EntityRecord ──────────────────────────────────────────────────────────────

/// Timing breakdown for one entity.  Durations are seconds; phases the
/// entity never reached stay at zero / `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityRecord {
    pub entity:     EntityId,
    pub group:      GroupId,
    pub group_size: u32,
    pub path:       PathId,
    pub arrival:    SimTime,

    pub transport_mode:        Option<TransportMode>,
    pub transport_delay_secs:  f64,
    /// Time spent walking, excluding disturbance.
    pub walk_secs:             f64,
    /// Part of `walk_secs` caused by congestion.
    pub congestion_delay_secs: f64,
    pub disturbance_secs:      f64,

    pub checkpoint:            Option<CheckpointId>,
    pub lane:                  Option<LaneId>,
    pub security_wait_secs:    f64,
    /// All service samples, failed attempts included.
    pub security_process_secs: f64,
    pub screening_failures:    u32,
    pub outage_hold_secs:      f64,

    pub descent_mode:         Option<DescentMode>,
    pub descent_wait_secs:    f64,
    pub descent_process_secs: f64,

    pub finish:    Option<SimTime>,
    pub completed: bool,
    pub phase:     Phase,
}

impl EntityRecord {
    pub(crate) fn new(entity: EntityId, group: GroupId, group_size: u32, path: PathId, arrival: SimTime) -> Self {
        Self {
            entity,
            group,
            group_size,
            path,
            arrival,
            transport_mode:        None,
            transport_delay_secs:  0.0,
            walk_secs:             0.0,
            congestion_delay_secs: 0.0,
            disturbance_secs:      0.0,
            checkpoint:            None,
            lane:                  None,
            security_wait_secs:    0.0,
            security_process_secs: 0.0,
            screening_failures:    0,
            outage_hold_secs:      0.0,
            descent_mode:          None,
            descent_wait_secs:     0.0,
            descent_process_secs:  0.0,
            finish:                None,
            completed:             false,
            phase:                 Phase::Scheduled,
        }
    }

    /// Arrival to finish, for completed entities.
    pub fn total_secs(&self) -> Option<f64> {
        self.finish.map(|f| f.since(self.arrival))
    }
}

// ── SystemSnapshot ────────────────────────────────────────────────────────────

/// Lane totals for one checkpoint group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CheckpointSample {
    pub queued: usize,
    /// Lanes held, by screening or by an outage.
    pub in_use: usize,
    pub lanes:  usize,
}

/// One security lane, in `LaneId` order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneSample {
    pub queued: usize,
    /// 0 or 1.
    pub in_use: usize,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathSample {
    pub occupancy: u32,
    pub density:   f64,
}

/// One monitor reading of every pool and path.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemSnapshot {
    pub time:               SimTime,
    pub checkpoints:        Vec<CheckpointSample>,
    pub lanes:              Vec<LaneSample>,
    pub escalator_queued:   usize,
    pub escalator_in_use:   usize,
    pub escalator_capacity: usize,
    pub stairs_in_use:      usize,
    /// Persons on the stairs per metre of width.
    pub stairs_density:     f64,
    pub paths:              Vec<PathSample>,
    /// Entities completed so far.
    pub completed:          u32,
}

/// Everything a finished run hands to reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOutput {
    /// One per entity, ordered by id.
    pub records:   Vec<EntityRecord>,
    /// In time order.
    pub snapshots: Vec<SystemSnapshot>,
}

impl SimOutput {
    pub fn completed(&self) -> usize {
        self.records.iter().filter(|r| r.completed).count()
    }
}
