//! Periodic read-only sampling of pools and paths.

use vf_core::{CheckpointId, SimTime};
use vf_model::{DescentFacilities, PathNetwork, SecurityCheckpoints};

use crate::{CheckpointSample, LaneSample, PathSample, SystemSnapshot};

/// Reads live state every `interval_secs` from t = 0 until the horizon.
///
/// The monitor holds no references: the simulation passes it the pools at
/// each tick, and it only ever takes shared borrows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Monitor {
    pub interval_secs: f64,
}

impl Monitor {
    pub fn new(interval_secs: f64) -> Self {
        Self { interval_secs }
    }

    pub fn sample(
        &self,
        now:       SimTime,
        security:  &SecurityCheckpoints,
        descent:   &DescentFacilities,
        paths:     &PathNetwork,
        completed: u32,
    ) -> SystemSnapshot {
        let checkpoints = security
            .checkpoints()
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let id = CheckpointId(i as u16);
                CheckpointSample {
                    queued: security.queued(id),
                    in_use: security.in_use(id),
                    lanes:  group.lanes.len(),
                }
            })
            .collect();

        let lanes = security
            .lanes()
            .iter()
            .map(|lane| LaneSample { queued: lane.queued(), in_use: lane.in_use() })
            .collect();

        let paths = paths
            .segments()
            .iter()
            .map(|s| PathSample { occupancy: s.occupancy(), density: s.density() })
            .collect();

        let escalator = descent.escalator();
        SystemSnapshot {
            time: now,
            checkpoints,
            lanes,
            escalator_queued:   escalator.queued(),
            escalator_in_use:   escalator.in_use(),
            escalator_capacity: escalator.capacity(),
            stairs_in_use:      descent.stairs().in_use(),
            stairs_density:     descent.stairs_density(),
            paths,
            completed,
        }
    }
}
