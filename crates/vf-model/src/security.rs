//! Security tents, their lanes, and the screening/outage policy.
//!
//! # Choice rules
//!
//! - **Tent**: least total load (held + waiting over all its lanes); ties go
//!   to the earliest configured tent.
//! - **Lane**: within the tent, fewest waiting requests; ties go to the
//!   lowest lane index.
//!
//! # Screening
//!
//! Once a lane is held the entity repeatedly draws fail/pass.  Each failure
//! costs one exponential service time; the pass costs one more.  There is no
//! attempt cap.  After service a small-probability outage keeps the lane
//! held for a uniform duration before it is released, so the lane's queue
//! simply grows while it is down.

use std::ops::Range;

use vf_core::{CheckpointId, EntityId, LaneId, SecurityConfig, SimRng};
use vf_engine::ResourcePool;

use crate::ModelResult;

/// One tent: a name and a contiguous block of lanes.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckpointGroup {
    pub name:  String,
    pub lanes: Range<u16>,
}

impl CheckpointGroup {
    pub fn lane_ids(&self) -> impl Iterator<Item = LaneId> {
        self.lanes.clone().map(LaneId)
    }
}

// ── SecurityPolicy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct SecurityPolicy {
    pub failure_probability: f64,
    pub service_mean_secs:   f64,
    pub coordination_factor: f64,
    pub outage_probability:  f64,
    pub outage_min_secs:     f64,
    pub outage_max_secs:     f64,
}

impl SecurityPolicy {
    pub fn from_config(cfg: &SecurityConfig) -> Self {
        Self {
            failure_probability: cfg.failure_probability,
            service_mean_secs:   cfg.service_mean_secs,
            coordination_factor: cfg.coordination_factor,
            outage_probability:  cfg.outage_probability,
            outage_min_secs:     cfg.outage_min_secs,
            outage_max_secs:     cfg.outage_max_secs,
        }
    }

    /// One fail/pass draw.
    pub fn screening_fails(&self, rng: &mut SimRng) -> bool {
        rng.gen_bool(self.failure_probability)
    }

    /// One exponential service time, scaled for group members.
    pub fn service_secs(&self, in_group: bool, rng: &mut SimRng) -> f64 {
        let secs = rng.exponential(self.service_mean_secs);
        if in_group { secs * self.coordination_factor } else { secs }
    }

    /// Draws the outage trigger, and the duration only if triggered.
    pub fn draw_outage(&self, rng: &mut SimRng) -> Option<f64> {
        if rng.gen_bool(self.outage_probability) {
            Some(rng.uniform(self.outage_min_secs, self.outage_max_secs))
        } else {
            None
        }
    }
}

// ── SecurityCheckpoints ───────────────────────────────────────────────────────

/// All tents and their single-capacity lanes.
#[derive(Clone, Debug)]
pub struct SecurityCheckpoints {
    checkpoints: Vec<CheckpointGroup>,
    lanes:       Vec<ResourcePool<EntityId>>,
    pub policy:  SecurityPolicy,
}

impl SecurityCheckpoints {
    pub fn from_config(cfg: &SecurityConfig) -> ModelResult<Self> {
        let mut checkpoints = Vec::with_capacity(cfg.checkpoints.len());
        let mut lanes = Vec::new();

        for spec in &cfg.checkpoints {
            let first = lanes.len() as u16;
            for i in 0..spec.lanes {
                lanes.push(ResourcePool::new(format!("{} lane {}", spec.name, i + 1), 1)?);
            }
            checkpoints.push(CheckpointGroup {
                name:  spec.name.clone(),
                lanes: first..lanes.len() as u16,
            });
        }

        Ok(Self { checkpoints, lanes, policy: SecurityPolicy::from_config(cfg) })
    }

    /// Least-loaded tent; the earliest wins ties.
    pub fn choose_checkpoint(&self) -> CheckpointId {
        // `min_by_key` keeps the first of equal minima.
        (0..self.checkpoints.len() as u16)
            .map(CheckpointId)
            .min_by_key(|&checkpoint| self.load(checkpoint))
            .unwrap_or(CheckpointId(0))
    }

    /// Lane with the shortest queue in `checkpoint`; lowest index wins ties.
    pub fn choose_lane(&self, checkpoint: CheckpointId) -> LaneId {
        let group = &self.checkpoints[checkpoint.index()];
        group
            .lane_ids()
            .min_by_key(|lane| self.lanes[lane.index()].queued())
            .unwrap_or(LaneId(group.lanes.start))
    }

    pub fn choose(&self) -> (CheckpointId, LaneId) {
        let checkpoint = self.choose_checkpoint();
        (checkpoint, self.choose_lane(checkpoint))
    }

    /// Held plus waiting across all lanes of `checkpoint`.
    pub fn load(&self, checkpoint: CheckpointId) -> usize {
        self.lanes_of(checkpoint).map(ResourcePool::load).sum()
    }

    /// Waiting requests across all lanes of `checkpoint`.
    pub fn queued(&self, checkpoint: CheckpointId) -> usize {
        self.lanes_of(checkpoint).map(ResourcePool::queued).sum()
    }

    /// Lanes currently held (screening or down) in `checkpoint`.
    pub fn in_use(&self, checkpoint: CheckpointId) -> usize {
        self.lanes_of(checkpoint).map(ResourcePool::in_use).sum()
    }

    fn lanes_of(&self, checkpoint: CheckpointId) -> impl Iterator<Item = &ResourcePool<EntityId>> {
        let range = &self.checkpoints[checkpoint.index()].lanes;
        self.lanes[range.start as usize..range.end as usize].iter()
    }

    pub fn lane(&self, lane: LaneId) -> &ResourcePool<EntityId> {
        &self.lanes[lane.index()]
    }

    pub fn lane_mut(&mut self, lane: LaneId) -> &mut ResourcePool<EntityId> {
        &mut self.lanes[lane.index()]
    }

    pub fn checkpoints(&self) -> &[CheckpointGroup] {
        &self.checkpoints
    }

    pub fn lanes(&self) -> &[ResourcePool<EntityId>] {
        &self.lanes
    }
}
