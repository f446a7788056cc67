//! Stairs-versus-escalator choice with live queue feedback.
//!
//! The escalator is a pool of `capacity` rider slots, each held for
//! `60 / throughput_per_min` seconds.  The stairs never queue; their
//! occupancy is only reported as a density per metre of width.
//!
//! The choice probability switches to the adjusted value for one decision
//! whenever the escalator queue is longer than the threshold at that
//! instant.  The threshold is a soft signal: it never caps the queue.

use vf_core::{DescentConfig, EntityId, SimRng};
use vf_engine::ResourcePool;

use crate::ModelResult;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DescentMode {
    Escalator,
    Stairs,
}

impl DescentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DescentMode::Escalator => "escalator",
            DescentMode::Stairs    => "stairs",
        }
    }
}

impl std::fmt::Display for DescentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DescentPolicy ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct DescentPolicy {
    pub escalator_probability:          f64,
    pub adjusted_escalator_probability: f64,
    pub queue_threshold:                usize,
    pub escalator_hold_secs:            f64,
    pub stairs_hold_secs:               f64,
}

impl DescentPolicy {
    pub fn from_config(cfg: &DescentConfig) -> Self {
        Self {
            escalator_probability:          cfg.escalator_probability,
            adjusted_escalator_probability: cfg.adjusted_escalator_probability,
            queue_threshold:                cfg.escalator_queue_threshold as usize,
            escalator_hold_secs:            cfg.escalator_hold_secs(),
            stairs_hold_secs:               cfg.stairs_hold_secs(),
        }
    }

    /// Escalator probability given the escalator queue length right now.
    pub fn escalator_probability_for(&self, escalator_queue: usize) -> f64 {
        if escalator_queue > self.queue_threshold {
            self.adjusted_escalator_probability
        } else {
            self.escalator_probability
        }
    }

    /// One Bernoulli draw.
    pub fn choose(&self, escalator_queue: usize, rng: &mut SimRng) -> DescentMode {
        if rng.gen_bool(self.escalator_probability_for(escalator_queue)) {
            DescentMode::Escalator
        } else {
            DescentMode::Stairs
        }
    }

    /// How long one entity holds the chosen facility.
    pub fn hold_secs(&self, mode: DescentMode) -> f64 {
        match mode {
            DescentMode::Escalator => self.escalator_hold_secs,
            DescentMode::Stairs    => self.stairs_hold_secs,
        }
    }
}

// ── DescentFacilities ─────────────────────────────────────────────────────────

/// The escalator and stairs pools plus the policy that picks between them.
#[derive(Clone, Debug)]
pub struct DescentFacilities {
    escalator:      ResourcePool<EntityId>,
    stairs:         ResourcePool<EntityId>,
    stairs_width_m: f64,
    pub policy:     DescentPolicy,
}

impl DescentFacilities {
    pub fn from_config(cfg: &DescentConfig) -> ModelResult<Self> {
        Ok(Self {
            escalator:      ResourcePool::new("escalator", cfg.escalator_capacity as usize)?,
            stairs:         ResourcePool::unbounded("stairs"),
            stairs_width_m: cfg.stairs_width_m,
            policy:         DescentPolicy::from_config(cfg),
        })
    }

    /// Decide for one entity against the live escalator queue.
    pub fn decide(&self, rng: &mut SimRng) -> DescentMode {
        self.policy.choose(self.escalator.queued(), rng)
    }

    pub fn pool(&self, mode: DescentMode) -> &ResourcePool<EntityId> {
        match mode {
            DescentMode::Escalator => &self.escalator,
            DescentMode::Stairs    => &self.stairs,
        }
    }

    pub fn pool_mut(&mut self, mode: DescentMode) -> &mut ResourcePool<EntityId> {
        match mode {
            DescentMode::Escalator => &mut self.escalator,
            DescentMode::Stairs    => &mut self.stairs,
        }
    }

    pub fn escalator(&self) -> &ResourcePool<EntityId> {
        &self.escalator
    }

    pub fn stairs(&self) -> &ResourcePool<EntityId> {
        &self.stairs
    }

    /// Persons on the stairs per metre of width.
    pub fn stairs_density(&self) -> f64 {
        self.stairs.in_use() as f64 / self.stairs_width_m
    }
}
