//! Path occupancy and the density → walking-speed law.
//!
//! Speed is decided once, on entry, from the density of the path at that
//! moment (the entrant not yet counted):
//!
//! ```text
//! steps = floor((density - threshold) / step)        if density > threshold
//! speed = max(min_speed, base * (1 - reduction)^steps)
//! ```
//!
//! The walker then stays on the path for `length / speed` plus a uniformly
//! drawn disturbance, whatever happens to density in the meantime.

use vf_core::{PathId, PathSpec, SimRng, WalkingConfig};

use crate::{ModelError, ModelResult};

/// Slack so that exact multiples of the step (0.8 - 0.5 = 0.2999…) still
/// count as full steps.
const STEP_EPSILON: f64 = 1e-9;

// ── CongestionLaw ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct CongestionLaw {
    pub base_speed_mps:     f64,
    pub threshold:          f64,
    pub step:               f64,
    pub reduction_per_step: f64,
    pub min_speed_mps:      f64,
}

impl CongestionLaw {
    pub fn from_config(w: &WalkingConfig) -> Self {
        Self {
            base_speed_mps:     w.base_speed_mps,
            threshold:          w.congestion_threshold,
            step:               w.congestion_step,
            reduction_per_step: w.reduction_per_step,
            min_speed_mps:      w.min_speed_mps,
        }
    }

    /// Full steps of `step` persons/m² above the threshold.
    pub fn steps_above(&self, density: f64) -> u32 {
        if density <= self.threshold {
            return 0;
        }
        let steps = ((density - self.threshold) / self.step + STEP_EPSILON).floor();
        steps.min(i32::MAX as f64) as u32
    }

    /// Walking speed in m/s at `density` persons/m².
    pub fn speed_at(&self, density: f64) -> f64 {
        let steps = self.steps_above(density) as i32;
        let factor = (1.0 - self.reduction_per_step).powi(steps);
        (self.base_speed_mps * factor).max(self.min_speed_mps)
    }
}

// ── PathSegment ───────────────────────────────────────────────────────────────

/// A named path with a live count of the entities currently on it.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSegment {
    pub name:     String,
    pub length_m: f64,
    pub width_m:  f64,
    occupancy:    u32,
}

impl PathSegment {
    pub fn new(spec: &PathSpec) -> Self {
        Self {
            name:      spec.name.clone(),
            length_m:  spec.length_m,
            width_m:   spec.width_m,
            occupancy: 0,
        }
    }

    #[inline]
    pub fn area_m2(&self) -> f64 {
        self.length_m * self.width_m
    }

    #[inline]
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Persons per square metre.
    #[inline]
    pub fn density(&self) -> f64 {
        self.occupancy as f64 / self.area_m2()
    }
}

// ── Walk ──────────────────────────────────────────────────────────────────────

/// The timing fixed at the moment an entity steps onto a path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Walk {
    pub speed_mps:        f64,
    /// Time spent walking at `speed_mps`.
    pub duration_secs:    f64,
    /// Time the same walk takes at base speed.
    pub ideal_secs:       f64,
    pub disturbance_secs: f64,
}

impl Walk {
    /// Extra walking time caused by congestion.
    pub fn congestion_delay_secs(&self) -> f64 {
        self.duration_secs - self.ideal_secs
    }

    /// How long the entity stays on the path.
    pub fn total_secs(&self) -> f64 {
        self.duration_secs + self.disturbance_secs
    }
}

// ── PathNetwork ───────────────────────────────────────────────────────────────

/// All paths plus the congestion law and disturbance range they share.
#[derive(Clone, Debug)]
pub struct PathNetwork {
    segments:        Vec<PathSegment>,
    pub law:         CongestionLaw,
    disturbance_min: f64,
    disturbance_max: f64,
}

impl PathNetwork {
    pub fn from_config(paths: &[PathSpec], walking: &WalkingConfig) -> Self {
        Self {
            segments:        paths.iter().map(PathSegment::new).collect(),
            law:             CongestionLaw::from_config(walking),
            disturbance_min: walking.disturbance_min_secs,
            disturbance_max: walking.disturbance_max_secs,
        }
    }

    /// Step onto `path`: sample the density, fix the walk, count the entrant.
    ///
    /// Draws: one uniform for the disturbance (none if the range is empty).
    pub fn enter(&mut self, path: PathId, rng: &mut SimRng) -> Walk {
        let law = &self.law;
        let segment = &mut self.segments[path.index()];
        let speed_mps = law.speed_at(segment.density());
        segment.occupancy += 1;

        Walk {
            speed_mps,
            duration_secs:    segment.length_m / speed_mps,
            ideal_secs:       segment.length_m / law.base_speed_mps,
            disturbance_secs: rng.uniform(self.disturbance_min, self.disturbance_max),
        }
    }

    /// Step off `path`.  Fails if nobody is on it.
    pub fn exit(&mut self, path: PathId) -> ModelResult<()> {
        let segment = &mut self.segments[path.index()];
        segment.occupancy = segment
            .occupancy
            .checked_sub(1)
            .ok_or(ModelError::NegativeOccupancy(path))?;
        Ok(())
    }

    pub fn segment(&self, path: PathId) -> &PathSegment {
        &self.segments[path.index()]
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}
