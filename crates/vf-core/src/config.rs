//! Static run configuration.
//!
//! Built in code ([`IngressConfig::baseline`]) or deserialised from a file by
//! the application (with the `serde` feature), then validated exactly once
//! when the simulation is constructed.  All times are seconds and all
//! distances metres.

use crate::dist::{check_non_negative, check_positive, check_probabilities, check_probability, check_range};
use crate::{ConfigError, ConfigResult, DelaySpec, TransportMode};

// ── Sections ──────────────────────────────────────────────────────────────────

/// One transport mode, its choice probability, and its delay model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportOption {
    pub mode:        TransportMode,
    pub probability: f64,
    pub delay:       DelaySpec,
}

/// A named walking path from the perimeter to the security tents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSpec {
    pub name:        String,
    pub length_m:    f64,
    pub width_m:     f64,
    /// Probability that a group is assigned this path.
    pub probability: f64,
}

/// One entry of the group-size distribution.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSizeSpec {
    pub size:        u32,
    pub probability: f64,
}

/// Walking speed, congestion law, and path disturbance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkingConfig {
    pub base_speed_mps:       f64,
    /// Density (persons/m²) at or below which walkers move at base speed.
    pub congestion_threshold: f64,
    /// Density increment that counts as one congestion step.
    pub congestion_step:      f64,
    /// Fractional speed loss per full step (0.1 → ×0.9 per step).
    pub reduction_per_step:   f64,
    pub min_speed_mps:        f64,
    pub disturbance_min_secs: f64,
    pub disturbance_max_secs: f64,
}

/// One security tent and its number of single-capacity lanes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckpointSpec {
    pub name:  String,
    pub lanes: u32,
}

/// Security screening, retries, and lane outages.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecurityConfig {
    /// Tents in tie-break order: the first is the default choice.
    pub checkpoints:         Vec<CheckpointSpec>,
    pub failure_probability: f64,
    pub service_mean_secs:   f64,
    /// Service-time multiplier for members of multi-person groups.
    pub coordination_factor: f64,
    pub outage_probability:  f64,
    pub outage_min_secs:     f64,
    pub outage_max_secs:     f64,
}

/// Stairs/escalator choice and throughput.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescentConfig {
    pub escalator_probability:          f64,
    /// Used instead of `escalator_probability` while the escalator queue is
    /// longer than `escalator_queue_threshold`.
    pub adjusted_escalator_probability: f64,
    pub escalator_queue_threshold:      u32,
    /// Riders on the escalator at once.
    pub escalator_capacity:             u32,
    pub escalator_throughput_per_min:   f64,
    pub stairs_width_m:                 f64,
    pub stairs_throughput_per_min_per_m: f64,
}

impl DescentConfig {
    /// Seconds one rider holds an escalator slot.
    pub fn escalator_hold_secs(&self) -> f64 {
        60.0 / self.escalator_throughput_per_min
    }

    /// Seconds one walker takes to cross the stairs.
    pub fn stairs_hold_secs(&self) -> f64 {
        60.0 / (self.stairs_throughput_per_min_per_m * self.stairs_width_m)
    }
}

// ── IngressConfig ─────────────────────────────────────────────────────────────

/// Top-level simulation configuration, consumed once at construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IngressConfig {
    pub population:            u32,
    /// Dispatch stops at this instant; entities still in flight are
    /// reported incomplete.
    pub horizon_secs:          f64,
    /// Group arrivals are drawn uniformly over `[0, window)`.  `None` uses
    /// the full horizon.
    pub arrival_window_secs:   Option<f64>,
    pub seed:                  u64,
    pub monitor_interval_secs: f64,
    /// Log a progress line every N completed entities (0 disables).
    pub progress_log_interval: u32,

    pub transport:   Vec<TransportOption>,
    pub paths:       Vec<PathSpec>,
    pub group_sizes: Vec<GroupSizeSpec>,
    pub walking:     WalkingConfig,
    pub security:    SecurityConfig,
    pub descent:     DescentConfig,
}

impl IngressConfig {
    /// The reference scenario: 35 000 spectators through two 15-lane tents
    /// in 3.5 hours.
    pub fn baseline() -> Self {
        Self {
            population:            35_000,
            horizon_secs:          3.5 * 3_600.0,
            arrival_window_secs:   None,
            seed:                  42,
            monitor_interval_secs: 60.0,
            progress_log_interval: 1_000,
            transport: vec![
                TransportOption {
                    mode:        TransportMode::Drive,
                    probability: 0.30,
                    delay:       DelaySpec::Normal { mean_secs: 300.0, std_secs: 120.0 },
                },
                TransportOption {
                    mode:        TransportMode::Bus,
                    probability: 0.40,
                    delay:       DelaySpec::Uniform { min_secs: 0.0, max_secs: 480.0 },
                },
                TransportOption { mode: TransportMode::Taxi, probability: 0.15, delay: DelaySpec::None },
                TransportOption { mode: TransportMode::Walk, probability: 0.10, delay: DelaySpec::None },
                TransportOption { mode: TransportMode::Bike, probability: 0.05, delay: DelaySpec::None },
            ],
            paths: vec![
                PathSpec { name: "E (north entrance)".into(), length_m: 120.0, width_m: 9.0,  probability: 0.4 },
                PathSpec { name: "B (south entrance)".into(), length_m: 55.0,  width_m: 10.0, probability: 0.4 },
                PathSpec { name: "C (other)".into(),          length_m: 300.0, width_m: 7.0,  probability: 0.2 },
            ],
            group_sizes: vec![
                GroupSizeSpec { size: 1, probability: 0.4 },
                GroupSizeSpec { size: 2, probability: 0.3 },
                GroupSizeSpec { size: 3, probability: 0.2 },
                GroupSizeSpec { size: 4, probability: 0.1 },
            ],
            walking: WalkingConfig {
                base_speed_mps:       1.2,
                congestion_threshold: 0.5,
                congestion_step:      0.1,
                reduction_per_step:   0.1,
                min_speed_mps:        0.2,
                disturbance_min_secs: 60.0,
                disturbance_max_secs: 180.0,
            },
            security: SecurityConfig {
                checkpoints: vec![
                    CheckpointSpec { name: "north".into(), lanes: 15 },
                    CheckpointSpec { name: "south".into(), lanes: 15 },
                ],
                failure_probability: 0.02,
                service_mean_secs:   10.0,
                coordination_factor: 1.1,
                outage_probability:  0.001,
                outage_min_secs:     120.0,
                outage_max_secs:     600.0,
            },
            descent: DescentConfig {
                escalator_probability:           0.4,
                adjusted_escalator_probability:  0.3,
                escalator_queue_threshold:       50,
                escalator_capacity:              25,
                escalator_throughput_per_min:    40.0,
                stairs_width_m:                  4.0,
                stairs_throughput_per_min_per_m: 40.0,
            },
        }
    }

    /// Effective arrival window.
    pub fn arrival_window(&self) -> f64 {
        self.arrival_window_secs.unwrap_or(self.horizon_secs)
    }

    /// Total number of security lanes across all checkpoints.
    pub fn total_lanes(&self) -> usize {
        self.security.checkpoints.iter().map(|c| c.lanes as usize).sum()
    }

    /// Check every field.  Returns the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        // ── Run ───────────────────────────────────────────────────────────
        check_positive("horizon_secs", self.horizon_secs)?;
        if let Some(window) = self.arrival_window_secs {
            check_positive("arrival_window_secs", window)?;
        }
        check_positive("monitor_interval_secs", self.monitor_interval_secs)?;

        // ── Transport ─────────────────────────────────────────────────────
        let probs: Vec<f64> = self.transport.iter().map(|t| t.probability).collect();
        check_probabilities("transport mode", &probs)?;
        for t in &self.transport {
            t.delay.validate(&format!("{} delay", t.mode))?;
        }

        // ── Paths and groups ──────────────────────────────────────────────
        let probs: Vec<f64> = self.paths.iter().map(|p| p.probability).collect();
        check_probabilities("path choice", &probs)?;
        if self.paths.len() > u16::MAX as usize {
            return Err(ConfigError::Invalid(format!("{} paths exceed the path id space", self.paths.len())));
        }
        for p in &self.paths {
            check_positive(&format!("path {:?} length_m", p.name), p.length_m)?;
            check_positive(&format!("path {:?} width_m", p.name), p.width_m)?;
        }

        let probs: Vec<f64> = self.group_sizes.iter().map(|g| g.probability).collect();
        check_probabilities("group size", &probs)?;
        for g in &self.group_sizes {
            if g.size == 0 {
                return Err(ConfigError::NonPositive { what: "group size".into(), value: 0.0 });
            }
        }

        // ── Walking ───────────────────────────────────────────────────────
        let w = &self.walking;
        check_positive("walking.base_speed_mps", w.base_speed_mps)?;
        check_positive("walking.min_speed_mps", w.min_speed_mps)?;
        check_non_negative("walking.congestion_threshold", w.congestion_threshold)?;
        check_positive("walking.congestion_step", w.congestion_step)?;
        check_probability("walking.reduction_per_step", w.reduction_per_step)?;
        check_range("walking.disturbance", w.disturbance_min_secs, w.disturbance_max_secs)?;

        // ── Security ──────────────────────────────────────────────────────
        let s = &self.security;
        if s.checkpoints.is_empty() {
            return Err(ConfigError::Empty { what: "security.checkpoints".into() });
        }
        for c in &s.checkpoints {
            if c.lanes == 0 {
                return Err(ConfigError::NonPositive {
                    what:  format!("checkpoint {:?} lanes", c.name),
                    value: 0.0,
                });
            }
        }
        if self.total_lanes() > u16::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "{} security lanes exceed the lane id space",
                self.total_lanes()
            )));
        }
        check_probability("security.failure_probability", s.failure_probability)?;
        check_positive("security.service_mean_secs", s.service_mean_secs)?;
        if !(s.coordination_factor >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "security.coordination_factor must be at least 1 (got {})",
                s.coordination_factor
            )));
        }
        check_probability("security.outage_probability", s.outage_probability)?;
        check_range("security.outage", s.outage_min_secs, s.outage_max_secs)?;

        // ── Descent ───────────────────────────────────────────────────────
        let d = &self.descent;
        check_probability("descent.escalator_probability", d.escalator_probability)?;
        check_probability("descent.adjusted_escalator_probability", d.adjusted_escalator_probability)?;
        if d.escalator_capacity == 0 {
            return Err(ConfigError::NonPositive { what: "descent.escalator_capacity".into(), value: 0.0 });
        }
        check_positive("descent.escalator_throughput_per_min", d.escalator_throughput_per_min)?;
        check_positive("descent.stairs_width_m", d.stairs_width_m)?;
        check_positive("descent.stairs_throughput_per_min_per_m", d.stairs_throughput_per_min_per_m)?;

        Ok(())
    }
}
