//! Flat row types written by output backends.
//!
//! Rows resolve ids to configured names so the files can be read without
//! the configuration at hand.

use vf_core::IngressConfig;
use vf_sim::{EntityRecord, SystemSnapshot};

/// Column names of `entity_records`, in write order.
pub const ENTITY_COLUMNS: [&str; 23] = [
    "entity_id",
    "group_id",
    "group_size",
    "path",
    "arrival_secs",
    "transport_mode",
    "transport_delay_secs",
    "walk_secs",
    "congestion_delay_secs",
    "disturbance_secs",
    "checkpoint",
    "lane",
    "security_wait_secs",
    "security_process_secs",
    "screening_failures",
    "outage_hold_secs",
    "descent_mode",
    "descent_wait_secs",
    "descent_process_secs",
    "finish_secs",
    "total_secs",
    "completed",
    "phase",
];

/// Column names of `system_snapshots`, in write order.
pub const SNAPSHOT_COLUMNS: [&str; 6] = ["time_secs", "kind", "resource", "queued", "in_use", "density"];

/// Column names of `summary`, in write order.
pub const SUMMARY_COLUMNS: [&str; 2] = ["metric", "value"];

/// One entity's record.  `None` marks a phase the entity never reached.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub entity_id:             u32,
    pub group_id:              u32,
    pub group_size:            u32,
    pub path:                  String,
    pub arrival_secs:          f64,
    pub transport_mode:        Option<&'static str>,
    pub transport_delay_secs:  f64,
    pub walk_secs:             f64,
    pub congestion_delay_secs: f64,
    pub disturbance_secs:      f64,
    pub checkpoint:            Option<String>,
    pub lane:                  Option<u16>,
    pub security_wait_secs:    f64,
    pub security_process_secs: f64,
    pub screening_failures:    u32,
    pub outage_hold_secs:      f64,
    pub descent_mode:          Option<&'static str>,
    pub descent_wait_secs:     f64,
    pub descent_process_secs:  f64,
    pub finish_secs:           Option<f64>,
    pub total_secs:            Option<f64>,
    pub completed:             bool,
    pub phase:                 &'static str,
}

impl EntityRow {
    pub fn from_record(r: &EntityRecord, config: &IngressConfig) -> Self {
        let path = config
            .paths
            .get(r.path.index())
            .map_or_else(|| r.path.to_string(), |p| p.name.clone());
        let checkpoint = r.checkpoint.map(|c| {
            config
                .security
                .checkpoints
                .get(c.index())
                .map_or_else(|| c.to_string(), |spec| spec.name.clone())
        });

        Self {
            entity_id:             r.entity.0,
            group_id:              r.group.0,
            group_size:            r.group_size,
            path,
            arrival_secs:          r.arrival.secs(),
            transport_mode:        r.transport_mode.map(|m| m.as_str()),
            transport_delay_secs:  r.transport_delay_secs,
            walk_secs:             r.walk_secs,
            congestion_delay_secs: r.congestion_delay_secs,
            disturbance_secs:      r.disturbance_secs,
            checkpoint,
            lane:                  r.lane.map(|l| l.0),
            security_wait_secs:    r.security_wait_secs,
            security_process_secs: r.security_process_secs,
            screening_failures:    r.screening_failures,
            outage_hold_secs:      r.outage_hold_secs,
            descent_mode:          r.descent_mode.map(|m| m.as_str()),
            descent_wait_secs:     r.descent_wait_secs,
            descent_process_secs:  r.descent_process_secs,
            finish_secs:           r.finish.map(|t| t.secs()),
            total_secs:            r.total_secs(),
            completed:             r.completed,
            phase:                 r.phase.as_str(),
        }
    }
}

/// One resource at one monitor tick.
///
/// `kind` is `checkpoint`, `escalator`, `stairs`, or `path`.  `density` is
/// persons/m² for paths, persons per metre of width for the stairs, and
/// `None` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub time_secs: f64,
    pub kind:      &'static str,
    pub resource:  String,
    pub queued:    u64,
    pub in_use:    u64,
    pub density:   Option<f64>,
}

impl SnapshotRow {
    /// Expand one snapshot into a row per checkpoint, escalator, stairs, and
    /// path, in that order.
    pub fn from_snapshot(s: &SystemSnapshot, config: &IngressConfig) -> Vec<Self> {
        let time_secs = s.time.secs();
        let mut rows = Vec::with_capacity(s.checkpoints.len() + s.paths.len() + 2);

        for (spec, c) in config.security.checkpoints.iter().zip(&s.checkpoints) {
            rows.push(Self {
                time_secs,
                kind:     "checkpoint",
                resource: spec.name.clone(),
                queued:   c.queued as u64,
                in_use:   c.in_use as u64,
                density:  None,
            });
        }
        rows.push(Self {
            time_secs,
            kind:     "escalator",
            resource: "escalator".into(),
            queued:   s.escalator_queued as u64,
            in_use:   s.escalator_in_use as u64,
            density:  None,
        });
        rows.push(Self {
            time_secs,
            kind:     "stairs",
            resource: "stairs".into(),
            queued:   0,
            in_use:   s.stairs_in_use as u64,
            density:  Some(s.stairs_density),
        });
        for (spec, p) in config.paths.iter().zip(&s.paths) {
            rows.push(Self {
                time_secs,
                kind:     "path",
                resource: spec.name.clone(),
                queued:   0,
                in_use:   p.occupancy as u64,
                density:  Some(p.density),
            });
        }
        rows
    }
}

/// One summary metric.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub metric: String,
    pub value:  f64,
}
