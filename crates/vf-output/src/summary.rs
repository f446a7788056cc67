//! Aggregation of a finished run into headline metrics.

use std::fmt;

use vf_core::IngressConfig;
use vf_model::DescentMode;
use vf_sim::{EntityRecord, SimOutput};

use crate::SummaryRow;

/// Headline metrics of one run.
///
/// Means are over completed entities only and are `None` when nobody
/// completed.  Peaks come from the monitor's snapshots, so they are only as
/// fine-grained as its interval.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub population:      u32,
    pub completed:       u32,
    /// `completed / population`; zero for an empty population.
    pub completion_rate: f64,

    pub mean_total_secs:            Option<f64>,
    pub max_total_secs:             Option<f64>,
    pub mean_security_wait_secs:    Option<f64>,
    pub mean_descent_wait_secs:     Option<f64>,
    pub mean_congestion_delay_secs: Option<f64>,
    /// Share of completed entities that took the escalator.
    pub escalator_share:            Option<f64>,

    /// Over all entities, completed or not.
    pub screening_failures: u64,
    pub lane_outages:       u32,

    /// `(checkpoint name, largest queued total seen)`, in configuration order.
    pub peak_checkpoint_queued: Vec<(String, usize)>,
    pub peak_escalator_queue:   usize,
    pub peak_stairs_density:    f64,
    /// `(path name, largest density seen)`, in configuration order.
    pub peak_path_density:      Vec<(String, f64)>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl RunSummary {
    pub fn from_output(output: &SimOutput, config: &IngressConfig) -> Self {
        let done: Vec<&EntityRecord> = output.records.iter().filter(|r| r.completed).collect();
        let population = output.records.len() as u32;
        let completed = done.len() as u32;

        let escalator = done
            .iter()
            .filter(|r| r.descent_mode == Some(DescentMode::Escalator))
            .count();

        let peak_checkpoint_queued = config
            .security
            .checkpoints
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let peak = output
                    .snapshots
                    .iter()
                    .filter_map(|s| s.checkpoints.get(i).map(|c| c.queued))
                    .max()
                    .unwrap_or(0);
                (spec.name.clone(), peak)
            })
            .collect();

        let peak_path_density = config
            .paths
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let peak = output
                    .snapshots
                    .iter()
                    .filter_map(|s| s.paths.get(i).map(|p| p.density))
                    .fold(0.0, f64::max);
                (spec.name.clone(), peak)
            })
            .collect();

        Self {
            population,
            completed,
            completion_rate: if population == 0 { 0.0 } else { completed as f64 / population as f64 },

            mean_total_secs:            mean(done.iter().filter_map(|r| r.total_secs())),
            max_total_secs:             done.iter().filter_map(|r| r.total_secs()).reduce(f64::max),
            mean_security_wait_secs:    mean(done.iter().map(|r| r.security_wait_secs)),
            mean_descent_wait_secs:     mean(done.iter().map(|r| r.descent_wait_secs)),
            mean_congestion_delay_secs: mean(done.iter().map(|r| r.congestion_delay_secs)),
            escalator_share:            (completed > 0).then(|| escalator as f64 / completed as f64),

            screening_failures: output.records.iter().map(|r| r.screening_failures as u64).sum(),
            lane_outages:       output.records.iter().filter(|r| r.outage_hold_secs > 0.0).count() as u32,

            peak_checkpoint_queued,
            peak_escalator_queue: output.snapshots.iter().map(|s| s.escalator_queued).max().unwrap_or(0),
            peak_stairs_density:  output.snapshots.iter().map(|s| s.stairs_density).fold(0.0, f64::max),
            peak_path_density,
        }
    }

    /// Flatten into metric/value pairs.  Undefined means are omitted.
    pub fn to_rows(&self) -> Vec<SummaryRow> {
        let mut rows = Vec::new();
        let mut push = |metric: String, value: f64| rows.push(SummaryRow { metric, value });

        push("population".into(), self.population as f64);
        push("completed".into(), self.completed as f64);
        push("completion_rate".into(), self.completion_rate);

        let optional = [
            ("mean_total_secs", self.mean_total_secs),
            ("max_total_secs", self.max_total_secs),
            ("mean_security_wait_secs", self.mean_security_wait_secs),
            ("mean_descent_wait_secs", self.mean_descent_wait_secs),
            ("mean_congestion_delay_secs", self.mean_congestion_delay_secs),
            ("escalator_share", self.escalator_share),
        ];
        for (metric, value) in optional {
            if let Some(v) = value {
                push(metric.into(), v);
            }
        }

        push("screening_failures".into(), self.screening_failures as f64);
        push("lane_outages".into(), self.lane_outages as f64);
        for (name, peak) in &self.peak_checkpoint_queued {
            push(format!("peak_queued[{name}]"), *peak as f64);
        }
        push("peak_escalator_queue".into(), self.peak_escalator_queue as f64);
        push("peak_stairs_density".into(), self.peak_stairs_density);
        for (name, peak) in &self.peak_path_density {
            push(format!("peak_density[{name}]"), *peak);
        }
        rows
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "completed {} of {} ({:.1}%)",
            self.completed,
            self.population,
            self.completion_rate * 100.0
        )?;
        let secs = |v: Option<f64>| v.map_or_else(|| "n/a".to_owned(), |s| format!("{s:.1} s"));
        writeln!(f, "mean total time      {}", secs(self.mean_total_secs))?;
        writeln!(f, "mean security wait   {}", secs(self.mean_security_wait_secs))?;
        writeln!(f, "mean descent wait    {}", secs(self.mean_descent_wait_secs))?;
        writeln!(f, "mean congestion      {}", secs(self.mean_congestion_delay_secs))?;
        writeln!(f, "screening failures   {}", self.screening_failures)?;
        writeln!(f, "lane outages         {}", self.lane_outages)?;
        for (name, peak) in &self.peak_checkpoint_queued {
            writeln!(f, "peak queue {name:<10} {peak}")?;
        }
        writeln!(f, "peak escalator queue {}", self.peak_escalator_queue)?;
        for (name, peak) in &self.peak_path_density {
            writeln!(f, "peak density {name}: {peak:.2} p/m²")?;
        }
        Ok(())
    }
}
