//! Fluent builder for constructing a [`Simulation`].

use tracing::debug;

use vf_core::{IngressConfig, SimRng};
use vf_engine::EventScheduler;
use vf_model::{ArrivalGenerator, DescentFacilities, PathNetwork, SecurityCheckpoints, TransportModel};

use crate::process::EntityProcess;
use crate::sim::{SimEvent, World};
use crate::{Monitor, SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Optional inputs
///
/// | Method      | Default         |
/// |-------------|-----------------|
/// | `.seed(s)`  | `config.seed`   |
///
/// `build` validates the configuration, constructs every pool and path,
/// draws all group arrivals from the RNG stream, and schedules the monitor
/// (first, at t = 0) followed by one arrival event per group.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(IngressConfig::baseline()).seed(7).build()?;
/// sim.run(&mut NoopObserver)?;
/// let output = sim.finish();
/// ```
pub struct SimBuilder {
    config: IngressConfig,
    seed:   Option<u64>,
}

impl SimBuilder {
    pub fn new(config: IngressConfig) -> Self {
        Self { config, seed: None }
    }

    /// Override the configured seed, e.g. per replication.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> SimResult<Simulation> {
        let mut config = self.config;
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;

        // ── Static models and pools ───────────────────────────────────────
        let transport = TransportModel::from_config(&config)?;
        let arrivals = ArrivalGenerator::from_config(&config)?;
        let paths = PathNetwork::from_config(&config.paths, &config.walking);
        let security = SecurityCheckpoints::from_config(&config.security)?;
        let descent = DescentFacilities::from_config(&config.descent)?;

        // ── Arrivals: the first draws of the stream ───────────────────────
        let mut rng = SimRng::new(config.seed);
        let groups = arrivals.generate(&mut rng);

        let mut entities = Vec::with_capacity(config.population as usize);
        for group in &groups {
            for &member in &group.members {
                entities.push(EntityProcess::new(member, group));
            }
        }

        let mut scheduler = EventScheduler::new();
        scheduler.schedule_after(0.0, SimEvent::Monitor)?;
        let group_count = groups.len();
        for group in groups {
            scheduler.schedule_after(group.arrival.secs(), SimEvent::GroupArrival(group))?;
        }
        debug!(groups = group_count, entities = entities.len(), seed = config.seed, "simulation built");

        let world = World {
            rng,
            transport,
            paths,
            security,
            descent,
            monitor: Monitor::new(config.monitor_interval_secs),
            entities,
            snapshots: Vec::new(),
            completed: 0,
            progress_interval: config.progress_log_interval,
        };

        Ok(Simulation { config, scheduler, world })
    }
}
