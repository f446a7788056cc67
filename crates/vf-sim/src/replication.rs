//! One-shot runs and independent replications.

use vf_core::IngressConfig;

use crate::{NoopObserver, SimBuilder, SimOutput, SimResult};

/// Build, run to the horizon, and collect.
pub fn run_once(config: IngressConfig) -> SimResult<SimOutput> {
    let mut sim = SimBuilder::new(config).build()?;
    sim.run(&mut NoopObserver)?;
    Ok(sim.finish())
}

/// Run one independent simulation per seed, returning outputs in seed
/// order.
///
/// Each replication owns its whole context, so with the `parallel` feature
/// they run on Rayon's thread pool and still produce exactly the outputs of
/// a sequential loop.
pub fn run_replications(config: &IngressConfig, seeds: &[u64]) -> SimResult<Vec<SimOutput>> {
    let one = |&seed: &u64| -> SimResult<SimOutput> {
        let mut sim = SimBuilder::new(config.clone()).seed(seed).build()?;
        sim.run(&mut NoopObserver)?;
        Ok(sim.finish())
    };

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(one).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        seeds.par_iter().map(one).collect()
    }
}
