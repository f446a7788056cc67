//! Transport mode and perimeter delay.

use vf_core::{Categorical, ConfigResult, DelaySpec, IngressConfig, SimRng, TransportMode};

/// Per-entity mode choice plus that mode's delay distribution.
#[derive(Clone, Debug)]
pub struct TransportModel {
    modes:  Categorical<TransportMode>,
    delays: Vec<DelaySpec>,
}

impl TransportModel {
    pub fn from_config(cfg: &IngressConfig) -> ConfigResult<Self> {
        let modes = Categorical::new(
            "transport mode",
            cfg.transport.iter().map(|t| (t.mode, t.probability)),
        )?;
        let delays = cfg.transport.iter().map(|t| t.delay).collect();
        Ok(Self { modes, delays })
    }

    /// Draws: one for the mode, then whatever the mode's delay needs.
    pub fn draw(&self, rng: &mut SimRng) -> (TransportMode, f64) {
        let i = self.modes.sample_index(rng);
        let delay = self.delays[i].sample(rng);
        (self.modes.outcomes()[i], delay)
    }
}
