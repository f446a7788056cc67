//! Splitting the population into groups and drawing their arrivals.

use vf_core::{Categorical, ConfigResult, EntityId, GroupId, IngressConfig, PathId, SimRng, SimTime};

/// Entities that arrive together on one path.
///
/// A group only exists between generation and its arrival event: at
/// dispatch each member becomes an independent entity and the group itself
/// is dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub id:      GroupId,
    pub arrival: SimTime,
    pub path:    PathId,
    /// Consecutive entity ids, in spawn order.
    pub members: Vec<EntityId>,
}

impl Group {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Members of multi-person groups pay the coordination penalty at
    /// security.
    pub fn is_multi(&self) -> bool {
        self.members.len() > 1
    }
}

/// Draws group sizes, arrival instants, and path assignments.
#[derive(Clone, Debug)]
pub struct ArrivalGenerator {
    population: u32,
    window:     f64,
    sizes:      Categorical<u32>,
    paths:      Categorical<PathId>,
}

impl ArrivalGenerator {
    pub fn from_config(cfg: &IngressConfig) -> ConfigResult<Self> {
        let sizes = Categorical::new(
            "group size",
            cfg.group_sizes.iter().map(|g| (g.size, g.probability)),
        )?;
        let paths = Categorical::new(
            "path choice",
            cfg.paths.iter().enumerate().map(|(i, p)| (PathId(i as u16), p.probability)),
        )?;
        Ok(Self { population: cfg.population, window: cfg.arrival_window(), sizes, paths })
    }

    /// Partition the population into groups.
    ///
    /// The last group is cut short so member counts sum to exactly the
    /// population.  Draws per group, in order: size, arrival instant, path.
    pub fn generate(&self, rng: &mut SimRng) -> Vec<Group> {
        let mut groups = Vec::new();
        let mut next_entity: u32 = 0;

        while next_entity < self.population {
            let remaining = self.population - next_entity;
            let size = (*self.sizes.sample(rng)).min(remaining);
            let arrival = SimTime(rng.uniform(0.0, self.window));
            let path = *self.paths.sample(rng);

            groups.push(Group {
                id: GroupId(groups.len() as u32),
                arrival,
                path,
                members: (next_entity..next_entity + size).map(EntityId).collect(),
            });
            next_entity += size;
        }
        groups
    }
}
