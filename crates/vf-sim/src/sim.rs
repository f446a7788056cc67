//! The `Simulation` context and its event dispatch.

use tracing::{debug, info, trace};

use vf_core::{EntityId, IngressConfig, LaneId, SimRng, SimTime};
use vf_engine::{EventScheduler, Grant};
use vf_model::{
    DescentFacilities, DescentMode, Group, PathNetwork, SecurityCheckpoints, TransportModel,
};

use crate::process::{EntityProcess, Held, Step};
use crate::{Monitor, SimError, SimObserver, SimOutput, SimResult, SystemSnapshot};

/// Everything the scheduler can dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    /// Take a snapshot and re-arm.
    Monitor,
    /// Fan a group out into one `Start` per member.
    GroupArrival(Group),
    /// Begin the entity's own flow (transport draw).
    Start(EntityId),
    /// A timer elapsed or a queued request was granted.
    Resume(EntityId),
}

// ── World ─────────────────────────────────────────────────────────────────────

/// All mutable state except the scheduler, kept separate so dispatch can
/// borrow it alongside the scheduler.
pub(crate) struct World {
    pub(crate) rng:               SimRng,
    pub(crate) transport:         TransportModel,
    pub(crate) paths:             PathNetwork,
    pub(crate) security:          SecurityCheckpoints,
    pub(crate) descent:           DescentFacilities,
    pub(crate) monitor:           Monitor,
    /// Indexed by `EntityId`.
    pub(crate) entities:          Vec<EntityProcess>,
    pub(crate) snapshots:         Vec<SystemSnapshot>,
    pub(crate) completed:         u32,
    pub(crate) progress_interval: u32,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The owned simulation context: scheduler, pools, paths, entities, and the
/// single RNG stream.
///
/// Nothing is global, so independent contexts can run side by side.  Create
/// via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    /// Validated configuration (with any builder seed override applied).
    pub config: IngressConfig,

    pub(crate) scheduler: EventScheduler<SimEvent>,
    pub(crate) world:     World,
}

impl Simulation {
    // ── Public API ────────────────────────────────────────────────────────

    /// Dispatch events until the horizon.
    ///
    /// An invariant violation aborts the run with the error; entities still
    /// in flight at the horizon are simply left where they are.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let horizon = SimTime(self.config.horizon_secs);
        info!(
            population = self.config.population,
            seed = self.config.seed,
            horizon = %horizon,
            "run started"
        );

        let world = &mut self.world;
        let dispatched = self
            .scheduler
            .run_until(horizon, |sched, event| world.dispatch(sched, event, &mut *observer))?;

        let completed = self.world.completed;
        info!(
            dispatched,
            completed,
            incomplete = self.config.population - completed,
            "run finished"
        );
        observer.on_run_end(horizon, completed);
        Ok(())
    }

    /// Consume the context and hand back the two outputs.
    pub fn finish(self) -> SimOutput {
        SimOutput {
            records:   self.world.entities.into_iter().map(EntityProcess::into_record).collect(),
            snapshots: self.world.snapshots,
        }
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn completed(&self) -> u32 {
        self.world.completed
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    pub fn snapshots(&self) -> &[SystemSnapshot] {
        &self.world.snapshots
    }

    pub fn paths(&self) -> &PathNetwork {
        &self.world.paths
    }

    pub fn security(&self) -> &SecurityCheckpoints {
        &self.world.security
    }

    pub fn descent(&self) -> &DescentFacilities {
        &self.world.descent
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

impl World {
    fn dispatch<O: SimObserver>(
        &mut self,
        sched:    &mut EventScheduler<SimEvent>,
        event:    SimEvent,
        observer: &mut O,
    ) -> SimResult<()> {
        match event {
            SimEvent::Monitor => {
                let snapshot = self.monitor.sample(
                    sched.now(),
                    &self.security,
                    &self.descent,
                    &self.paths,
                    self.completed,
                );
                observer.on_snapshot(&snapshot);
                self.snapshots.push(snapshot);
                sched.schedule_after(self.monitor.interval_secs, SimEvent::Monitor)?;
                Ok(())
            }
            SimEvent::GroupArrival(group) => self.arrive(sched, group, observer),
            SimEvent::Start(entity)       => self.start(sched, entity),
            SimEvent::Resume(entity)      => self.resume(sched, entity, observer),
        }
    }

    fn process(&mut self, entity: EntityId) -> &mut EntityProcess {
        &mut self.entities[entity.index()]
    }

    fn arrive<O: SimObserver>(
        &mut self,
        sched:    &mut EventScheduler<SimEvent>,
        group:    Group,
        observer: &mut O,
    ) -> SimResult<()> {
        trace!(group = %group.id, size = group.size(), path = %group.path, "group arrived");
        observer.on_group_arrival(sched.now(), &group);
        for &member in &group.members {
            self.process(member).set_step(Step::Arrived);
            sched.schedule_after(0.0, SimEvent::Start(member))?;
        }
        Ok(())
    }

    fn start(&mut self, sched: &mut EventScheduler<SimEvent>, entity: EntityId) -> SimResult<()> {
        let step = self.process(entity).step;
        if step != Step::Arrived {
            return Err(SimError::UnexpectedResume { entity, phase: step.phase() });
        }

        let (mode, delay) = self.transport.draw(&mut self.rng);
        let p = self.process(entity);
        p.record.transport_mode = Some(mode);
        p.record.transport_delay_secs = delay;
        p.set_step(Step::Transporting);
        sched.schedule_after(delay, SimEvent::Resume(entity))?;
        Ok(())
    }

    fn resume<O: SimObserver>(
        &mut self,
        sched:    &mut EventScheduler<SimEvent>,
        entity:   EntityId,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = sched.now();
        let step = self.process(entity).step;
        match step {
            Step::Transporting => self.enter_path(sched, entity),
            Step::Walking(path) => {
                self.paths.exit(path)?;
                self.request_lane(sched, entity)
            }
            Step::AwaitingLane(lane) => {
                let p = self.process(entity);
                p.record.security_wait_secs = now.since(p.requested_at);
                self.begin_screening(sched, entity, lane)
            }
            Step::Screening { lane, passed: false } => self.screen_once(sched, entity, lane),
            Step::Screening { lane, passed: true }  => self.after_screening(sched, entity, lane),
            Step::Outage(lane) => {
                self.release_lane(sched, entity, lane)?;
                self.request_descent(sched, entity)
            }
            Step::AwaitingDescent(mode) => {
                let p = self.process(entity);
                p.record.descent_wait_secs = now.since(p.requested_at);
                self.begin_descent(sched, entity, mode)
            }
            Step::Descending(mode) => {
                self.release_descent(sched, entity, mode)?;
                self.complete(now, entity, observer)
            }
            step @ (Step::Scheduled | Step::Arrived | Step::Completed) => {
                Err(SimError::UnexpectedResume { entity, phase: step.phase() })
            }
        }
    }

    // ── Walking ───────────────────────────────────────────────────────────

    fn enter_path(&mut self, sched: &mut EventScheduler<SimEvent>, entity: EntityId) -> SimResult<()> {
        let path = self.process(entity).record.path;
        let walk = self.paths.enter(path, &mut self.rng);

        let p = self.process(entity);
        p.record.walk_secs = walk.duration_secs;
        p.record.congestion_delay_secs = walk.congestion_delay_secs();
        p.record.disturbance_secs = walk.disturbance_secs;
        p.set_step(Step::Walking(path));
        sched.schedule_after(walk.total_secs(), SimEvent::Resume(entity))?;
        Ok(())
    }

    // ── Security ──────────────────────────────────────────────────────────

    fn request_lane(&mut self, sched: &mut EventScheduler<SimEvent>, entity: EntityId) -> SimResult<()> {
        let (checkpoint, lane) = self.security.choose();
        let grant = self.security.lane_mut(lane).request(entity);

        let p = self.process(entity);
        p.record.checkpoint = Some(checkpoint);
        p.record.lane = Some(lane);
        match grant {
            Grant::Immediate => self.begin_screening(sched, entity, lane),
            Grant::Queued { position } => {
                trace!(%entity, %lane, position, "queued for lane");
                p.requested_at = sched.now();
                p.set_step(Step::AwaitingLane(lane));
                Ok(())
            }
        }
    }

    fn begin_screening(
        &mut self,
        sched:  &mut EventScheduler<SimEvent>,
        entity: EntityId,
        lane:   LaneId,
    ) -> SimResult<()> {
        self.process(entity).acquire(Held::Lane(lane));
        self.screen_once(sched, entity, lane)
    }

    /// One fail/pass draw and its service sample.  A failure loops back
    /// here when the sample elapses; a pass moves on to the outage draw.
    fn screen_once(
        &mut self,
        sched:  &mut EventScheduler<SimEvent>,
        entity: EntityId,
        lane:   LaneId,
    ) -> SimResult<()> {
        let in_group = self.process(entity).in_group();
        let policy = &self.security.policy;
        let failed = policy.screening_fails(&mut self.rng);
        let secs = policy.service_secs(in_group, &mut self.rng);

        let p = self.process(entity);
        p.record.security_process_secs += secs;
        if failed {
            p.record.screening_failures += 1;
        }
        p.set_step(Step::Screening { lane, passed: !failed });
        sched.schedule_after(secs, SimEvent::Resume(entity))?;
        Ok(())
    }

    fn after_screening(
        &mut self,
        sched:  &mut EventScheduler<SimEvent>,
        entity: EntityId,
        lane:   LaneId,
    ) -> SimResult<()> {
        match self.security.policy.draw_outage(&mut self.rng) {
            Some(secs) => {
                debug!(%entity, %lane, secs, "lane outage");
                let p = self.process(entity);
                p.record.outage_hold_secs = secs;
                p.set_step(Step::Outage(lane));
                sched.schedule_after(secs, SimEvent::Resume(entity))?;
                Ok(())
            }
            None => {
                self.release_lane(sched, entity, lane)?;
                self.request_descent(sched, entity)
            }
        }
    }

    fn release_lane(
        &mut self,
        sched:  &mut EventScheduler<SimEvent>,
        entity: EntityId,
        lane:   LaneId,
    ) -> SimResult<()> {
        let resource = Held::Lane(lane);
        if !self.process(entity).relinquish(resource) {
            return Err(SimError::ReleaseMismatch { entity, resource: resource.to_string() });
        }
        if let Some(next) = self.security.lane_mut(lane).release()? {
            sched.schedule_after(0.0, SimEvent::Resume(next))?;
        }
        Ok(())
    }

    // ── Descent ───────────────────────────────────────────────────────────

    fn request_descent(&mut self, sched: &mut EventScheduler<SimEvent>, entity: EntityId) -> SimResult<()> {
        let mode = self.descent.decide(&mut self.rng);
        let grant = self.descent.pool_mut(mode).request(entity);

        let p = self.process(entity);
        p.record.descent_mode = Some(mode);
        match grant {
            Grant::Immediate => self.begin_descent(sched, entity, mode),
            Grant::Queued { position } => {
                trace!(%entity, %mode, position, "queued for descent");
                p.requested_at = sched.now();
                p.set_step(Step::AwaitingDescent(mode));
                Ok(())
            }
        }
    }

    fn begin_descent(
        &mut self,
        sched:  &mut EventScheduler<SimEvent>,
        entity: EntityId,
        mode:   DescentMode,
    ) -> SimResult<()> {
        let hold = self.descent.policy.hold_secs(mode);
        let p = self.process(entity);
        p.acquire(Held::Descent(mode));
        p.record.descent_process_secs = hold;
        p.set_step(Step::Descending(mode));
        sched.schedule_after(hold, SimEvent::Resume(entity))?;
        Ok(())
    }

    fn release_descent(
        &mut self,
        sched:  &mut EventScheduler<SimEvent>,
        entity: EntityId,
        mode:   DescentMode,
    ) -> SimResult<()> {
        let resource = Held::Descent(mode);
        if !self.process(entity).relinquish(resource) {
            return Err(SimError::ReleaseMismatch { entity, resource: resource.to_string() });
        }
        if let Some(next) = self.descent.pool_mut(mode).release()? {
            sched.schedule_after(0.0, SimEvent::Resume(next))?;
        }
        Ok(())
    }

    // ── Completion ────────────────────────────────────────────────────────

    fn complete<O: SimObserver>(&mut self, now: SimTime, entity: EntityId, observer: &mut O) -> SimResult<()> {
        let p = &mut self.entities[entity.index()];
        if let Some(resource) = p.held {
            return Err(SimError::ResourceLeak { entity, resource: resource.to_string() });
        }
        p.record.finish = Some(now);
        p.record.completed = true;
        p.set_step(Step::Completed);
        observer.on_entity_completed(&p.record);

        self.completed += 1;
        if self.progress_interval > 0 && self.completed % self.progress_interval == 0 {
            info!(completed = self.completed, time = %now, "progress");
        }
        Ok(())
    }
}
