//! AGVs: per-vehicle state, activity accounting, and the vehicle process.
//!
//! # Work cycle
//!
//! ```text
//!            ┌──────────────────────── Decide ◀─────────────────────────┐
//!            │ no pack / SOC < min        │ no work        │ container  │
//!            ▼                            ▼                ▼            │
//!   (travel to station)              Idle (passive)    ToPickup ─▶ Loading
//!            ▼                            │                             │
//!   release pack, join swap queue         └─ activator ─▶ Decide        ▼
//!            ▼                                               ToDelivery ─▶ Unloading
//!   AwaitingBattery ── swapper ─▶ attach pack ─▶ Swapping ─▶ Decide
//! ```
//!
//! Travel deducts its whole energy cost up front, clamped at empty, then
//! holds for `distance / speed`.

use agv_core::{
    AgvId, BatteryId, Point, ProcessId, SimError, SimResult, SimTime, SECS_PER_HOUR, SECS_PER_MINUTE,
};
use agv_kernel::{Kernel, Process, Step};
use tracing::{debug, warn};

use crate::{Container, FleetContext, Metric, MetricsSink};

/// What an AGV is doing, for time accounting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Running,
    Swapping,
}

// ── Agv ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Agv {
    pub id:                  AgvId,
    pub process:             ProcessId,
    pub battery:             Option<BatteryId>,
    pub location:            Point,
    /// Metres.
    pub distance_traveled:   f64,
    pub swap_count:          u32,
    pub containers_handled:  u32,
    /// Set while the AGV is in (or heading back to) the swap queue.
    pub waiting_for_battery: bool,
    pub activity:            Activity,
    pub activity_since:      SimTime,
    pub idle_secs:           f64,
    pub running_secs:        f64,
    pub swapping_secs:       f64,
}

impl Agv {
    pub fn new(id: AgvId, process: ProcessId, location: Point) -> Self {
        Self {
            id,
            process,
            battery: None,
            location,
            distance_traveled: 0.0,
            swap_count: 0,
            containers_handled: 0,
            waiting_for_battery: false,
            activity: Activity::Idle,
            activity_since: SimTime::ZERO,
            idle_secs: 0.0,
            running_secs: 0.0,
            swapping_secs: 0.0,
        }
    }

    /// Close the current activity interval at `now` and start `next`.
    pub fn set_activity(&mut self, next: Activity, now: SimTime) {
        let spent = now.since(self.activity_since);
        match self.activity {
            Activity::Idle     => self.idle_secs += spent,
            Activity::Running  => self.running_secs += spent,
            Activity::Swapping => self.swapping_secs += spent,
        }
        self.activity = next;
        self.activity_since = now;
    }

    /// `(idle, running, swapping)` seconds with the open interval closed at `now`.
    pub fn activity_totals(&self, now: SimTime) -> (f64, f64, f64) {
        let open = now.since(self.activity_since);
        let (mut idle, mut running, mut swapping) = (self.idle_secs, self.running_secs, self.swapping_secs);
        match self.activity {
            Activity::Idle     => idle += open,
            Activity::Running  => running += open,
            Activity::Swapping => swapping += open,
        }
        (idle, running, swapping)
    }
}

// ── AgvProcess ────────────────────────────────────────────────────────────────

/// A container being moved, with the instant the AGV took it.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Job {
    container: Container,
    picked_at: SimTime,
}

/// Where the process resumes.  Phases named after a travel or handling step
/// mean "that hold has just ended".
#[derive(Copy, Clone, Debug, PartialEq)]
enum Phase {
    Decide,
    ToStation,
    AwaitingBattery,
    Swapping,
    Idle { since: SimTime },
    ToPickup(Job),
    Loading(Job),
    ToDelivery(Job),
    Unloading(Job),
}

pub struct AgvProcess {
    agv:   AgvId,
    phase: Phase,
}

impl AgvProcess {
    pub fn new(agv: AgvId) -> Self {
        Self { agv, phase: Phase::Decide }
    }

    /// Top of the work cycle: get a pack, go idle, or take a container.
    fn decide<M: MetricsSink>(&mut self, now: SimTime, ctx: &mut FleetContext<M>) -> SimResult<Option<Step>> {
        let i = self.agv.index();
        let needs_battery = ctx
            .agv_soc(self.agv)
            .is_none_or(|soc| soc < ctx.config.battery.soc_min);

        if needs_battery {
            ctx.agvs[i].set_activity(Activity::Swapping, now);
            ctx.agvs[i].waiting_for_battery = true;
            let station = ctx.config.yard.swap_station;
            if ctx.agvs[i].battery.is_some() && ctx.agvs[i].location != station {
                let secs = self.travel(now, ctx, station)?;
                self.phase = Phase::ToStation;
                return Ok(Some(Step::Hold(secs)));
            }
            return self.join_swap_queue(now, ctx);
        }

        if ctx.queues.containers.is_empty() {
            ctx.agvs[i].set_activity(Activity::Idle, now);
            ctx.queues.idle_agvs.push(self.agv);
            self.phase = Phase::Idle { since: now };
            return Ok(Some(Step::Passivate));
        }

        let container = ctx.queues.containers.pop()?;
        let yard = &ctx.config.yard;
        let offset = *ctx
            .rng
            .choose(&yard.pickup_offsets)
            .ok_or_else(|| SimError::Config("yard.pickup_offsets is empty".into()))?;
        let pickup = Point::new(yard.pickup_x, offset);
        let job = Job { container, picked_at: now };
        let secs = self.travel(now, ctx, pickup)?;
        self.phase = Phase::ToPickup(job);
        Ok(Some(Step::Hold(secs)))
    }

    /// At the station: hand the pack to the charging queue and wait for one.
    fn join_swap_queue<M: MetricsSink>(&mut self, now: SimTime, ctx: &mut FleetContext<M>) -> SimResult<Option<Step>> {
        if ctx.agvs[self.agv.index()].battery.is_some() {
            let battery = ctx.detach(self.agv)?;
            let soc = ctx.battery(battery).soc();
            debug!(agv = %self.agv, %battery, soc, "battery released");
            ctx.record(now, Metric::Soc(battery), soc);
            ctx.queues.charging.push(battery);
            if ctx.config.counts_swaps() {
                ctx.agvs[self.agv.index()].swap_count += 1;
            }
        }
        let agv = &mut ctx.agvs[self.agv.index()];
        agv.set_activity(Activity::Swapping, now);
        agv.waiting_for_battery = true;
        ctx.queues.swapping.push(self.agv);
        self.phase = Phase::AwaitingBattery;
        Ok(Some(Step::Passivate))
    }

    /// Woken by the swapper: take the head of the battery queue.
    fn take_battery<M: MetricsSink>(&mut self, ctx: &mut FleetContext<M>) -> SimResult<Option<Step>> {
        match ctx.queues.batteries.try_pop() {
            Some(battery) => {
                ctx.attach(self.agv, battery)?;
                debug!(agv = %self.agv, %battery, "battery attached");
                self.phase = Phase::Swapping;
                Ok(Some(Step::Hold(ctx.config.effective_swap_secs())))
            }
            None => {
                warn!(agv = %self.agv, "woken with no battery available, re-registering");
                self.phase = Phase::Decide;
                Ok(None)
            }
        }
    }

    /// Back from the idle queue: pay for the idle draw.
    fn wake_from_idle<M: MetricsSink>(&mut self, now: SimTime, since: SimTime, ctx: &mut FleetContext<M>) -> SimResult<Option<Step>> {
        let waited = now.since(since);
        let battery = ctx.agvs[self.agv.index()]
            .battery
            .ok_or(SimError::AgvWithoutBattery(self.agv))?;
        let kwh = ctx.config.agv.idle_power_kw * waited / SECS_PER_HOUR;
        let b = &mut ctx.batteries[battery.index()];
        b.draw(kwh);
        let soc = b.soc();
        ctx.record(now, Metric::IdleSecs(self.agv), waited);
        ctx.record(now, Metric::Soc(battery), soc);
        self.phase = Phase::Decide;
        Ok(None)
    }

    /// Start a travel leg to `dest`.  Returns its duration.
    fn travel<M: MetricsSink>(&self, now: SimTime, ctx: &mut FleetContext<M>, dest: Point) -> SimResult<f64> {
        let speed = ctx.config.agv.speed_mps;
        let kwh_per_km = ctx.config.agv.energy_per_km_kwh;
        let agv = &mut ctx.agvs[self.agv.index()];
        let battery = agv.battery.ok_or(SimError::AgvWithoutBattery(self.agv))?;

        let distance = agv.location.distance_to(dest);
        let secs = distance / speed;
        agv.set_activity(Activity::Running, now);
        agv.distance_traveled += distance;
        agv.location = dest;

        let b = &mut ctx.batteries[battery.index()];
        b.draw(distance / 1000.0 * kwh_per_km);
        let soc = b.soc();
        ctx.record(now, Metric::Soc(battery), soc);
        ctx.record(now, Metric::TravelMetres(self.agv), distance);
        ctx.record(now, Metric::TravelSecs(self.agv), secs);
        Ok(secs)
    }

    fn arrive<M>(&self, now: SimTime, ctx: &mut FleetContext<M>) {
        ctx.agvs[self.agv.index()].set_activity(Activity::Idle, now);
    }

    fn deliver<M: MetricsSink>(&mut self, now: SimTime, ctx: &mut FleetContext<M>, job: Job) {
        let mut container = job.container;
        container.processed_at = Some(now);
        ctx.agvs[self.agv.index()].containers_handled += 1;
        ctx.ledger.record_delivery(container.shipment);
        ctx.record(now, Metric::DeliveryMinutes, now.since(job.picked_at) / SECS_PER_MINUTE);
        let in_system = container.time_in_system_secs().unwrap_or(0.0);
        ctx.record(now, Metric::TimeInSystemMinutes, in_system / SECS_PER_MINUTE);
        debug!(agv = %self.agv, container = %container.id, in_system, "container delivered");
        self.phase = Phase::Decide;
    }
}

impl<M: MetricsSink> Process<FleetContext<M>> for AgvProcess {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        let now = kernel.now();
        loop {
            let step = match self.phase {
                Phase::Decide => self.decide(now, ctx)?,
                Phase::ToStation => {
                    self.arrive(now, ctx);
                    self.join_swap_queue(now, ctx)?
                }
                Phase::AwaitingBattery => self.take_battery(ctx)?,
                Phase::Swapping => {
                    ctx.agvs[self.agv.index()].waiting_for_battery = false;
                    self.phase = Phase::Decide;
                    None
                }
                Phase::Idle { since } => self.wake_from_idle(now, since, ctx)?,
                Phase::ToPickup(job) => {
                    self.arrive(now, ctx);
                    self.phase = Phase::Loading(job);
                    Some(Step::Hold(ctx.config.agv.loading_secs))
                }
                Phase::Loading(job) => {
                    let (lo, hi) = (ctx.config.yard.delivery_min, ctx.config.yard.delivery_max);
                    let dest = Point::new(ctx.rng.uniform(lo.x, hi.x), ctx.rng.uniform(lo.y, hi.y));
                    let secs = self.travel(now, ctx, dest)?;
                    self.phase = Phase::ToDelivery(job);
                    Some(Step::Hold(secs))
                }
                Phase::ToDelivery(job) => {
                    self.arrive(now, ctx);
                    self.phase = Phase::Unloading(job);
                    Some(Step::Hold(ctx.config.agv.unloading_secs))
                }
                Phase::Unloading(job) => {
                    self.deliver(now, ctx, job);
                    None
                }
            };
            if let Some(step) = step {
                return Ok(step);
            }
        }
    }

    fn label(&self) -> &str {
        "agv"
    }
}
