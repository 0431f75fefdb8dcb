//! Battery packs: energy state, degradation, and the charging process.
//!
//! # Degradation model
//!
//! The SOC axis is split into buckets, each with a capacity loss expressed as
//! a fraction of the initial capacity per 1200 cycles.  A charge from
//! `start_soc` up to the ceiling traverses the half-open range
//! `[start_soc, ceiling)`; every bucket `[low, high)` that intersects it
//! accrues one cycle and loses `rate / 1200 × initial_capacity`.  Capacity
//! never drops below 10 % of the initial capacity.

use agv_core::{AgvId, BatteryId, DegradationBucket, ProcessId, SimResult, SimTime};
use agv_kernel::{Kernel, Process, Step};
use tracing::debug;

use crate::{FleetContext, Metric, MetricsSink};

/// Capacity floor as a fraction of the initial capacity.
pub const CAPACITY_FLOOR: f64 = 0.1;

/// Cycles after which a bucket's full loss rate has been applied.
const RATED_CYCLES: f64 = 1200.0;

// ── Battery ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Battery {
    pub id:               BatteryId,
    /// The battery's charging process.
    pub process:          ProcessId,
    /// The AGV carrying this pack, if any.
    pub owner:            Option<AgvId>,
    pub initial_capacity: f64,
    /// kWh; non-increasing, floored at [`CAPACITY_FLOOR`] × initial.
    pub capacity:         f64,
    /// kWh; always within `[0, capacity]`.
    pub energy:           f64,
    pub charge_cycles:    u32,
    pub usage_count:      u32,
    /// Cumulative kWh drawn by AGVs.
    pub total_energy_delivered: f64,
    /// Cycles accrued per degradation bucket, parallel to the bucket table.
    pub cycles_in_range:  Vec<u32>,
}

impl Battery {
    pub fn new(id: BatteryId, process: ProcessId, capacity_kwh: f64, initial_soc: f64, buckets: usize) -> Self {
        Self {
            id,
            process,
            owner: None,
            initial_capacity: capacity_kwh,
            capacity: capacity_kwh,
            energy: (initial_soc / 100.0 * capacity_kwh).clamp(0.0, capacity_kwh),
            charge_cycles: 0,
            usage_count: 0,
            total_energy_delivered: 0.0,
            cycles_in_range: vec![0; buckets],
        }
    }

    /// State of charge, percent of current capacity.
    pub fn soc(&self) -> f64 {
        self.energy / self.capacity * 100.0
    }

    /// State of health, percent of initial capacity.
    pub fn soh(&self) -> f64 {
        self.capacity / self.initial_capacity * 100.0
    }

    /// Energy at `soc_pct` of the current capacity.
    pub fn energy_at(&self, soc_pct: f64) -> f64 {
        soc_pct / 100.0 * self.capacity
    }

    /// Take up to `kwh` out of the pack.  Returns what was actually drawn;
    /// the pack never goes below empty.
    pub fn draw(&mut self, kwh: f64) -> f64 {
        let taken = kwh.max(0.0).min(self.energy);
        self.energy -= taken;
        self.total_energy_delivered += taken;
        taken
    }

    /// Seconds on a `rate_kw` charger to reach `ceiling_soc`.  Zero when the
    /// pack is already at or above the ceiling.
    pub fn charge_secs(&self, ceiling_soc: f64, rate_kw: f64) -> f64 {
        let deficit = self.energy_at(ceiling_soc) - self.energy;
        if deficit > 0.0 { deficit / rate_kw * 3600.0 } else { 0.0 }
    }

    /// Apply one charge's worth of wear for a charge from `start_soc` to
    /// `end_soc`.  Returns the kWh of capacity lost.
    pub fn apply_degradation(&mut self, table: &[DegradationBucket], start_soc: f64, end_soc: f64) -> f64 {
        let before = self.capacity;
        let floor = CAPACITY_FLOOR * self.initial_capacity;
        if end_soc <= start_soc {
            return 0.0;
        }
        for (i, bucket) in table.iter().enumerate() {
            if start_soc < bucket.high && end_soc > bucket.low {
                if let Some(n) = self.cycles_in_range.get_mut(i) {
                    *n += 1;
                }
                let loss = bucket.loss_per_1200_cycles / RATED_CYCLES * self.initial_capacity;
                self.capacity = (self.capacity - loss).max(floor);
            }
        }
        self.energy = self.energy.min(self.capacity);
        before - self.capacity
    }
}

// ── BatteryProcess ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
enum Phase {
    /// Waiting to be taken off the charging queue.
    Queued,
    Charging { start_soc: f64, started_at: SimTime },
}

/// Charges its pack whenever the charging station activates it, then returns
/// it to the available-battery queue and passivates.
pub struct BatteryProcess {
    battery: BatteryId,
    phase:   Phase,
}

impl BatteryProcess {
    pub fn new(battery: BatteryId) -> Self {
        Self { battery, phase: Phase::Queued }
    }

    fn complete<M: MetricsSink>(
        &mut self,
        now: SimTime,
        ctx: &mut FleetContext<M>,
        start_soc: f64,
        started_at: SimTime,
    ) -> SimResult<Step> {
        let soc_max = ctx.config.battery.soc_max;
        let b = &mut ctx.batteries[self.battery.index()];
        let lost = b.apply_degradation(&ctx.config.battery.degradation, start_soc, soc_max);
        let (soc, soh) = (b.soc(), b.soh());
        debug!(battery = %self.battery, start_soc, soc, soh, "charge complete");

        ctx.record(now, Metric::ChargeSecs(self.battery), now.since(started_at));
        ctx.record(now, Metric::CapacityFade(self.battery), lost);
        ctx.record(now, Metric::Soh(self.battery), soh);
        ctx.record(now, Metric::Soc(self.battery), soc);
        ctx.queues.batteries.push(self.battery);
        self.phase = Phase::Queued;
        Ok(Step::Passivate)
    }
}

impl<M: MetricsSink> Process<FleetContext<M>> for BatteryProcess {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        let now = kernel.now();
        match self.phase {
            Phase::Queued => {
                let cfg = &ctx.config.battery;
                let b = &mut ctx.batteries[self.battery.index()];
                b.charge_cycles += 1;
                let start_soc = b.soc();
                let secs = b.charge_secs(cfg.soc_max, cfg.charging_rate_kw);
                if secs > 0.0 {
                    debug!(battery = %self.battery, start_soc, secs, "charge started");
                    self.phase = Phase::Charging { start_soc, started_at: now };
                    Ok(Step::Hold(secs))
                } else {
                    self.complete(now, ctx, start_soc, now)
                }
            }
            Phase::Charging { start_soc, started_at } => {
                let soc_max = ctx.config.battery.soc_max;
                let b = &mut ctx.batteries[self.battery.index()];
                b.energy = b.energy_at(soc_max).min(b.capacity);
                self.complete(now, ctx, start_soc, started_at)
            }
        }
    }

    fn label(&self) -> &str {
        "battery"
    }
}
