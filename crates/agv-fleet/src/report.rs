//! End-of-run summary.

use agv_core::{AgvId, BatteryId, SimTime};

use crate::{FleetContext, FleetSim, MetricsSink, Shipment};

/// Time split and work done by one AGV, with the open activity interval
/// closed at the report time.
#[derive(Clone, Debug, PartialEq)]
pub struct AgvActivity {
    pub agv:           AgvId,
    pub idle_secs:     f64,
    pub running_secs:  f64,
    pub swapping_secs: f64,
    pub distance_m:    f64,
    pub swaps:         u32,
    pub containers:    u32,
}

impl AgvActivity {
    pub fn total_secs(&self) -> f64 {
        self.idle_secs + self.running_secs + self.swapping_secs
    }

    fn pct(&self, part: f64) -> f64 {
        let total = self.total_secs();
        if total > 0.0 { part / total * 100.0 } else { 0.0 }
    }

    pub fn idle_pct(&self) -> f64 {
        self.pct(self.idle_secs)
    }

    pub fn running_pct(&self) -> f64 {
        self.pct(self.running_secs)
    }

    pub fn swapping_pct(&self) -> f64 {
        self.pct(self.swapping_secs)
    }
}

/// Final state of one pack.
#[derive(Clone, Debug, PartialEq)]
pub struct BatterySummary {
    pub battery:         BatteryId,
    pub soh:             f64,
    pub capacity_kwh:    f64,
    pub energy_kwh:      f64,
    pub charge_cycles:   u32,
    pub usage_count:     u32,
    pub energy_delivered_kwh: f64,
    /// `(bucket label, cycles)` in table order.
    pub cycles_in_range: Vec<(String, u32)>,
}

/// Shipment totals and deadline performance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShipmentStats {
    pub total:                usize,
    pub completed:            usize,
    pub active:               usize,
    pub on_time:              usize,
    pub overdue:              usize,
    pub mean_overdue_secs:    Option<f64>,
    pub containers_received:  u64,
    pub containers_delivered: u64,
    pub containers_waiting:   usize,
    pub last_queue_empty:     Option<SimTime>,
}

impl ShipmentStats {
    /// Share of completed shipments that met their deadline, percent.
    pub fn on_time_pct(&self) -> Option<f64> {
        (self.completed > 0).then(|| self.on_time as f64 / self.completed as f64 * 100.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FleetReport {
    pub final_time: SimTime,
    pub events:     u64,
    pub agvs:       Vec<AgvActivity>,
    pub batteries:  Vec<BatterySummary>,
    pub shipments:  Vec<Shipment>,
    pub stats:      ShipmentStats,
}

impl FleetReport {
    /// Summarize a finished (or paused) simulation.
    pub fn from_sim<M: MetricsSink>(sim: &FleetSim<M>) -> Self {
        Self::from_context(sim.context(), sim.now(), sim.kernel().events())
    }

    pub fn from_context<M: MetricsSink>(ctx: &FleetContext<M>, now: SimTime, events: u64) -> Self {
        let agvs = ctx
            .agvs
            .iter()
            .map(|a| {
                let (idle, running, swapping) = a.activity_totals(now);
                AgvActivity {
                    agv:           a.id,
                    idle_secs:     idle,
                    running_secs:  running,
                    swapping_secs: swapping,
                    distance_m:    a.distance_traveled,
                    swaps:         a.swap_count,
                    containers:    a.containers_handled,
                }
            })
            .collect();

        let table = &ctx.config.battery.degradation;
        let batteries = ctx
            .batteries
            .iter()
            .map(|b| BatterySummary {
                battery:         b.id,
                soh:             b.soh(),
                capacity_kwh:    b.capacity,
                energy_kwh:      b.energy,
                charge_cycles:   b.charge_cycles,
                usage_count:     b.usage_count,
                energy_delivered_kwh: b.total_energy_delivered,
                cycles_in_range: table
                    .iter()
                    .zip(&b.cycles_in_range)
                    .map(|(bucket, &n)| (bucket.label(), n))
                    .collect(),
            })
            .collect();

        let ledger = &ctx.ledger;
        let stats = ShipmentStats {
            total:                ledger.total(),
            completed:            ledger.completed().count(),
            active:               ledger.active().count(),
            on_time:              ledger.on_time_count(),
            overdue:              ledger.overdue_count(),
            mean_overdue_secs:    ledger.mean_overdue_secs(),
            containers_received:  ledger.containers_received,
            containers_delivered: ledger.containers_delivered,
            containers_waiting:   ctx.queues.containers.len(),
            last_queue_empty:     ledger.last_queue_empty,
        };

        Self {
            final_time: now,
            events,
            agvs,
            batteries,
            shipments: ledger.all().to_vec(),
            stats,
        }
    }

    /// Fleet-wide `(idle, running, swapping)` averages in seconds.
    pub fn mean_activity(&self) -> (f64, f64, f64) {
        if self.agvs.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let n = self.agvs.len() as f64;
        let sum = self.agvs.iter().fold((0.0, 0.0, 0.0), |acc, a| {
            (acc.0 + a.idle_secs, acc.1 + a.running_secs, acc.2 + a.swapping_secs)
        });
        (sum.0 / n, sum.1 / n, sum.2 / n)
    }

    pub fn mean_soh(&self) -> Option<f64> {
        let n = self.batteries.len();
        (n > 0).then(|| self.batteries.iter().map(|b| b.soh).sum::<f64>() / n as f64)
    }

    pub fn total_swaps(&self) -> u64 {
        self.agvs.iter().map(|a| a.swaps as u64).sum()
    }

    pub fn total_containers(&self) -> u64 {
        self.agvs.iter().map(|a| a.containers as u64).sum()
    }
}
