//! Vessel calls: shipments arrive, and a crane feeds their containers into
//! the container queue in fixed-size batches.
//!
//! # Stochastic arrivals
//!
//! ```text
//! size      = max(1, ⌊Gamma(size_shape, mean_size / size_shape)⌋)
//! deadline  = DeadlinePolicy::scaled_minutes(Normal(base_mean, base_std), size)
//! crane     = clamp(Normal(mean_cycle, std_cycle), min_cycle, max_cycle)   per batch after the first
//! next call = max(min_days, Gamma(k, mean_days / k)) days after unloading ends
//! ```
//!
//! Draw order is fixed (size, deadline, crane cycles, gap) so the stream is
//! reproducible for a given seed.
//!
//! A scripted workload replaces the draws for size, deadline and arrival
//! time; crane cycles are still drawn.  Shipments are unloaded one at a
//! time, so a scripted call due while the crane is busy waits, but its
//! arrival and deadline stay anchored to the scripted time.

use std::collections::VecDeque;

use agv_core::{ScriptedShipment, ShipmentId, SimResult, SimTime, SECS_PER_DAY, SECS_PER_MINUTE};
use agv_kernel::{Kernel, Process, Step};
use tracing::debug;

use crate::{FleetContext, Metric, MetricsSink};

enum Source {
    Stochastic,
    Scripted(VecDeque<ScriptedShipment>),
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Phase {
    /// Next shipment is due now (stochastic) or at the script's next time.
    Arrival,
    /// Crane cycle for `shipment`; `remaining` containers are still aboard.
    Unloading { shipment: ShipmentId, remaining: u32 },
}

pub struct ShipmentGenerator {
    source: Source,
    phase:  Phase,
}

impl ShipmentGenerator {
    /// Gamma/normal arrivals from `workload` parameters.
    pub fn stochastic() -> Self {
        Self { source: Source::Stochastic, phase: Phase::Arrival }
    }

    /// Replay a fixed list of shipments (sorted by arrival time here).
    pub fn scripted(mut script: Vec<ScriptedShipment>) -> Self {
        script.sort_by(|a, b| a.arrival_secs.total_cmp(&b.arrival_secs));
        Self { source: Source::Scripted(script.into()), phase: Phase::Arrival }
    }

    /// Scripted when the config carries a script, stochastic otherwise.
    pub fn from_config(workload: &agv_core::WorkloadConfig) -> Self {
        if workload.script.is_empty() {
            Self::stochastic()
        } else {
            Self::scripted(workload.script.clone())
        }
    }

    /// Open the next shipment, or say how long to wait for it.
    fn arrive<M: MetricsSink>(&mut self, now: SimTime, ctx: &mut FleetContext<M>) -> SimResult<Result<ShipmentId, Step>> {
        let (arrival, size, deadline_minutes) = match &mut self.source {
            Source::Stochastic => {
                let w = &ctx.config.workload;
                let size = ctx.rng.gamma(w.size_shape, w.size_scale())?.floor().max(1.0) as u32;
                let base = ctx.rng.normal(w.deadline.base_mean_minutes, w.deadline.base_std_minutes)?;
                (now, size, w.deadline.scaled_minutes(base, size))
            }
            Source::Scripted(script) => {
                let Some(next) = script.front() else {
                    return Ok(Err(Step::Finish));
                };
                if next.arrival_secs > now.secs() {
                    return Ok(Err(Step::Hold(next.arrival_secs - now.secs())));
                }
                // A call that came in while the crane was busy keeps its
                // scripted arrival; only its unloading starts late.
                let entry = (SimTime(next.arrival_secs), next.size.max(1), next.deadline_minutes);
                script.pop_front();
                entry
            }
        };
        let id = ctx.ledger.open(arrival, size, deadline_minutes);
        ctx.ledger.begin_unloading(id, now);
        debug!(shipment = %id, size, deadline_minutes, arrival = arrival.secs(), "shipment arrived");
        ctx.record(now, Metric::ShipmentSize(id), size as f64);
        Ok(Ok(id))
    }

    /// Delay before the next shipment once this one is unloaded.
    fn gap<M: MetricsSink>(&self, now: SimTime, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        match &self.source {
            Source::Stochastic => {
                let w = &ctx.config.workload;
                let days = ctx
                    .rng
                    .gamma(w.interarrival_shape, w.interarrival_scale_days())?
                    .max(w.min_interarrival_days);
                Ok(Step::Hold(days * SECS_PER_DAY))
            }
            Source::Scripted(script) => Ok(match script.front() {
                Some(next) => Step::Hold((next.arrival_secs - now.secs()).max(0.0)),
                None => Step::Finish,
            }),
        }
    }

    fn crane_cycle_secs<M: MetricsSink>(ctx: &mut FleetContext<M>) -> SimResult<f64> {
        let c = &ctx.config.workload.crane;
        let secs = ctx.rng.normal(c.mean_cycle_secs, c.std_cycle_secs)?;
        Ok(secs.clamp(c.min_cycle_secs, c.max_cycle_secs))
    }
}

impl<M: MetricsSink> Process<FleetContext<M>> for ShipmentGenerator {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        let now = kernel.now();
        let (shipment, remaining) = match self.phase {
            Phase::Arrival => match self.arrive(now, ctx)? {
                Ok(id) => (id, ctx.ledger.get(id).map_or(0, |s| s.size)),
                Err(wait) => return Ok(wait),
            },
            Phase::Unloading { shipment, remaining } => (shipment, remaining),
        };

        let batch = remaining.min(ctx.config.workload.crane.containers_per_cycle);
        for _ in 0..batch {
            ctx.enqueue_container(shipment, now);
        }
        let remaining = remaining - batch;
        if remaining > 0 {
            self.phase = Phase::Unloading { shipment, remaining };
            return Ok(Step::Hold(Self::crane_cycle_secs(ctx)?));
        }

        ctx.ledger.mark_unloaded(shipment, now);
        if let Some(s) = ctx.ledger.get(shipment) {
            let minutes = s.unloading_secs().unwrap_or(0.0) / SECS_PER_MINUTE;
            ctx.record(now, Metric::UnloadingMinutes(shipment), minutes);
        }
        self.phase = Phase::Arrival;
        self.gap(now, ctx)
    }

    fn label(&self) -> &str {
        "generator"
    }
}
