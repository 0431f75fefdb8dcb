//! Polling dispatchers.
//!
//! Each dispatcher wakes on a fixed interval, inspects the queues, moves
//! entities between them, and reactivates the processes it has matched.
//!
//! | Process           | Polls every                | Does                                          |
//! |-------------------|----------------------------|-----------------------------------------------|
//! | `SwapperStation`  | `swapper_interval_secs`    | one waiting AGV per poll when a pack is ready |
//! | `ChargingStation` | `charger_interval_secs`    | drains the charging queue, one pack per 0-hold |
//! | `AgvActivator`    | `activator_interval_secs`  | wakes every usable idle AGV when work waits   |
//! | `ShipmentTracker` | `tracker_interval_secs`    | finalizes shipments when the queue drains     |
//! | `QueueSampler`    | `queue_sample_interval_secs` | emits the five queue lengths                |

use agv_core::{AgvId, SimResult, SECS_PER_HOUR};
use agv_kernel::{Kernel, Process, Step};
use tracing::debug;

use crate::{FleetContext, Metric, MetricsSink};

// ── SwapperStation ────────────────────────────────────────────────────────────

/// Pairs the head of the swap queue with an available pack.  The AGV takes
/// the pack itself when it resumes.
pub struct SwapperStation;

impl<M: MetricsSink> Process<FleetContext<M>> for SwapperStation {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        if !ctx.queues.swapping.is_empty() && !ctx.queues.batteries.is_empty() {
            let agv = ctx.queues.swapping.pop()?;
            kernel.activate(ctx.agv(agv).process)?;
        }
        Ok(Step::Hold(ctx.config.dispatch.swapper_interval_secs))
    }

    fn label(&self) -> &str {
        "swapper"
    }
}

// ── ChargingStation ───────────────────────────────────────────────────────────

/// Starts charging every queued pack.  After each dispatch it holds for zero
/// seconds so several packs can start within the same instant.
pub struct ChargingStation;

impl<M: MetricsSink> Process<FleetContext<M>> for ChargingStation {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        if ctx.queues.charging.is_empty() {
            return Ok(Step::Hold(ctx.config.dispatch.charger_interval_secs));
        }
        let battery = ctx.queues.charging.pop()?;
        kernel.activate(ctx.battery(battery).process)?;
        Ok(Step::Hold(0.0))
    }

    fn label(&self) -> &str {
        "charger"
    }
}

// ── AgvActivator ──────────────────────────────────────────────────────────────

/// Wakes idle AGVs when containers are waiting.  Only AGVs that carry a pack
/// above the minimum SOC and are not waiting for a swap qualify.
pub struct AgvActivator;

impl<M: MetricsSink> Process<FleetContext<M>> for AgvActivator {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        if !ctx.queues.containers.is_empty() {
            let soc_min = ctx.config.battery.soc_min;
            let ready: Vec<AgvId> = ctx
                .queues
                .idle_agvs
                .iter()
                .copied()
                .filter(|&a| {
                    !ctx.agv(a).waiting_for_battery && ctx.agv_soc(a).is_some_and(|soc| soc > soc_min)
                })
                .collect();
            for agv in ready {
                ctx.queues.idle_agvs.remove(&agv);
                kernel.activate(ctx.agv(agv).process)?;
            }
        }
        Ok(Step::Hold(ctx.config.dispatch.activator_interval_secs))
    }

    fn label(&self) -> &str {
        "activator"
    }
}

// ── ShipmentTracker ───────────────────────────────────────────────────────────

/// Watches the container queue for a non-empty → empty edge and finalizes
/// every fully unloaded shipment on that edge.
pub struct ShipmentTracker {
    queue_was_empty: bool,
}

impl ShipmentTracker {
    pub fn new() -> Self {
        Self { queue_was_empty: true }
    }
}

impl Default for ShipmentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MetricsSink> Process<FleetContext<M>> for ShipmentTracker {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        let now = kernel.now();
        let empty = ctx.queues.containers.is_empty();
        if empty && !self.queue_was_empty {
            let done = ctx.ledger.finalize(now);
            debug!(finalized = done.len(), "container queue drained");
            for id in done {
                let hours = ctx.ledger.get(id).and_then(|s| s.delivery_secs()).unwrap_or(0.0) / SECS_PER_HOUR;
                ctx.record(now, Metric::ShipmentDeliveryHours(id), hours);
            }
        }
        self.queue_was_empty = empty;
        Ok(Step::Hold(ctx.config.dispatch.tracker_interval_secs))
    }

    fn label(&self) -> &str {
        "tracker"
    }
}

// ── QueueSampler ──────────────────────────────────────────────────────────────

/// Emits the length of every resource queue on a fixed period.
pub struct QueueSampler;

impl<M: MetricsSink> Process<FleetContext<M>> for QueueSampler {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut FleetContext<M>) -> SimResult<Step> {
        let now = kernel.now();
        for (kind, len) in ctx.queues.lengths() {
            ctx.record(now, Metric::QueueLength(kind), len as f64);
        }
        Ok(Step::Hold(ctx.config.run.queue_sample_interval_secs))
    }

    fn label(&self) -> &str {
        "sampler"
    }
}
