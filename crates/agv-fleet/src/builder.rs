//! Fluent builder that turns a [`FleetConfig`] into a ready-to-run scheduler.

use agv_core::{AgvId, BatteryId, FleetConfig, SimResult, SimTime};
use agv_kernel::Scheduler;
use tracing::info;

use crate::{
    Agv, AgvActivator, AgvProcess, Battery, BatteryProcess, ChargingStation, FleetContext,
    MetricsSink, NullSink, QueueSampler, ShipmentGenerator, ShipmentTracker, SwapperStation,
};

/// A scheduler driving a fleet whose samples go to `M`.
pub type FleetSim<M> = Scheduler<FleetContext<M>>;

/// Builds a [`FleetSim`].
///
/// # Process order
///
/// Processes are registered in a fixed order so same-time events always run
/// in the same sequence:
///
/// | Order | Process                                   | Starts   |
/// |-------|-------------------------------------------|----------|
/// | 1     | one `BatteryProcess` per pack             | passive  |
/// | 2     | one `AgvProcess` per vehicle              | t = 0    |
/// | 3     | `ShipmentGenerator`                       | t = 0    |
/// | 4     | `SwapperStation`, `ChargingStation`       | t = 0    |
/// | 5     | `QueueSampler`, `ShipmentTracker`, `AgvActivator` | t = 0 |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = FleetBuilder::new(FleetConfig::default())
///     .sink(MetricsRecorder::new())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// let report = FleetReport::from_sim(&sim);
/// ```
pub struct FleetBuilder<M> {
    config: FleetConfig,
    sink:   M,
}

impl FleetBuilder<NullSink> {
    pub fn new(config: FleetConfig) -> Self {
        Self { config, sink: NullSink }
    }
}

impl<M: MetricsSink + 'static> FleetBuilder<M> {
    /// Send samples to `sink` instead of discarding them.
    pub fn sink<N: MetricsSink + 'static>(self, sink: N) -> FleetBuilder<N> {
        FleetBuilder { config: self.config, sink }
    }

    /// Validate the configuration, create every entity and process, and
    /// place the packs.
    pub fn build(self) -> SimResult<FleetSim<M>> {
        self.config.validate()?;
        let horizon = SimTime(self.config.run.horizon_secs);
        let n_agvs = self.config.fleet.num_agvs;
        let n_batteries = self.config.fleet.num_batteries;
        let start_in_agvs = self.config.fleet.batteries_start_in_agvs;
        let policy = self.config.fleet.energy_policy;

        let mut sim = Scheduler::new(FleetContext::new(self.config, self.sink), horizon);

        // ── Entities ──────────────────────────────────────────────────────
        for i in 0..n_batteries {
            let id = BatteryId(i as u32);
            let process = sim.spawn_passive(BatteryProcess::new(id));
            let cfg = &sim.context().config.battery;
            let battery = Battery::new(id, process, cfg.capacity_kwh, cfg.initial_soc, cfg.degradation.len());
            sim.context_mut().batteries.push(battery);
        }
        for i in 0..n_agvs {
            let id = AgvId(i as u32);
            let process = sim.spawn(AgvProcess::new(id));
            let station = sim.context().config.yard.swap_station;
            sim.context_mut().agvs.push(Agv::new(id, process, station));
        }

        // ── Initial pack placement ────────────────────────────────────────
        let ctx = sim.context_mut();
        for i in 0..n_batteries {
            let battery = BatteryId(i as u32);
            if start_in_agvs && i < n_agvs {
                ctx.attach(AgvId(i as u32), battery)?;
            } else {
                ctx.queues.batteries.push(battery);
            }
        }

        // ── Workload and dispatchers ──────────────────────────────────────
        let generator = ShipmentGenerator::from_config(&ctx.config.workload);
        sim.spawn(generator);
        sim.spawn(SwapperStation);
        sim.spawn(ChargingStation);
        sim.spawn(QueueSampler);
        sim.spawn(ShipmentTracker::new());
        sim.spawn(AgvActivator);

        info!(
            agvs = n_agvs,
            batteries = n_batteries,
            ?policy,
            processes = sim.process_count(),
            "fleet built"
        );
        Ok(sim)
    }
}
