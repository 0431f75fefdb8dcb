//! `FleetContext`: the state every fleet process shares.

use agv_core::{
    AgvId, BatteryId, ContainerId, FleetConfig, ShipmentId, SimError, SimResult, SimRng, SimTime,
};

use crate::{Agv, Battery, Container, Metric, MetricsSink, ResourceQueues, ShipmentLedger};

/// Configuration, RNG, queues, entity arenas, shipment ledger, and the
/// metrics sink.  Owned by the scheduler and handed to each process step.
pub struct FleetContext<M> {
    pub config:    FleetConfig,
    pub rng:       SimRng,
    pub queues:    ResourceQueues,
    pub agvs:      Vec<Agv>,
    pub batteries: Vec<Battery>,
    pub ledger:    ShipmentLedger,
    pub sink:      M,
    next_container: u64,
}

impl<M: MetricsSink> FleetContext<M> {
    /// An empty fleet: no entities, all queues empty, RNG seeded from
    /// `config.run.seed`.
    pub fn new(config: FleetConfig, sink: M) -> Self {
        Self {
            rng: SimRng::new(config.run.seed),
            config,
            queues: ResourceQueues::new(),
            agvs: Vec::new(),
            batteries: Vec::new(),
            ledger: ShipmentLedger::new(),
            sink,
            next_container: 0,
        }
    }

    #[inline]
    pub fn record(&mut self, time: SimTime, metric: Metric, value: f64) {
        self.sink.record(time, metric, value);
    }

    /// Create a container of `shipment` and put it at the back of the queue.
    pub fn enqueue_container(&mut self, shipment: ShipmentId, now: SimTime) -> ContainerId {
        let id = ContainerId(self.next_container);
        self.next_container += 1;
        self.queues.containers.push(Container::new(id, shipment, now));
        id
    }

    pub fn agv(&self, id: AgvId) -> &Agv {
        &self.agvs[id.index()]
    }

    pub fn battery(&self, id: BatteryId) -> &Battery {
        &self.batteries[id.index()]
    }

    /// SOC of the pack `agv` carries, if it carries one.
    pub fn agv_soc(&self, agv: AgvId) -> Option<f64> {
        self.agvs[agv.index()].battery.map(|b| self.batteries[b.index()].soc())
    }

    // ── Ownership transfer ────────────────────────────────────────────────

    /// Put `battery` into `agv`.  Both sides must be free.
    pub fn attach(&mut self, agv: AgvId, battery: BatteryId) -> SimResult<()> {
        if let Some(held) = self.agvs[agv.index()].battery {
            return Err(SimError::AgvAlreadyHasBattery { agv, battery: held });
        }
        let b = &mut self.batteries[battery.index()];
        if let Some(holder) = b.owner {
            return Err(SimError::DoubleOwnership { battery, holder, claimant: agv });
        }
        b.owner = Some(agv);
        b.usage_count += 1;
        self.agvs[agv.index()].battery = Some(battery);
        Ok(())
    }

    /// Take the pack out of `agv`.
    pub fn detach(&mut self, agv: AgvId) -> SimResult<BatteryId> {
        let battery = self.agvs[agv.index()]
            .battery
            .take()
            .ok_or(SimError::AgvWithoutBattery(agv))?;
        self.batteries[battery.index()].owner = None;
        Ok(battery)
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Check the entity invariants: pack energy and capacity bounds, and
    /// one-to-one AGV/battery ownership.
    pub fn verify(&self) -> SimResult<()> {
        for b in &self.batteries {
            let floor = crate::battery::CAPACITY_FLOOR * b.initial_capacity;
            let ok = b.energy >= 0.0
                && b.energy <= b.capacity
                && b.capacity <= b.initial_capacity
                && b.capacity >= floor;
            if !ok {
                return Err(SimError::BatteryOutOfBounds {
                    battery:  b.id,
                    energy:   b.energy,
                    capacity: b.capacity,
                });
            }
            if let Some(holder) = b.owner {
                if self.agvs[holder.index()].battery != Some(b.id) {
                    return Err(SimError::OwnershipMismatch { agv: holder, battery: b.id });
                }
            }
        }
        for a in &self.agvs {
            let Some(b) = a.battery else { continue };
            match self.batteries[b.index()].owner {
                Some(holder) if holder == a.id => {}
                Some(holder) => {
                    return Err(SimError::DoubleOwnership { battery: b, holder, claimant: a.id });
                }
                None => return Err(SimError::OwnershipMismatch { agv: a.id, battery: b }),
            }
        }
        Ok(())
    }
}
