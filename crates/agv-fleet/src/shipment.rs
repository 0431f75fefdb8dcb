//! Containers, shipments, and the ledger that tracks them.
//!
//! A shipment moves through three states:
//!
//! | Status      | Meaning                                                  |
//! |-------------|----------------------------------------------------------|
//! | `Unloading` | the crane is still putting its containers in the queue   |
//! | `Active`    | all containers enqueued, waiting for the queue to drain  |
//! | `Completed` | finalized on a queue-drain edge; on-time status is fixed |

use agv_core::{ContainerId, ShipmentId, SimTime, SECS_PER_MINUTE};
use tracing::debug;

/// One unit of work.  Identity is fixed at creation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Container {
    pub id:           ContainerId,
    pub shipment:     ShipmentId,
    pub created_at:   SimTime,
    /// Set when an AGV finishes unloading it at the yard.
    pub processed_at: Option<SimTime>,
}

impl Container {
    pub fn new(id: ContainerId, shipment: ShipmentId, created_at: SimTime) -> Self {
        Self { id, shipment, created_at, processed_at: None }
    }

    /// Creation to delivery, seconds.  `None` until delivered.
    pub fn time_in_system_secs(&self) -> Option<f64> {
        self.processed_at.map(|t| t.since(self.created_at))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShipmentStatus {
    Unloading,
    Active,
    Completed,
}

/// A vessel call: `size` containers that should be delivered by the deadline.
#[derive(Clone, Debug, PartialEq)]
pub struct Shipment {
    pub id:                 ShipmentId,
    pub size:               u32,
    pub arrival_time:       SimTime,
    pub unloading_start:    SimTime,
    pub unloading_done:     Option<SimTime>,
    pub deadline_minutes:   f64,
    pub deadline_time:      SimTime,
    pub completion_time:    Option<SimTime>,
    pub containers_delivered: u32,
    pub status:             ShipmentStatus,
}

impl Shipment {
    /// Arrival to completion, seconds.
    pub fn delivery_secs(&self) -> Option<f64> {
        self.completion_time.map(|t| t.since(self.arrival_time))
    }

    pub fn unloading_secs(&self) -> Option<f64> {
        self.unloading_done.map(|t| t.since(self.unloading_start))
    }

    /// `Some(true)` when completed by the deadline; `None` until completed.
    pub fn is_on_time(&self) -> Option<bool> {
        self.completion_time.map(|t| t <= self.deadline_time)
    }

    pub fn is_overdue(&self) -> Option<bool> {
        self.is_on_time().map(|on_time| !on_time)
    }

    /// Seconds past the deadline at completion (zero when on time).
    pub fn overdue_secs(&self) -> Option<f64> {
        self.completion_time.map(|t| t.since(self.deadline_time))
    }
}

// ── ShipmentLedger ────────────────────────────────────────────────────────────

/// Every shipment of the run plus the running totals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShipmentLedger {
    shipments: Vec<Shipment>,
    /// Shipments not yet completed, in arrival order.
    active:    Vec<ShipmentId>,
    completed: Vec<ShipmentId>,
    pub containers_received:  u64,
    pub containers_delivered: u64,
    /// Last time the tracker saw the container queue drain.
    pub last_queue_empty:     Option<SimTime>,
}

impl ShipmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shipment arriving at `arrival`.  Unloading is assumed to start
    /// on arrival; see [`begin_unloading`](Self::begin_unloading).
    pub fn open(&mut self, arrival: SimTime, size: u32, deadline_minutes: f64) -> ShipmentId {
        let id = ShipmentId(self.shipments.len() as u32);
        self.shipments.push(Shipment {
            id,
            size,
            arrival_time: arrival,
            unloading_start: arrival,
            unloading_done: None,
            deadline_minutes,
            deadline_time: arrival + deadline_minutes * SECS_PER_MINUTE,
            completion_time: None,
            containers_delivered: 0,
            status: ShipmentStatus::Unloading,
        });
        self.active.push(id);
        self.containers_received += size as u64;
        id
    }

    /// The crane starts on `id` at `now`, which may be after its arrival.
    pub fn begin_unloading(&mut self, id: ShipmentId, now: SimTime) {
        if let Some(s) = self.shipments.get_mut(id.index()) {
            s.unloading_start = now.max(s.arrival_time);
        }
    }

    /// All containers of `id` have been enqueued.
    pub fn mark_unloaded(&mut self, id: ShipmentId, now: SimTime) {
        if let Some(s) = self.shipments.get_mut(id.index()) {
            s.unloading_done = Some(now);
            if s.status == ShipmentStatus::Unloading {
                s.status = ShipmentStatus::Active;
            }
        }
    }

    pub fn record_delivery(&mut self, id: ShipmentId) {
        if let Some(s) = self.shipments.get_mut(id.index()) {
            s.containers_delivered += 1;
        }
        self.containers_delivered += 1;
    }

    /// Complete every unloaded shipment on a queue-drain edge at `now`.
    /// Returns the shipments finalized by this call.
    pub fn finalize(&mut self, now: SimTime) -> Vec<ShipmentId> {
        self.last_queue_empty = Some(now);
        let mut done = Vec::new();
        let shipments = &mut self.shipments;
        self.active.retain(|&id| {
            let s = &mut shipments[id.index()];
            if s.status != ShipmentStatus::Active {
                return true;
            }
            s.completion_time = Some(now);
            s.status = ShipmentStatus::Completed;
            debug!(shipment = %id, on_time = now <= s.deadline_time, "shipment completed");
            done.push(id);
            false
        });
        self.completed.extend_from_slice(&done);
        done
    }

    pub fn get(&self, id: ShipmentId) -> Option<&Shipment> {
        self.shipments.get(id.index())
    }

    /// Every shipment, in arrival order.
    pub fn all(&self) -> &[Shipment] {
        &self.shipments
    }

    pub fn active(&self) -> impl Iterator<Item = &Shipment> {
        self.active.iter().map(|id| &self.shipments[id.index()])
    }

    pub fn completed(&self) -> impl Iterator<Item = &Shipment> {
        self.completed.iter().map(|id| &self.shipments[id.index()])
    }

    pub fn total(&self) -> usize {
        self.shipments.len()
    }

    pub fn on_time_count(&self) -> usize {
        self.completed().filter(|s| s.is_on_time() == Some(true)).count()
    }

    pub fn overdue_count(&self) -> usize {
        self.completed().filter(|s| s.is_overdue() == Some(true)).count()
    }

    /// Mean lateness of overdue shipments, seconds.
    pub fn mean_overdue_secs(&self) -> Option<f64> {
        let late: Vec<f64> = self
            .completed()
            .filter(|s| s.is_overdue() == Some(true))
            .filter_map(Shipment::overdue_secs)
            .collect();
        (!late.is_empty()).then(|| late.iter().sum::<f64>() / late.len() as f64)
    }
}
