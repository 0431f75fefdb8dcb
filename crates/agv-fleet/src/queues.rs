//! The five resource queues.
//!
//! Each queue is a named FIFO.  Popping an empty queue is an invariant
//! violation: every caller checks `is_empty` first, so an underflow means
//! resource matching has gone wrong and the run must stop.

use std::collections::VecDeque;
use std::fmt;

use agv_core::{AgvId, BatteryId, SimError, SimResult};

use crate::Container;

/// Which of the five waiting lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueueKind {
    /// Charged packs ready to be picked up.
    Battery,
    /// Containers waiting for an AGV.
    Container,
    /// AGVs waiting for a pack.
    Swapping,
    /// Depleted packs waiting for a charger.
    Charging,
    /// AGVs with a usable pack but no work.
    IdleAgv,
}

impl QueueKind {
    pub const ALL: [QueueKind; 5] = [
        QueueKind::Battery,
        QueueKind::Container,
        QueueKind::Swapping,
        QueueKind::Charging,
        QueueKind::IdleAgv,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QueueKind::Battery   => "battery",
            QueueKind::Container => "container",
            QueueKind::Swapping  => "swapping",
            QueueKind::Charging  => "charging",
            QueueKind::IdleAgv   => "idle_agv",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── FifoQueue ─────────────────────────────────────────────────────────────────

/// An order-preserving waiting list.  `pop` always takes the head.
#[derive(Clone, Debug)]
pub struct FifoQueue<T> {
    kind:  QueueKind,
    items: VecDeque<T>,
}

impl<T> FifoQueue<T> {
    pub fn new(kind: QueueKind) -> Self {
        Self { kind, items: VecDeque::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Remove the head.  Fails with [`SimError::QueueUnderflow`] when empty.
    pub fn pop(&mut self) -> SimResult<T> {
        self.items
            .pop_front()
            .ok_or(SimError::QueueUnderflow { queue: self.kind.name() })
    }

    /// Remove the head if there is one.
    pub fn try_pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: PartialEq> FifoQueue<T> {
    /// Remove the first occurrence of `item`.  Returns whether it was queued.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|x| x == item) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

// ── ResourceQueues ────────────────────────────────────────────────────────────

/// All waiting lists of the terminal.
#[derive(Clone, Debug)]
pub struct ResourceQueues {
    pub batteries:  FifoQueue<BatteryId>,
    pub containers: FifoQueue<Container>,
    pub swapping:   FifoQueue<AgvId>,
    pub charging:   FifoQueue<BatteryId>,
    pub idle_agvs:  FifoQueue<AgvId>,
}

impl Default for ResourceQueues {
    fn default() -> Self {
        Self {
            batteries:  FifoQueue::new(QueueKind::Battery),
            containers: FifoQueue::new(QueueKind::Container),
            swapping:   FifoQueue::new(QueueKind::Swapping),
            charging:   FifoQueue::new(QueueKind::Charging),
            idle_agvs:  FifoQueue::new(QueueKind::IdleAgv),
        }
    }
}

impl ResourceQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len_of(&self, kind: QueueKind) -> usize {
        match kind {
            QueueKind::Battery   => self.batteries.len(),
            QueueKind::Container => self.containers.len(),
            QueueKind::Swapping  => self.swapping.len(),
            QueueKind::Charging  => self.charging.len(),
            QueueKind::IdleAgv   => self.idle_agvs.len(),
        }
    }

    /// `(kind, length)` for every queue, in [`QueueKind::ALL`] order.
    pub fn lengths(&self) -> [(QueueKind, usize); 5] {
        QueueKind::ALL.map(|k| (k, self.len_of(k)))
    }
}
