//! `WakeQueue`, the pending-event set.
//!
//! Events are keyed by due time; entries sharing a due time sit in a
//! `VecDeque` in the order they were pushed, which is the FIFO tie-break the
//! scheduler relies on for reproducibility.
//!
//! A process has at most one pending wake-up.  Pushing a process that is
//! already queued moves it, and [`cancel`](WakeQueue::cancel) removes it,
//! which is how reactivation pre-empts a hold.
//!
//! # Performance note
//!
//! `BTreeMap` gives O(log W) insert and pop where W = number of distinct due
//! times.  Cancellation scans one `VecDeque`; with continuous time almost
//! every due time holds a single entry, so the scan is short.

use std::collections::{BTreeMap, VecDeque};

use agv_core::{ProcessId, SimTime};

#[cfg(feature = "fx-hash")]
type PendingMap = rustc_hash::FxHashMap<ProcessId, SimTime>;
#[cfg(not(feature = "fx-hash"))]
type PendingMap = std::collections::HashMap<ProcessId, SimTime>;

/// Time-ordered set of pending process wake-ups.
#[derive(Default)]
pub struct WakeQueue {
    inner:   BTreeMap<SimTime, VecDeque<ProcessId>>,
    /// Reverse index for O(log W) cancellation.
    pending: PendingMap,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `process` to wake at `at`, replacing any earlier wake-up.
    pub fn push(&mut self, at: SimTime, process: ProcessId) {
        self.cancel(process);
        self.inner.entry(at).or_default().push_back(process);
        self.pending.insert(process, at);
    }

    /// Drop the pending wake-up of `process`.  Returns the time it was due.
    pub fn cancel(&mut self, process: ProcessId) -> Option<SimTime> {
        let at = self.pending.remove(&process)?;
        if let Some(slot) = self.inner.get_mut(&at) {
            if let Some(pos) = slot.iter().position(|&p| p == process) {
                slot.remove(pos);
            }
            if slot.is_empty() {
                self.inner.remove(&at);
            }
        }
        Some(at)
    }

    /// Remove and return the earliest entry (FIFO among equal due times).
    pub fn pop_next(&mut self) -> Option<(SimTime, ProcessId)> {
        let mut first = self.inner.first_entry()?;
        let at = *first.key();
        let process = first.get_mut().pop_front()?;
        if first.get().is_empty() {
            first.remove();
        }
        self.pending.remove(&process);
        Some((at, process))
    }

    /// The earliest due time, or `None` if nothing is pending.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// When `process` is due, if it is queued.
    pub fn due_time(&self, process: ProcessId) -> Option<SimTime> {
        self.pending.get(&process).copied()
    }

    /// Total number of pending wake-ups.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of distinct due times.
    pub fn time_count(&self) -> usize {
        self.inner.len()
    }
}
