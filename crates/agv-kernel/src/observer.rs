//! Scheduler observer trait.

use agv_core::{ProcessId, SimTime};

/// Callbacks invoked by [`Scheduler::run`][crate::Scheduler::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait SimObserver {
    /// Called after each dispatched event, once the process has suspended.
    fn on_event(&mut self, _time: SimTime, _process: ProcessId) {}

    /// Called once after the clock reaches the horizon.
    fn on_sim_end(&mut self, _final_time: SimTime, _events: u64) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Records the order in which events were dispatched.
///
/// Two runs with the same seed and configuration must produce equal traces.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventTrace {
    pub events: Vec<(SimTime, ProcessId)>,
    pub final_time: Option<SimTime>,
}

impl SimObserver for EventTrace {
    fn on_event(&mut self, time: SimTime, process: ProcessId) {
        self.events.push((time, process));
    }

    fn on_sim_end(&mut self, final_time: SimTime, _events: u64) {
        self.final_time = Some(final_time);
    }
}
