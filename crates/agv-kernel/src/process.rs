//! The `Process` trait: the unit of behavior the scheduler drives.

use agv_core::{SimResult, SimTime};

use crate::Kernel;

/// What a process wants after running a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Suspend for this many seconds, then resume automatically.
    Hold(f64),
    /// Suspend until another process reactivates this one.
    Passivate,
    /// The behavior is over; the process is never resumed again.
    Finish,
}

/// Scheduler-side lifecycle of a process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessState {
    /// In the wake queue, due at the given time.
    Scheduled(SimTime),
    /// Suspended without a timeout.
    Passive,
    /// Currently executing a step.
    Running,
    Finished,
}

/// A cooperatively resumable entity.
///
/// A process is an explicit state machine: it keeps its own resume point in
/// `self` and, on every call to [`resume`](Self::resume), advances until it
/// reaches the next suspension and returns the corresponding [`Step`].  No
/// other process runs in between, so everything a step does to the shared
/// context `C` is atomic from everyone else's point of view.
///
/// Returning `Err` aborts the whole run; use it for invariant violations only.
///
/// # Example
///
/// ```rust,ignore
/// struct Blinker { on: bool }
///
/// impl Process<()> for Blinker {
///     fn resume(&mut self, _k: &mut Kernel, _ctx: &mut ()) -> SimResult<Step> {
///         self.on = !self.on;
///         Ok(Step::Hold(1.0))
///     }
/// }
/// ```
pub trait Process<C> {
    fn resume(&mut self, kernel: &mut Kernel, ctx: &mut C) -> SimResult<Step>;

    /// Short name used in log events.
    fn label(&self) -> &str {
        "process"
    }
}
