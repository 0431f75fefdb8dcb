//! The `Scheduler` and the `Kernel` handle processes use to talk to it.

use agv_core::{ProcessId, SimClock, SimError, SimResult, SimTime};
use tracing::{debug, error, info, warn};

use crate::{Process, ProcessState, SimObserver, Step, WakeQueue};

// ── Kernel ────────────────────────────────────────────────────────────────────

/// The part of the scheduler visible to a running process: the clock, the
/// wake queue, and the lifecycle state of every process.
///
/// Split from [`Scheduler`] so a process can hold `&mut Kernel` and
/// `&mut C` (the shared context) at the same time.
#[derive(Default)]
pub struct Kernel {
    clock:   SimClock,
    queue:   WakeQueue,
    states:  Vec<ProcessState>,
    current: Option<ProcessId>,
    events:  u64,
}

impl Kernel {
    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// The process whose step is executing, if any.
    #[inline]
    pub fn current(&self) -> Option<ProcessId> {
        self.current
    }

    /// Read-only view of the pending-event set.
    pub fn queue(&self) -> &WakeQueue {
        &self.queue
    }

    /// Number of events dispatched so far.
    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn state(&self, process: ProcessId) -> Option<ProcessState> {
        self.states.get(process.index()).copied()
    }

    /// Reactivate `process` at the current instant.
    ///
    /// A pending hold is cancelled; a passive process is woken.  The process
    /// runs after everything already due now.  Activating the running
    /// process is a no-op, and activating a finished one is ignored with a
    /// warning.
    pub fn activate(&mut self, process: ProcessId) -> SimResult<()> {
        let now = self.now();
        let state = self
            .states
            .get_mut(process.index())
            .ok_or(SimError::UnknownProcess(process))?;
        match *state {
            ProcessState::Running => {}
            ProcessState::Finished => {
                warn!(%process, "activation of finished process ignored");
            }
            ProcessState::Scheduled(_) | ProcessState::Passive => {
                *state = ProcessState::Scheduled(now);
                self.queue.push(now, process);
            }
        }
        Ok(())
    }

    fn register(&mut self, state: ProcessState) -> ProcessId {
        let id = ProcessId(self.states.len() as u32);
        self.states.push(state);
        if let ProcessState::Scheduled(at) = state {
            self.queue.push(at, id);
        }
        id
    }

    fn suspend(&mut self, process: ProcessId, step: Step) -> SimResult<()> {
        let state = match step {
            Step::Hold(duration) => {
                if !duration.is_finite() {
                    return Err(SimError::InvalidHold { process, duration });
                }
                let at = self.now() + duration.max(0.0);
                self.queue.push(at, process);
                ProcessState::Scheduled(at)
            }
            Step::Passivate => ProcessState::Passive,
            Step::Finish => ProcessState::Finished,
        };
        self.states[process.index()] = state;
        Ok(())
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Owns every process, the kernel, and the shared context `C`.
///
/// Build it, [`spawn`](Self::spawn) the processes, then [`run`](Self::run).
/// The run ends when the next event would be due at or after the horizon;
/// the clock is then moved to the horizon.
pub struct Scheduler<C> {
    kernel:    Kernel,
    processes: Vec<Option<Box<dyn Process<C>>>>,
    context:   C,
    horizon:   SimTime,
}

impl<C> Scheduler<C> {
    pub fn new(context: C, horizon: SimTime) -> Self {
        Self {
            kernel: Kernel::default(),
            processes: Vec::new(),
            context,
            horizon,
        }
    }

    /// Register `process` and schedule its first step at the current time.
    pub fn spawn<P: Process<C> + 'static>(&mut self, process: P) -> ProcessId {
        let now = self.kernel.now();
        self.insert(Box::new(process), ProcessState::Scheduled(now))
    }

    /// Register `process` without scheduling it; it first runs when activated.
    pub fn spawn_passive<P: Process<C> + 'static>(&mut self, process: P) -> ProcessId {
        self.insert(Box::new(process), ProcessState::Passive)
    }

    fn insert(&mut self, process: Box<dyn Process<C>>, state: ProcessState) -> ProcessId {
        let id = self.kernel.register(state);
        self.processes.push(Some(process));
        id
    }

    pub fn now(&self) -> SimTime {
        self.kernel.now()
    }

    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Mutable access for setup code outside of a run (e.g. initial activations).
    pub fn kernel_mut(&mut self) -> &mut Kernel {
        &mut self.kernel
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Give up the scheduler and keep the context (results live there).
    pub fn into_context(self) -> C {
        self.context
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run until the horizon.  Calls `observer` after every event and once
    /// at the end.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(horizon = self.horizon.secs(), processes = self.processes.len(), "run started");
        self.run_until(self.horizon, observer)?;
        info!(
            final_time = self.kernel.now().secs(),
            events = self.kernel.events,
            pending = self.kernel.queue.len(),
            "run finished"
        );
        observer.on_sim_end(self.kernel.now(), self.kernel.events);
        Ok(())
    }

    /// Execute every event due strictly before `until` (capped at the
    /// horizon), then move the clock to that instant.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_until<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) -> SimResult<()> {
        let until = until.min(self.horizon);
        while let Some(due) = self.kernel.queue.next_time() {
            if due >= until {
                break;
            }
            self.step(observer)?;
        }
        if until > self.kernel.now() {
            self.kernel.clock.advance_to(until)?;
        }
        Ok(())
    }

    /// Dispatch exactly one event regardless of the horizon.
    /// Returns `false` if nothing was pending.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        let Some((due, process)) = self.kernel.queue.pop_next() else {
            return Ok(false);
        };
        self.kernel.clock.advance_to(due)?;
        self.dispatch(process)?;
        self.kernel.events += 1;
        observer.on_event(due, process);
        Ok(true)
    }

    fn dispatch(&mut self, id: ProcessId) -> SimResult<()> {
        let mut process = self
            .processes
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(SimError::UnknownProcess(id))?;

        self.kernel.states[id.index()] = ProcessState::Running;
        self.kernel.current = Some(id);
        let result = process.resume(&mut self.kernel, &mut self.context);
        self.kernel.current = None;

        let outcome = result.and_then(|step| {
            debug!(process = %id, label = process.label(), ?step, now = self.kernel.now().secs(), "suspended");
            self.kernel.suspend(id, step)
        });
        self.processes[id.index()] = Some(process);

        if let Err(e) = &outcome {
            self.kernel.states[id.index()] = ProcessState::Finished;
            error!(process = %id, now = self.kernel.now().secs(), error = %e, "fatal invariant violation");
        }
        outcome
    }
}
