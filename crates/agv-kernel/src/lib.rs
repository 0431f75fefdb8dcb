//! `agv-kernel` — cooperative discrete-event scheduler.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`wake_queue`] | `WakeQueue` (`BTreeMap<SimTime, VecDeque<ProcessId>>`)    |
//! | [`process`]    | `Process<C>` trait, `Step`, `ProcessState`                |
//! | [`scheduler`]  | `Scheduler<C>` (owns processes + context), `Kernel` handle |
//! | [`observer`]   | `SimObserver` trait, `NoopObserver`, `EventTrace`         |
//!
//! # Execution model
//!
//! ```text
//! loop:
//!   ① pick the earliest (due, seq) entry from the WakeQueue
//!   ② stop if due >= horizon
//!   ③ advance the clock to due
//!   ④ resume that process; it runs uninterrupted until it returns a Step:
//!        Hold(d)   → wake again at now + d
//!        Passivate → sleep until some other process calls Kernel::activate
//!        Finish    → never runs again
//! ```
//!
//! A process that calls [`Kernel::activate`] on another process cancels that
//! process' pending hold (if any) and schedules it at the current instant,
//! behind everything already due now.  Same-time entries run in insertion
//! order, so a run is a pure function of its inputs.

pub mod observer;
pub mod process;
pub mod scheduler;
pub mod wake_queue;


pub use observer::{EventTrace, NoopObserver, SimObserver};
pub use process::{Process, ProcessState, Step};
pub use scheduler::{Kernel, Scheduler};
pub use wake_queue::WakeQueue;
