//! Framework error type.
//!
//! Every error here is an internal invariant violation or a configuration
//! problem.  Invariant violations are fatal: the scheduler stops the run as
//! soon as a process returns one.

use thiserror::Error;

use crate::{AgvId, BatteryId, ProcessId, SimTime};

/// The top-level error type shared by the kernel and fleet crates.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("pop from empty {queue} queue")]
    QueueUnderflow { queue: &'static str },

    #[error("{battery} is held by {holder} but was claimed by {claimant}")]
    DoubleOwnership {
        battery:  BatteryId,
        holder:   AgvId,
        claimant: AgvId,
    },

    #[error("{agv} already holds {battery}")]
    AgvAlreadyHasBattery { agv: AgvId, battery: BatteryId },

    #[error("{agv} and {battery} disagree about who holds the pack")]
    OwnershipMismatch { agv: AgvId, battery: BatteryId },

    #[error("{battery} out of bounds: energy {energy} kWh, capacity {capacity} kWh")]
    BatteryOutOfBounds { battery: BatteryId, energy: f64, capacity: f64 },

    #[error("{0} does not hold a battery")]
    AgvWithoutBattery(AgvId),

    #[error("process {0} not found")]
    UnknownProcess(ProcessId),

    #[error("{process} asked to hold for {duration}s")]
    InvalidHold { process: ProcessId, duration: f64 },

    #[error("clock cannot move backward from {now} to {requested}")]
    TimeRegression { now: SimTime, requested: SimTime },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `agv-*` crates.
pub type SimResult<T> = Result<T, SimError>;
