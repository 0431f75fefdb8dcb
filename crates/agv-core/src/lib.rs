//! `agv-core` — foundational types for the port AGV fleet simulator.
//!
//! This crate is a dependency of every other `agv-*` crate.  It has no
//! `agv-*` dependencies and only a handful of external ones (`rand`,
//! `rand_distr`, `thiserror`, `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgvId`, `BatteryId`, `ContainerId`, `ShipmentId`, `ProcessId` |
//! | [`geo`]         | `Point` (yard coordinates in metres), Euclidean distance   |
//! | [`time`]        | `SimTime`, `SimClock`, duration constants                  |
//! | [`rng`]         | `SimRng` (single seeded stream for the whole run)          |
//! | [`config`]      | `FleetConfig` and its sections                             |
//! | [`error`]       | `SimError`, `SimResult`                                    |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AgvConfig, BatteryConfig, CraneConfig, DeadlinePolicy, DegradationBucket, DispatchConfig,
    EnergyPolicy, FleetConfig, FleetSizing, RunConfig, ScriptedShipment, WorkloadConfig,
    YardLayout,
};
pub use error::{SimError, SimResult};
pub use geo::Point;
pub use ids::{AgvId, BatteryId, ContainerId, ProcessId, ShipmentId};
pub use rng::SimRng;
pub use time::{SimClock, SimTime, SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE};
