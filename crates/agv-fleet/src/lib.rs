//! `agv-fleet` — the port fleet model built on `agv-kernel`.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                         |
//! |---------------|------------------------------------------------------------------|
//! | [`queues`]    | `FifoQueue<T>`, `ResourceQueues` (the five waiting lists)        |
//! | [`battery`]   | `Battery` state + degradation, `BatteryProcess`                  |
//! | [`agv`]       | `Agv` state + activity accounting, `AgvProcess`                  |
//! | [`shipment`]  | `Container`, `Shipment`, `ShipmentLedger`                        |
//! | [`generator`] | `ShipmentGenerator` (stochastic or scripted vessel calls)        |
//! | [`dispatch`]  | `SwapperStation`, `ChargingStation`, `AgvActivator`, `ShipmentTracker`, `QueueSampler` |
//! | [`metrics`]   | `MetricsSink` trait, `Metric`, `NullSink`, `MetricsRecorder`     |
//! | [`context`]   | `FleetContext<M>`: everything processes share                    |
//! | [`builder`]   | `FleetBuilder`: config → ready-to-run `Scheduler`                |
//! | [`report`]    | `FleetReport`: end-of-run summary                                |
//!
//! # Resource flow
//!
//! ```text
//!  generator ──▶ containers ──▶ AGV ──(low SOC)──▶ charging ──▶ Battery ──▶ batteries
//!                   ▲            │  ▲                              (charger)      │
//!                   │            ▼  └──── swapping ◀── swapper ◀──────────────────┘
//!               activator ◀── idle_agvs
//! ```
//!
//! Every process sees the same [`FleetContext`]; ownership of a battery moves
//! between an AGV and a queue inside a single process step.

pub mod agv;
pub mod battery;
pub mod builder;
pub mod context;
pub mod dispatch;
pub mod generator;
pub mod metrics;
pub mod queues;
pub mod report;
pub mod shipment;


pub use agv::{Activity, Agv, AgvProcess};
pub use battery::{Battery, BatteryProcess};
pub use builder::{FleetBuilder, FleetSim};
pub use context::FleetContext;
pub use dispatch::{AgvActivator, ChargingStation, QueueSampler, ShipmentTracker, SwapperStation};
pub use generator::ShipmentGenerator;
pub use metrics::{Metric, MetricsRecorder, MetricsSink, NullSink, Sample};
pub use queues::{FifoQueue, QueueKind, ResourceQueues};
pub use report::{AgvActivity, BatterySummary, FleetReport, ShipmentStats};
pub use shipment::{Container, Shipment, ShipmentLedger, ShipmentStatus};
