//! `agv-output` — simulation output for the port AGV fleet simulator.
//!
//! [`CsvWriter`] creates five files in the output directory:
//!
//! | File                | One row per                                        |
//! |---------------------|----------------------------------------------------|
//! | `samples.csv`       | metric sample (`time_secs, metric, subject, value`) |
//! | `hourly_queues.csv` | hour, with all five queue lengths                  |
//! | `agv_activity.csv`  | AGV, from the end-of-run report                    |
//! | `shipments.csv`     | shipment, from the end-of-run report               |
//! | `batteries.csv`     | battery pack, from the end-of-run report           |
//!
//! Writers implement [`OutputWriter`] and are driven by [`OutputSink`], which
//! implements `agv_fleet::MetricsSink`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use agv_output::{CsvWriter, OutputSink};
//!
//! let sink = OutputSink::new(CsvWriter::new(Path::new("./output"))?);
//! let mut sim = FleetBuilder::new(config).sink(sink).build()?;
//! sim.run(&mut NoopObserver)?;
//! let report = FleetReport::from_sim(&sim);
//! let mut sink = sim.into_context().sink;
//! sink.write_report(&report)?;
//! sink.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod sink;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{HourlyQueueRow, SampleRow};
pub use sink::OutputSink;
pub use writer::OutputWriter;
