//! The `OutputWriter` trait implemented by backend writers.

use agv_fleet::{AgvActivity, BatterySummary, Shipment};

use crate::{HourlyQueueRow, OutputResult, SampleRow};

/// Sample-stream and end-of-run report writer.
///
/// Sample writes happen inside the run, where errors cannot propagate; the
/// [`OutputSink`](crate::OutputSink) stores them for
/// [`take_error`](crate::OutputSink::take_error).
pub trait OutputWriter {
    fn write_sample(&mut self, row: &SampleRow) -> OutputResult<()>;

    fn write_hourly(&mut self, row: &HourlyQueueRow) -> OutputResult<()>;

    fn write_agv_activity(&mut self, rows: &[AgvActivity]) -> OutputResult<()>;

    fn write_shipments(&mut self, rows: &[Shipment]) -> OutputResult<()>;

    fn write_batteries(&mut self, rows: &[BatterySummary]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
