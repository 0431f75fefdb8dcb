//! `OutputSink<W>`: bridges `MetricsSink` to an `OutputWriter`.

use agv_core::{SimTime, SECS_PER_HOUR};
use agv_fleet::{FleetReport, Metric, MetricsSink, QueueKind, Sample};

use crate::row::{HourlyQueueRow, SampleRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`MetricsSink`] that streams every sample to an [`OutputWriter`] and
/// derives the hourly queue snapshot from the queue-length samples.
///
/// Errors from the writer are stored internally because `MetricsSink::record`
/// has no return value.  After the run, check for errors with
/// [`take_error`][Self::take_error].
pub struct OutputSink<W: OutputWriter> {
    writer:     W,
    /// Queue lengths seen so far at `snap_time`, in `QueueKind::ALL` order.
    snapshot:   [Option<u64>; 5],
    snap_time:  SimTime,
    next_hour:  SimTime,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            snapshot:   [None; 5],
            snap_time:  SimTime::ZERO,
            next_hour:  SimTime::ZERO,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write the end-of-run tables and flush everything.
    pub fn write_report(&mut self, report: &FleetReport) -> OutputResult<()> {
        self.writer.write_agv_activity(&report.agvs)?;
        self.writer.write_shipments(&report.shipments)?;
        self.writer.write_batteries(&report.batteries)?;
        self.writer.finish()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    /// Collect one queue length; once all five for an instant are in and an
    /// hour boundary has been crossed, emit the hourly row.
    fn track_queue(&mut self, time: SimTime, kind: QueueKind, len: u64) {
        if time != self.snap_time {
            self.snapshot = [None; 5];
            self.snap_time = time;
        }
        if let Some(slot) = QueueKind::ALL.iter().position(|&k| k == kind) {
            self.snapshot[slot] = Some(len);
        }
        let [Some(battery), Some(container), Some(swapping), Some(charging), Some(idle_agv)] = self.snapshot
        else {
            return;
        };
        if time < self.next_hour {
            return;
        }
        while self.next_hour <= time {
            self.next_hour = self.next_hour + SECS_PER_HOUR;
        }
        let row = HourlyQueueRow { battery, container, swapping, charging, idle_agv, ..HourlyQueueRow::at(time) };
        let result = self.writer.write_hourly(&row);
        self.store_err(result);
    }
}

impl<W: OutputWriter> MetricsSink for OutputSink<W> {
    fn record(&mut self, time: SimTime, metric: Metric, value: f64) {
        let row = SampleRow::from(&Sample { time, metric, value });
        let result = self.writer.write_sample(&row);
        self.store_err(result);
        if let Metric::QueueLength(kind) = metric {
            self.track_queue(time, kind, value as u64);
        }
    }
}
