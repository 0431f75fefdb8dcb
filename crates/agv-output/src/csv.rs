//! CSV output backend.
//!
//! Creates five files in the configured output directory:
//! - `samples.csv`
//! - `hourly_queues.csv`
//! - `agv_activity.csv`
//! - `shipments.csv`
//! - `batteries.csv`

use std::fs::File;
use std::path::Path;

use agv_core::SECS_PER_HOUR;
use agv_fleet::{AgvActivity, BatterySummary, Shipment, ShipmentStatus};
use csv::Writer;

use crate::writer::OutputWriter;
use crate::{HourlyQueueRow, OutputResult, SampleRow};

/// Empty cell for `None`.
fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Writes simulation output to five CSV files.
pub struct CsvWriter {
    samples:   Writer<File>,
    hourly:    Writer<File>,
    agvs:      Writer<File>,
    shipments: Writer<File>,
    batteries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the output directory if needed, open the files, and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut samples = Writer::from_path(dir.join("samples.csv"))?;
        samples.write_record(["time_secs", "metric", "subject", "value"])?;

        let mut hourly = Writer::from_path(dir.join("hourly_queues.csv"))?;
        hourly.write_record(["hour", "battery", "container", "swapping", "charging", "idle_agv"])?;

        let mut agvs = Writer::from_path(dir.join("agv_activity.csv"))?;
        agvs.write_record([
            "agv", "idle_h", "running_h", "swapping_h", "total_h",
            "idle_pct", "running_pct", "swapping_pct", "distance_km", "swaps", "containers",
        ])?;

        let mut shipments = Writer::from_path(dir.join("shipments.csv"))?;
        shipments.write_record([
            "shipment", "size", "arrival_secs", "unloading_done_secs", "deadline_minutes",
            "deadline_secs", "completion_secs", "delivery_h", "status", "on_time", "containers_delivered",
        ])?;

        let mut batteries = Writer::from_path(dir.join("batteries.csv"))?;
        batteries.write_record([
            "battery", "soh", "capacity_kwh", "energy_kwh", "charge_cycles",
            "usage_count", "energy_delivered_kwh", "cycles_in_range",
        ])?;

        Ok(Self {
            samples,
            hourly,
            agvs,
            shipments,
            batteries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_sample(&mut self, row: &SampleRow) -> OutputResult<()> {
        self.samples.write_record(&[
            row.time_secs.to_string(),
            row.metric.to_owned(),
            opt(row.subject),
            row.value.to_string(),
        ])?;
        Ok(())
    }

    fn write_hourly(&mut self, row: &HourlyQueueRow) -> OutputResult<()> {
        self.hourly.write_record(&[
            row.hour.to_string(),
            row.battery.to_string(),
            row.container.to_string(),
            row.swapping.to_string(),
            row.charging.to_string(),
            row.idle_agv.to_string(),
        ])?;
        Ok(())
    }

    fn write_agv_activity(&mut self, rows: &[AgvActivity]) -> OutputResult<()> {
        for a in rows {
            self.agvs.write_record(&[
                a.agv.0.to_string(),
                format!("{:.3}", a.idle_secs / SECS_PER_HOUR),
                format!("{:.3}", a.running_secs / SECS_PER_HOUR),
                format!("{:.3}", a.swapping_secs / SECS_PER_HOUR),
                format!("{:.3}", a.total_secs() / SECS_PER_HOUR),
                format!("{:.2}", a.idle_pct()),
                format!("{:.2}", a.running_pct()),
                format!("{:.2}", a.swapping_pct()),
                format!("{:.3}", a.distance_m / 1000.0),
                a.swaps.to_string(),
                a.containers.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_shipments(&mut self, rows: &[Shipment]) -> OutputResult<()> {
        for s in rows {
            let status = match s.status {
                ShipmentStatus::Unloading => "unloading",
                ShipmentStatus::Active    => "active",
                ShipmentStatus::Completed => "completed",
            };
            self.shipments.write_record(&[
                s.id.0.to_string(),
                s.size.to_string(),
                s.arrival_time.secs().to_string(),
                opt(s.unloading_done.map(|t| t.secs())),
                s.deadline_minutes.to_string(),
                s.deadline_time.secs().to_string(),
                opt(s.completion_time.map(|t| t.secs())),
                opt(s.delivery_secs().map(|d| d / SECS_PER_HOUR)),
                status.to_owned(),
                opt(s.is_on_time().map(u8::from)),
                s.containers_delivered.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_batteries(&mut self, rows: &[BatterySummary]) -> OutputResult<()> {
        for b in rows {
            let cycles = b
                .cycles_in_range
                .iter()
                .map(|(label, n)| format!("{label}={n}"))
                .collect::<Vec<_>>()
                .join(";");
            self.batteries.write_record(&[
                b.battery.0.to_string(),
                format!("{:.4}", b.soh),
                format!("{:.4}", b.capacity_kwh),
                format!("{:.4}", b.energy_kwh),
                b.charge_cycles.to_string(),
                b.usage_count.to_string(),
                format!("{:.4}", b.energy_delivered_kwh),
                cycles,
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.samples.flush()?;
        self.hourly.flush()?;
        self.agvs.flush()?;
        self.shipments.flush()?;
        self.batteries.flush()?;
        Ok(())
    }
}
