//! Integration tests for agv-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use agv_core::{AgvId, BatteryId, SimTime};
    use agv_fleet::{AgvActivity, BatterySummary, ShipmentLedger};

    use crate::csv::CsvWriter;
    use crate::row::{HourlyQueueRow, SampleRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read_all(dir: &TempDir, file: &str) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        for f in ["samples.csv", "hourly_queues.csv", "agv_activity.csv", "shipments.csv", "batteries.csv"] {
            assert!(dir.path().join(f).exists(), "{f} missing");
        }
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("run").join("out");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("samples.csv").exists());
    }

    #[test]
    fn sample_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_sample(&SampleRow { time_secs: 60.0, metric: "queue.battery", subject: None, value: 3.0 })
            .unwrap();
        w.write_sample(&SampleRow { time_secs: 90.5, metric: "battery.soc", subject: Some(7), value: 42.5 })
            .unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_all(&dir, "samples.csv");
        assert_eq!(headers, ["time_secs", "metric", "subject", "value"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "queue.battery");
        assert_eq!(&rows[0][2], "");
        assert_eq!(&rows[1][0], "90.5");
        assert_eq!(&rows[1][2], "7");
        assert_eq!(&rows[1][3], "42.5");
    }

    #[test]
    fn hourly_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = HourlyQueueRow { battery: 1, container: 2, swapping: 3, charging: 4, idle_agv: 5, ..HourlyQueueRow::at(SimTime(7_300.0)) };
        w.write_hourly(&row).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_all(&dir, "hourly_queues.csv");
        let cells: Vec<&str> = rows[0].iter().collect();
        assert_eq!(cells, ["2", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn report_tables() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_agv_activity(&[AgvActivity {
            agv:           AgvId(3),
            idle_secs:     3_600.0,
            running_secs:  7_200.0,
            swapping_secs: 0.0,
            distance_m:    12_500.0,
            swaps:         2,
            containers:    9,
        }])
        .unwrap();

        let mut ledger = ShipmentLedger::new();
        let id = ledger.open(SimTime(100.0), 4, 10.0);
        ledger.mark_unloaded(id, SimTime(200.0));
        ledger.finalize(SimTime(1_000.0));
        ledger.open(SimTime(2_000.0), 1, 10.0);
        w.write_shipments(ledger.all()).unwrap();

        w.write_batteries(&[BatterySummary {
            battery:         BatteryId(0),
            soh:             99.5,
            capacity_kwh:    190.0,
            energy_kwh:      150.0,
            charge_cycles:   4,
            usage_count:     5,
            energy_delivered_kwh: 300.0,
            cycles_in_range: vec![("0-15%".into(), 1), ("15-25%".into(), 4)],
        }])
        .unwrap();
        w.finish().unwrap();

        let (_, agvs) = read_all(&dir, "agv_activity.csv");
        assert_eq!(&agvs[0][0], "3");
        assert_eq!(&agvs[0][4], "3.000");
        assert_eq!(&agvs[0][6], "66.67");
        assert_eq!(&agvs[0][8], "12.500");

        let (headers, ships) = read_all(&dir, "shipments.csv");
        assert_eq!(headers[0], "shipment");
        assert_eq!(ships.len(), 2);
        assert_eq!(&ships[0][0], "0");
        assert_eq!(&ships[0][8], "completed");
        assert_eq!(&ships[0][9], "0");
        assert_eq!(&ships[1][6], "");
        assert_eq!(&ships[1][8], "unloading");

        let (_, packs) = read_all(&dir, "batteries.csv");
        assert_eq!(&packs[0][7], "0-15%=1;15-25%=4");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod sink_tests {
    use tempfile::TempDir;

    use agv_core::{FleetConfig, ScriptedShipment, SimTime, SECS_PER_HOUR};
    use agv_fleet::{FleetBuilder, FleetReport, Metric, MetricsSink, QueueKind};
    use agv_kernel::NoopObserver;

    use crate::{CsvWriter, OutputSink, OutputWriter};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn count_rows(dir: &TempDir, file: &str) -> usize {
        csv::Reader::from_path(dir.path().join(file)).unwrap().records().count()
    }

    fn emit_queues(sink: &mut impl MetricsSink, t: f64) {
        for kind in QueueKind::ALL {
            sink.record(SimTime(t), Metric::QueueLength(kind), 1.0);
        }
    }

    #[test]
    fn hourly_row_once_per_hour() {
        let dir = tmp();
        let mut sink = OutputSink::new(CsvWriter::new(dir.path()).unwrap());
        let mut t = 0.0;
        while t < 3.0 * SECS_PER_HOUR {
            emit_queues(&mut sink, t);
            t += 60.0;
        }
        let mut w = sink.into_writer();
        w.finish().unwrap();
        assert_eq!(count_rows(&dir, "hourly_queues.csv"), 3);
        assert_eq!(count_rows(&dir, "samples.csv"), 3 * 60 * 5);
    }

    #[test]
    fn partial_snapshot_is_not_written() {
        let dir = tmp();
        let mut sink = OutputSink::new(CsvWriter::new(dir.path()).unwrap());
        sink.record(SimTime::ZERO, Metric::QueueLength(QueueKind::Battery), 4.0);
        sink.record(SimTime(1.0), Metric::QueueLength(QueueKind::Container), 4.0);
        let mut w = sink.into_writer();
        w.finish().unwrap();
        assert_eq!(count_rows(&dir, "hourly_queues.csv"), 0);
    }

    #[test]
    fn full_run_writes_every_table() {
        let dir = tmp();
        let mut cfg = FleetConfig::default();
        cfg.run.horizon_secs = 2.0 * SECS_PER_HOUR;
        cfg.fleet.num_agvs = 2;
        cfg.fleet.num_batteries = 3;
        cfg.workload.script = vec![ScriptedShipment { arrival_secs: 0.0, size: 12, deadline_minutes: 90.0 }];

        let sink = OutputSink::new(CsvWriter::new(dir.path()).unwrap());
        let mut sim = FleetBuilder::new(cfg).sink(sink).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        let report = FleetReport::from_sim(&sim);
        let mut sink = sim.into_context().sink;
        sink.write_report(&report).unwrap();
        assert!(sink.take_error().is_none());

        assert_eq!(count_rows(&dir, "agv_activity.csv"), 2);
        assert_eq!(count_rows(&dir, "batteries.csv"), 3);
        assert_eq!(count_rows(&dir, "shipments.csv"), 1);
        assert_eq!(count_rows(&dir, "hourly_queues.csv"), 2);
        assert!(count_rows(&dir, "samples.csv") > 0);
    }
}
