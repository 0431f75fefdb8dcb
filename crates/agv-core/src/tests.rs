//! Unit tests for agv-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgvId, BatteryId, ProcessId};

    #[test]
    fn index_roundtrip() {
        let id = AgvId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgvId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(BatteryId(0) < BatteryId(1));
        assert!(ProcessId(100) > ProcessId(99));
    }

    #[test]
    fn display() {
        assert_eq!(AgvId(7).to_string(), "AgvId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn zero_distance() {
        let p = Point::new(340.0, 590.0);
        assert_eq!(p.distance_to(p), 0.0);
    }

    #[test]
    fn pythagorean_distance() {
        let a = Point::ORIGIN;
        let b = Point::new(300.0, 400.0);
        assert!((a.distance_to(b) - 500.0).abs() < 1e-9);
        assert_eq!(a.distance_to(b), b.distance_to(a));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimError, SimTime};

    #[test]
    fn simtime_total_order() {
        assert!(SimTime(1.0) < SimTime(2.5));
        assert_eq!(SimTime(3.0), SimTime(3.0));
        assert_eq!(SimTime(10.0) + 5.5, SimTime(15.5));
        assert_eq!(SimTime(15.0) - SimTime(10.0), 5.0);
    }

    #[test]
    fn since_never_negative() {
        assert_eq!(SimTime(5.0).since(SimTime(8.0)), 0.0);
        assert_eq!(SimTime(8.0).since(SimTime(5.0)), 3.0);
    }

    #[test]
    fn clock_only_moves_forward() {
        let mut clock = SimClock::new();
        clock.advance_to(SimTime(10.0)).unwrap();
        clock.advance_to(SimTime(10.0)).unwrap();
        assert_eq!(clock.now(), SimTime(10.0));
        let err = clock.advance_to(SimTime(9.0)).unwrap_err();
        assert!(matches!(err, SimError::TimeRegression { .. }));
        assert_eq!(clock.now(), SimTime(10.0));
    }

    #[test]
    fn clock_dhm() {
        let mut clock = SimClock::new();
        clock.advance_to(SimTime(25.0 * 3600.0 + 120.0)).unwrap();
        assert_eq!(clock.elapsed_dhm(), (1, 1, 2));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn uniform_in_bounds_and_degenerate() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.uniform(300.0, 1300.0);
            assert!((300.0..=1300.0).contains(&v));
        }
        assert_eq!(rng.uniform(500.0, 500.0), 500.0);
    }

    #[test]
    fn gamma_mean_is_shape_times_scale() {
        let mut rng = SimRng::new(7);
        let n = 20_000;
        let mean = (0..n).map(|_| rng.gamma(3.0, 1.0 / 3.0).unwrap()).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.05, "got {mean}");
    }

    #[test]
    fn bad_distribution_parameters_are_config_errors() {
        let mut rng = SimRng::new(0);
        assert!(rng.gamma(0.0, 1.0).is_err());
        assert!(rng.normal(0.0, -1.0).is_err());
        assert_eq!(rng.normal(120.0, 0.0).unwrap(), 120.0);
    }

    #[test]
    fn choose_from_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [f64; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[4.0]), Some(&4.0));
    }
}

#[cfg(test)]
mod config {
    use crate::{DeadlinePolicy, DegradationBucket, EnergyPolicy, FleetConfig};

    #[test]
    fn defaults_are_valid() {
        FleetConfig::default().validate().unwrap();
        FleetConfig::direct_charging().validate().unwrap();
    }

    #[test]
    fn direct_charging_preset() {
        let cfg = FleetConfig::direct_charging();
        assert_eq!(cfg.fleet.energy_policy, EnergyPolicy::DirectCharging);
        assert_eq!(cfg.fleet.num_batteries, cfg.fleet.num_agvs);
        assert_eq!(cfg.effective_swap_secs(), 0.0);
        assert!(!cfg.counts_swaps());
        assert_eq!(FleetConfig::swapping().effective_swap_secs(), 180.0);
    }

    #[test]
    fn default_pickup_line_has_thirteen_points() {
        let cfg = FleetConfig::default();
        assert_eq!(cfg.yard.pickup_offsets.len(), 13);
        assert_eq!(cfg.yard.pickup_offsets[0], 290.0);
        assert_eq!(cfg.yard.pickup_offsets[12], 1490.0);
    }

    #[test]
    fn inverted_soc_window_rejected() {
        let mut cfg = FleetConfig::default();
        cfg.battery.soc_min = 80.0;
        cfg.battery.soc_max = 20.0;
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("soc_min"), "{msg}");
    }

    #[test]
    fn overlapping_buckets_rejected() {
        let mut cfg = FleetConfig::default();
        cfg.battery.degradation = vec![
            DegradationBucket::new(0.0, 50.0, 0.1),
            DegradationBucket::new(40.0, 100.0, 0.1),
        ];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn all_problems_reported_together() {
        let mut cfg = FleetConfig::default();
        cfg.agv.speed_mps = 0.0;
        cfg.yard.pickup_offsets.clear();
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("agv.speed_mps"), "{msg}");
        assert!(msg.contains("pickup_offsets"), "{msg}");
    }

    #[test]
    fn non_finite_yard_rejected() {
        let mut cfg = FleetConfig::default();
        cfg.yard.delivery_max.x = f64::INFINITY;
        cfg.yard.delivery_min.y = f64::NAN;
        cfg.yard.pickup_x = f64::NEG_INFINITY;
        cfg.yard.pickup_offsets.push(f64::NAN);
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("yard.delivery_max.x"), "{msg}");
        assert!(msg.contains("yard.delivery_min.y"), "{msg}");
        assert!(msg.contains("yard.pickup_x"), "{msg}");
        assert!(msg.contains("pickup_offsets must all be finite"), "{msg}");
    }

    #[test]
    fn deadline_scales_with_size_and_clamps() {
        let policy = DeadlinePolicy::default();
        // Reference-sized shipment keeps its base deadline.
        assert!((policy.scaled_minutes(3000.0, 7064) - 3000.0).abs() < 1e-9);
        // Half the reference size halves the deadline.
        assert!((policy.scaled_minutes(3000.0, 3532) - 1500.0).abs() < 1e-9);
        // Tiny shipments hit the floor, huge base draws hit the base cap first.
        assert_eq!(policy.scaled_minutes(3000.0, 1), 100.0);
        assert!((policy.scaled_minutes(99_999.0, 7064) - 7000.0).abs() < 1e-9);
    }

    #[test]
    fn workload_gamma_scales() {
        let cfg = FleetConfig::default();
        assert!((cfg.workload.size_scale() - 883.125).abs() < 1e-9);
        assert!((cfg.workload.interarrival_scale_days() - 1.0 / 3.0).abs() < 1e-12);
    }
}
