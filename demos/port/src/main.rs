//! port: battery-swapping AGV fleet at a container terminal.
//!
//! Loads a TOML scenario (or the built-in reference terminal), runs the
//! discrete-event model to the horizon and prints a fleet summary.  With
//! `--out DIR` every metric sample, an hourly queue table and the end-of-run
//! tables are written as CSV.
//!
//! ```text
//! cargo run --release -p port -- --scenario demos/port/scenarios/baseline.toml --out out/
//! RUST_LOG=debug cargo run -p port -- --days 1
//! ```

mod cli;

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use agv_core::{EnergyPolicy, FleetConfig, SECS_PER_DAY, SECS_PER_HOUR};
use agv_fleet::{FleetBuilder, FleetReport, FleetSim, MetricsSink, NullSink};
use agv_kernel::NoopObserver;
use agv_output::{CsvWriter, OutputSink};

use cli::CliOptions;

// ── Config ────────────────────────────────────────────────────────────────────

fn load_config(opts: &CliOptions) -> Result<FleetConfig> {
    let mut config = match &opts.scenario {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path.display()))?;
            toml::from_str::<FleetConfig>(&text)
                .with_context(|| format!("parsing scenario {}", path.display()))?
        }
        None => match opts.policy {
            Some(EnergyPolicy::DirectCharging) => FleetConfig::direct_charging(),
            _ => FleetConfig::swapping(),
        },
    };

    // A scenario file wins over the preset; an explicit policy flag on top of
    // a scenario only flips the policy.
    if let (Some(_), Some(policy)) = (&opts.scenario, opts.policy) {
        config.fleet.energy_policy = policy;
    }
    if let Some(seed) = opts.seed {
        config.run.seed = seed;
    }
    if let Some(days) = opts.days {
        config.run.horizon_secs = days * SECS_PER_DAY;
    }

    config.validate()?;
    Ok(config)
}

// ── Run ───────────────────────────────────────────────────────────────────────

fn run<M: MetricsSink>(sim: &mut FleetSim<M>) -> Result<FleetReport> {
    let started = Instant::now();
    sim.run(&mut NoopObserver)?;
    let elapsed = started.elapsed();

    let events = sim.kernel().events();
    info!(events, elapsed_ms = elapsed.as_millis() as u64, "run complete");
    println!(
        "Simulated {:.1} days in {:.2?} ({events} events)",
        sim.now().secs() / SECS_PER_DAY,
        elapsed
    );
    Ok(FleetReport::from_sim(sim))
}

fn run_with_csv(config: FleetConfig, dir: &Path) -> Result<FleetReport> {
    let writer = CsvWriter::new(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let mut sim = FleetBuilder::new(config).sink(OutputSink::new(writer)).build()?;
    let report = run(&mut sim)?;

    let sink = &mut sim.context_mut().sink;
    if let Some(e) = sink.take_error() {
        bail!("output error during run: {e}");
    }
    sink.write_report(&report)?;
    println!("CSV output written to {}", dir.display());
    Ok(report)
}

// ── Summary ───────────────────────────────────────────────────────────────────

fn print_summary(config: &FleetConfig, report: &FleetReport) {
    let (idle, running, swapping) = report.mean_activity();
    let total = idle + running + swapping;
    let pct = |secs: f64| if total > 0.0 { secs / total * 100.0 } else { 0.0 };
    let stats = &report.stats;

    println!();
    println!("── Fleet ──────────────────────────────────────");
    println!("  AGVs: {}  |  Packs: {}  |  Policy: {:?}",
        config.fleet.num_agvs, config.fleet.num_batteries, config.fleet.energy_policy);
    println!(
        "  Mean time split: idle {:.1} %  running {:.1} %  swapping {:.1} %",
        pct(idle),
        pct(running),
        pct(swapping)
    );
    println!("  Swaps: {}  |  Containers moved: {}", report.total_swaps(), report.total_containers());
    if let Some(soh) = report.mean_soh() {
        println!("  Mean pack SOH: {soh:.2} %");
    }

    println!("── Shipments ──────────────────────────────────");
    println!("  Arrived: {}  |  Completed: {}  |  In progress: {}",
        stats.total, stats.completed, stats.active);
    match stats.on_time_pct() {
        Some(pct) => println!("  On time: {} ({pct:.1} %)  |  Overdue: {}", stats.on_time, stats.overdue),
        None => println!("  No shipment completed"),
    }
    if let Some(secs) = stats.mean_overdue_secs {
        println!("  Mean overdue: {:.2} h", secs / SECS_PER_HOUR);
    }
    println!("  Containers received: {}  delivered: {}  waiting: {}",
        stats.containers_received, stats.containers_delivered, stats.containers_waiting);
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())))
        .with(fmt::layer())
        .init();

    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("error: {msg}");
            cli::print_usage();
            std::process::exit(2);
        }
    };

    let config = load_config(&opts)?;
    println!("=== port — AGV fleet simulation ===");
    println!(
        "Seed: {}  |  Horizon: {:.1} days",
        config.run.seed,
        config.run.horizon_secs / SECS_PER_DAY
    );

    let report = match &opts.out {
        Some(dir) => run_with_csv(config.clone(), dir)?,
        None => {
            let mut sim = FleetBuilder::new(config.clone()).sink(NullSink).build()?;
            run(&mut sim)?
        }
    };

    print_summary(&config, &report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> FleetConfig {
        let config: FleetConfig = toml::from_str(text).unwrap();
        config.validate().unwrap();
        config
    }

    #[test]
    fn baseline_scenario_matches_defaults() {
        let config = parse(include_str!("../scenarios/baseline.toml"));
        let defaults = FleetConfig::swapping();
        assert_eq!(config.fleet, defaults.fleet);
        assert_eq!(config.battery, defaults.battery);
        assert_eq!(config.workload, defaults.workload);
        assert_eq!(config.dispatch, defaults.dispatch);
        assert!((config.agv.speed_mps - defaults.agv.speed_mps).abs() < 1e-9);
    }

    #[test]
    fn direct_charging_scenario() {
        let config = parse(include_str!("../scenarios/direct_charging.toml"));
        assert_eq!(config.fleet.energy_policy, EnergyPolicy::DirectCharging);
        assert_eq!(config.effective_swap_secs(), 0.0);
        assert_eq!(config.battery.capacity_kwh, 191.0);
    }

    #[test]
    fn scripted_scenario() {
        let config = parse(include_str!("../scenarios/two_vessels.toml"));
        assert_eq!(config.workload.script.len(), 2);
        assert_eq!(config.workload.script[1].size, 360);
    }

    #[test]
    fn overrides_apply_after_loading() {
        let opts = CliOptions {
            scenario: None,
            policy:   Some(EnergyPolicy::DirectCharging),
            seed:     Some(9),
            days:     Some(2.0),
            out:      None,
        };
        let config = load_config(&opts).unwrap();
        assert_eq!(config.run.seed, 9);
        assert_eq!(config.run.horizon_secs, 2.0 * SECS_PER_DAY);
        assert_eq!(config.fleet.num_batteries, config.fleet.num_agvs);
    }
}
