//! Static run configuration.
//!
//! `FleetConfig` is loaded once (usually from a TOML scenario file by the
//! application crate) and treated as immutable for the whole run.  Every
//! section derives `Deserialize` with `#[serde(default)]`, so a scenario file
//! only needs to name the values it changes.
//!
//! The defaults describe the reference terminal: 84 AGVs sharing 154 swap
//! packs of 191 kWh, 300 kW chargers, a 20–80 % SOC window, and one simulated
//! year of vessel calls.

use serde::{Deserialize, Serialize};

use crate::{Point, SimError, SimResult, SECS_PER_DAY};

// ── FleetConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub run:      RunConfig,
    pub fleet:    FleetSizing,
    pub battery:  BatteryConfig,
    pub agv:      AgvConfig,
    pub yard:     YardLayout,
    pub workload: WorkloadConfig,
    pub dispatch: DispatchConfig,
}

impl FleetConfig {
    /// The reference battery-swapping terminal (same as `Default`).
    pub fn swapping() -> Self {
        Self::default()
    }

    /// Direct charging: one pack per vehicle, charged in place, full-depth
    /// 5–100 % window, no swap handling time.
    pub fn direct_charging() -> Self {
        let mut cfg = Self::default();
        cfg.fleet.energy_policy = EnergyPolicy::DirectCharging;
        cfg.fleet.num_batteries = cfg.fleet.num_agvs;
        cfg.battery.soc_min = 5.0;
        cfg.battery.soc_max = 100.0;
        cfg
    }

    /// Handling time applied after a pack is attached.
    pub fn effective_swap_secs(&self) -> f64 {
        match self.fleet.energy_policy {
            EnergyPolicy::Swapping       => self.agv.swap_secs,
            EnergyPolicy::DirectCharging => 0.0,
        }
    }

    /// Whether handing a pack to the charging queue counts as a swap.
    pub fn counts_swaps(&self) -> bool {
        self.fleet.energy_policy == EnergyPolicy::Swapping
    }

    /// Check every section and report all problems at once.
    pub fn validate(&self) -> SimResult<()> {
        let mut problems: Vec<String> = Vec::new();
        let mut positive = |name: &str, v: f64| {
            if !(v > 0.0 && v.is_finite()) {
                problems.push(format!("{name} must be positive (got {v})"));
            }
        };

        positive("run.horizon_secs", self.run.horizon_secs);
        positive("run.queue_sample_interval_secs", self.run.queue_sample_interval_secs);
        positive("battery.capacity_kwh", self.battery.capacity_kwh);
        positive("battery.charging_rate_kw", self.battery.charging_rate_kw);
        positive("agv.speed_mps", self.agv.speed_mps);
        positive("dispatch.swapper_interval_secs", self.dispatch.swapper_interval_secs);
        positive("dispatch.charger_interval_secs", self.dispatch.charger_interval_secs);
        positive("dispatch.activator_interval_secs", self.dispatch.activator_interval_secs);
        positive("dispatch.tracker_interval_secs", self.dispatch.tracker_interval_secs);
        positive("workload.mean_shipment_size", self.workload.mean_shipment_size);
        positive("workload.size_shape", self.workload.size_shape);
        positive("workload.mean_interarrival_days", self.workload.mean_interarrival_days);
        positive("workload.interarrival_shape", self.workload.interarrival_shape);
        positive("workload.deadline.reference_size", self.workload.deadline.reference_size);

        for (name, v) in [
            ("agv.energy_per_km_kwh", self.agv.energy_per_km_kwh),
            ("agv.idle_power_kw", self.agv.idle_power_kw),
            ("agv.swap_secs", self.agv.swap_secs),
            ("agv.loading_secs", self.agv.loading_secs),
            ("agv.unloading_secs", self.agv.unloading_secs),
            ("workload.crane.std_cycle_secs", self.workload.crane.std_cycle_secs),
            ("workload.deadline.base_std_minutes", self.workload.deadline.base_std_minutes),
        ] {
            if !(v >= 0.0 && v.is_finite()) {
                problems.push(format!("{name} must be non-negative (got {v})"));
            }
        }

        let b = &self.battery;
        if !(0.0..=100.0).contains(&b.soc_min) || !(0.0..=100.0).contains(&b.soc_max) {
            problems.push("battery SOC bounds must lie in [0, 100]".into());
        }
        if b.soc_min >= b.soc_max {
            problems.push(format!(
                "battery.soc_min ({}) must be below battery.soc_max ({})",
                b.soc_min, b.soc_max
            ));
        }
        if !(0.0..=100.0).contains(&b.initial_soc) {
            problems.push(format!("battery.initial_soc must lie in [0, 100] (got {})", b.initial_soc));
        }
        let mut prev_high = 0.0;
        for bucket in &b.degradation {
            if bucket.low < prev_high || bucket.low >= bucket.high || bucket.high > 100.0 {
                problems.push(format!(
                    "degradation bucket [{}, {}) must be non-empty, sorted, non-overlapping, and within [0, 100]",
                    bucket.low, bucket.high
                ));
            }
            if bucket.loss_per_1200_cycles < 0.0 {
                problems.push(format!(
                    "degradation bucket [{}, {}) has negative loss",
                    bucket.low, bucket.high
                ));
            }
            prev_high = bucket.high;
        }

        if self.fleet.batteries_start_in_agvs && self.fleet.num_batteries < self.fleet.num_agvs {
            problems.push(format!(
                "batteries_start_in_agvs needs at least one pack per AGV ({} < {})",
                self.fleet.num_batteries, self.fleet.num_agvs
            ));
        }

        let y = &self.yard;
        if y.pickup_offsets.is_empty() {
            problems.push("yard.pickup_offsets must not be empty".into());
        }
        let coords = [
            ("yard.swap_station.x", y.swap_station.x),
            ("yard.swap_station.y", y.swap_station.y),
            ("yard.pickup_x", y.pickup_x),
            ("yard.delivery_min.x", y.delivery_min.x),
            ("yard.delivery_min.y", y.delivery_min.y),
            ("yard.delivery_max.x", y.delivery_max.x),
            ("yard.delivery_max.y", y.delivery_max.y),
        ];
        for (name, v) in coords {
            if !v.is_finite() {
                problems.push(format!("{name} must be finite (got {v})"));
            }
        }
        if y.pickup_offsets.iter().any(|v| !v.is_finite()) {
            problems.push("yard.pickup_offsets must all be finite".into());
        }
        if y.delivery_min.x > y.delivery_max.x || y.delivery_min.y > y.delivery_max.y {
            problems.push("yard.delivery_min must not exceed yard.delivery_max".into());
        }

        let c = &self.workload.crane;
        if c.containers_per_cycle == 0 {
            problems.push("workload.crane.containers_per_cycle must be at least 1".into());
        }
        if c.min_cycle_secs < 0.0 || c.min_cycle_secs > c.max_cycle_secs {
            problems.push("workload.crane cycle bounds are inverted or negative".into());
        }
        let d = &self.workload.deadline;
        if d.base_min_minutes > d.base_max_minutes || d.min_minutes > d.max_minutes {
            problems.push("workload.deadline bounds are inverted".into());
        }
        for s in &self.workload.script {
            if s.size == 0 || s.arrival_secs < 0.0 {
                problems.push(format!(
                    "scripted shipment at {}s must have size >= 1 and a non-negative arrival",
                    s.arrival_secs
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SimError::Config(problems.join("; ")))
        }
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// The run stops when the clock reaches this instant.
    pub horizon_secs: f64,
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
    /// Period of the queue-length sampler.
    pub queue_sample_interval_secs: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            horizon_secs:               365.0 * SECS_PER_DAY,
            seed:                       42,
            queue_sample_interval_secs: 60.0,
        }
    }
}

/// How depleted packs get back to full.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyPolicy {
    /// Vehicles exchange packs at the swap station; packs charge off-board.
    #[default]
    Swapping,
    /// Vehicles wait for a pack to be charged; no handling time, no swap count.
    DirectCharging,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetSizing {
    pub num_agvs:      usize,
    pub num_batteries: usize,
    pub energy_policy: EnergyPolicy,
    /// Start the run with pack `i` already attached to AGV `i`.  The remaining
    /// packs start in the available queue.
    pub batteries_start_in_agvs: bool,
}

impl Default for FleetSizing {
    fn default() -> Self {
        Self {
            num_agvs:                84,
            num_batteries:           154,
            energy_policy:           EnergyPolicy::Swapping,
            batteries_start_in_agvs: false,
        }
    }
}

/// One band of the SOC axis and the fraction of initial capacity lost after
/// 1200 charge cycles that traverse it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DegradationBucket {
    pub low:  f64,
    pub high: f64,
    pub loss_per_1200_cycles: f64,
}

impl DegradationBucket {
    pub const fn new(low: f64, high: f64, loss_per_1200_cycles: f64) -> Self {
        Self { low, high, loss_per_1200_cycles }
    }

    /// Label used for per-bucket counters, e.g. `"15-25%"`.
    pub fn label(&self) -> String {
        format!("{}-{}%", self.low, self.high)
    }
}

/// Loss table for the reference LFP pack: deep cycling at either end of the
/// SOC axis costs roughly twice as much as mid-range cycling.
pub const DEFAULT_DEGRADATION: [DegradationBucket; 9] = [
    DegradationBucket::new(0.0, 15.0, 0.21),
    DegradationBucket::new(15.0, 25.0, 0.09),
    DegradationBucket::new(25.0, 35.0, 0.09),
    DegradationBucket::new(35.0, 45.0, 0.06),
    DegradationBucket::new(45.0, 55.0, 0.05),
    DegradationBucket::new(55.0, 65.0, 0.08),
    DegradationBucket::new(65.0, 75.0, 0.09),
    DegradationBucket::new(75.0, 85.0, 0.09),
    DegradationBucket::new(85.0, 100.0, 0.21),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    pub capacity_kwh:     f64,
    /// SOC of every pack at fleet initialization, percent.
    pub initial_soc:      f64,
    pub charging_rate_kw: f64,
    /// Vehicles swap when SOC drops below this, percent.
    pub soc_min:          f64,
    /// Charging stops at this ceiling, percent.
    pub soc_max:          f64,
    pub degradation:      Vec<DegradationBucket>,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh:     191.0,
            initial_soc:      100.0,
            charging_rate_kw: 300.0,
            soc_min:          20.0,
            soc_max:          80.0,
            degradation:      DEFAULT_DEGRADATION.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgvConfig {
    pub speed_mps:         f64,
    pub energy_per_km_kwh: f64,
    /// Draw while parked idle with a pack attached.
    pub idle_power_kw:     f64,
    pub swap_secs:         f64,
    pub loading_secs:      f64,
    pub unloading_secs:    f64,
}

impl Default for AgvConfig {
    fn default() -> Self {
        Self {
            speed_mps:         20.0 * 1000.0 / 3600.0,
            energy_per_km_kwh: 17.0 / 25.0,
            idle_power_kw:     9.0,
            swap_secs:         180.0,
            loading_secs:      18.0,
            unloading_secs:    18.0,
        }
    }
}

/// Terminal geometry.  Pickups happen along a quay line at `x = pickup_x`,
/// at one of a discrete set of lateral offsets; deliveries land anywhere in
/// the stacking-yard rectangle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YardLayout {
    pub swap_station:   Point,
    pub pickup_x:       f64,
    pub pickup_offsets: Vec<f64>,
    pub delivery_min:   Point,
    pub delivery_max:   Point,
}

impl Default for YardLayout {
    fn default() -> Self {
        Self {
            swap_station:   Point::ORIGIN,
            pickup_x:       340.0,
            // 290 m to 1490 m in 100 m steps.
            pickup_offsets: (0..13).map(|i| 290.0 + 100.0 * i as f64).collect(),
            delivery_min:   Point::new(300.0, 250.0),
            delivery_max:   Point::new(1300.0, 1000.0),
        }
    }
}

/// Ship-to-shore crane throughput limit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraneConfig {
    pub containers_per_cycle: u32,
    pub mean_cycle_secs:      f64,
    pub std_cycle_secs:       f64,
    pub min_cycle_secs:       f64,
    pub max_cycle_secs:       f64,
}

impl Default for CraneConfig {
    fn default() -> Self {
        Self {
            containers_per_cycle: 6,
            mean_cycle_secs:      120.0,
            std_cycle_secs:       60.0,
            min_cycle_secs:       60.0,
            max_cycle_secs:       180.0,
        }
    }
}

/// Shipment deadline formula.
///
/// ```text
/// base     = clamp(Normal(base_mean, base_std), base_min, base_max)
/// deadline = clamp(base * size / reference_size, min, max)      [minutes]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadlinePolicy {
    pub reference_size:    f64,
    pub base_mean_minutes: f64,
    pub base_std_minutes:  f64,
    pub base_min_minutes:  f64,
    pub base_max_minutes:  f64,
    pub min_minutes:       f64,
    pub max_minutes:       f64,
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            reference_size:    7064.0,
            base_mean_minutes: 3000.0,
            base_std_minutes:  1400.0,
            base_min_minutes:  500.0,
            base_max_minutes:  7000.0,
            min_minutes:       100.0,
            max_minutes:       14_000.0,
        }
    }
}

impl DeadlinePolicy {
    /// Scale a drawn base deadline by shipment size and clamp it.
    pub fn scaled_minutes(&self, base_minutes: f64, size: u32) -> f64 {
        let base = base_minutes.clamp(self.base_min_minutes, self.base_max_minutes);
        let ratio = size as f64 / self.reference_size;
        (base * ratio).clamp(self.min_minutes, self.max_minutes)
    }
}

/// A fixed vessel call, used instead of the stochastic arrival process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedShipment {
    pub arrival_secs:     f64,
    pub size:             u32,
    pub deadline_minutes: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Target mean containers per shipment (gamma mean).
    pub mean_shipment_size:     f64,
    pub size_shape:             f64,
    /// Target mean gap between shipments, in days (gamma mean).
    pub mean_interarrival_days: f64,
    pub interarrival_shape:     f64,
    pub min_interarrival_days:  f64,
    pub crane:                  CraneConfig,
    pub deadline:               DeadlinePolicy,
    /// When non-empty, replaces the stochastic arrival process.
    pub script:                 Vec<ScriptedShipment>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            mean_shipment_size:     7065.0,
            size_shape:             8.0,
            mean_interarrival_days: 1.0,
            interarrival_shape:     3.0,
            min_interarrival_days:  0.01,
            crane:                  CraneConfig::default(),
            deadline:               DeadlinePolicy::default(),
            script:                 Vec::new(),
        }
    }
}

impl WorkloadConfig {
    /// Gamma scale giving `mean_shipment_size` for the configured shape.
    pub fn size_scale(&self) -> f64 {
        self.mean_shipment_size / self.size_shape
    }

    /// Gamma scale (in days) giving `mean_interarrival_days`.
    pub fn interarrival_scale_days(&self) -> f64 {
        self.mean_interarrival_days / self.interarrival_shape
    }
}

/// Polling periods of the dispatcher processes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub swapper_interval_secs:   f64,
    pub charger_interval_secs:   f64,
    pub activator_interval_secs: f64,
    pub tracker_interval_secs:   f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            swapper_interval_secs:   1.0,
            charger_interval_secs:   1.0,
            activator_interval_secs: 30.0,
            tracker_interval_secs:   30.0,
        }
    }
}
