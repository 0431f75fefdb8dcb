//! Time-stamped scalar samples and the sink that receives them.
//!
//! The model only emits values; aggregation, printing, and file output live
//! behind [`MetricsSink`].  `agv-output` provides a CSV-backed sink, and
//! [`MetricsRecorder`] keeps everything in memory for tests and summaries.

use agv_core::{AgvId, BatteryId, ShipmentId, SimTime};

use crate::QueueKind;

/// What a sample measures.  Per-entity metrics carry the entity ID.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    QueueLength(QueueKind),
    /// State of charge after a draw or a charge, percent.
    Soc(BatteryId),
    /// State of health after a charge, percent.
    Soh(BatteryId),
    /// Capacity lost to degradation in one charge, kWh.
    CapacityFade(BatteryId),
    /// Time spent on the charger, seconds.
    ChargeSecs(BatteryId),
    /// Length of one travel leg, metres.
    TravelMetres(AgvId),
    /// Duration of one travel leg, seconds.
    TravelSecs(AgvId),
    /// Length of one idle wait, seconds.
    IdleSecs(AgvId),
    /// Container pickup start to unload end, minutes.
    DeliveryMinutes,
    /// Container creation to delivery, minutes.
    TimeInSystemMinutes,
    ShipmentSize(ShipmentId),
    /// First crane batch to last container enqueued, minutes.
    UnloadingMinutes(ShipmentId),
    /// Arrival to completion, hours.
    ShipmentDeliveryHours(ShipmentId),
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::QueueLength(QueueKind::Battery)   => "queue.battery",
            Metric::QueueLength(QueueKind::Container) => "queue.container",
            Metric::QueueLength(QueueKind::Swapping)  => "queue.swapping",
            Metric::QueueLength(QueueKind::Charging)  => "queue.charging",
            Metric::QueueLength(QueueKind::IdleAgv)   => "queue.idle_agv",
            Metric::Soc(_)                   => "battery.soc",
            Metric::Soh(_)                   => "battery.soh",
            Metric::CapacityFade(_)          => "battery.capacity_fade_kwh",
            Metric::ChargeSecs(_)            => "battery.charge_secs",
            Metric::TravelMetres(_)          => "agv.travel_m",
            Metric::TravelSecs(_)            => "agv.travel_secs",
            Metric::IdleSecs(_)              => "agv.idle_secs",
            Metric::DeliveryMinutes          => "container.delivery_min",
            Metric::TimeInSystemMinutes      => "container.time_in_system_min",
            Metric::ShipmentSize(_)          => "shipment.size",
            Metric::UnloadingMinutes(_)      => "shipment.unloading_min",
            Metric::ShipmentDeliveryHours(_) => "shipment.delivery_h",
        }
    }

    /// The entity the sample belongs to, if any.
    pub fn subject(&self) -> Option<u64> {
        match *self {
            Metric::Soc(b) | Metric::Soh(b) | Metric::CapacityFade(b) | Metric::ChargeSecs(b) => {
                Some(b.0 as u64)
            }
            Metric::TravelMetres(a) | Metric::TravelSecs(a) | Metric::IdleSecs(a) => Some(a.0 as u64),
            Metric::ShipmentSize(s) | Metric::UnloadingMinutes(s) | Metric::ShipmentDeliveryHours(s) => {
                Some(s.0 as u64)
            }
            Metric::QueueLength(_) | Metric::DeliveryMinutes | Metric::TimeInSystemMinutes => None,
        }
    }
}

/// Receives every sample the model emits.
pub trait MetricsSink {
    fn record(&mut self, time: SimTime, metric: Metric, value: f64);
}

/// Discards all samples.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn record(&mut self, _time: SimTime, _metric: Metric, _value: f64) {}
}

/// One recorded value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub time:   SimTime,
    pub metric: Metric,
    pub value:  f64,
}

/// Keeps every sample in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsRecorder {
    pub samples: Vec<Sample>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of every sample whose metric has the given name, in time order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.samples
            .iter()
            .filter(move |s| s.metric.name() == name)
            .map(|s| s.value)
    }

    /// Samples of one exact metric (including its subject).
    pub fn series(&self, metric: Metric) -> Vec<(SimTime, f64)> {
        self.samples
            .iter()
            .filter(|s| s.metric == metric)
            .map(|s| (s.time, s.value))
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.values(name).count()
    }
}

impl MetricsSink for MetricsRecorder {
    fn record(&mut self, time: SimTime, metric: Metric, value: f64) {
        self.samples.push(Sample { time, metric, value });
    }
}
