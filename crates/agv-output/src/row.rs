//! Plain data row types written by output backends.

use agv_core::SimTime;
use agv_fleet::Sample;

/// One metric sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRow {
    pub time_secs: f64,
    pub metric:    &'static str,
    /// Entity the sample belongs to; `None` for fleet-wide metrics.
    pub subject:   Option<u64>,
    pub value:     f64,
}

impl From<&Sample> for SampleRow {
    fn from(s: &Sample) -> Self {
        Self {
            time_secs: s.time.secs(),
            metric:    s.metric.name(),
            subject:   s.metric.subject(),
            value:     s.value,
        }
    }
}

/// Queue lengths at the first sample of each simulated hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HourlyQueueRow {
    pub hour:      u64,
    pub battery:   u64,
    pub container: u64,
    pub swapping:  u64,
    pub charging:  u64,
    pub idle_agv:  u64,
}

impl HourlyQueueRow {
    pub fn at(time: SimTime) -> Self {
        Self { hour: time.hours().floor() as u64, ..Self::default() }
    }
}
