use crate::domain::config::{MAX_DROP_RATE, SLOT_DURATION_SEC, SimulationConfig};

/// Outcome of one leaky-bucket run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Dropped bits over offered bits, in `[0, 1]`.
    pub drop_rate: f64,
    /// `drop_rate > max_drop_rate`.
    pub congested: bool,
}

/// Fraction of offered bits dropped by a bucket that drains
/// `capacity_gbps` and holds at most `capacity_gbps * buffer_time_sec`
/// worth of bits.
///
/// Single causal pass over `input_rate_gbps`, one entry per slot of
/// `slot_duration_sec`. The bucket never goes below empty. An input with
/// no bits yields `0.0`.
pub fn drop_rate(capacity_gbps: f64, input_rate_gbps: &[f64], buffer_time_sec: f64, slot_duration_sec: f64) -> f64 {
    let max_buffer_bits = capacity_gbps * 1e9 * buffer_time_sec;
    let drain_bits = capacity_gbps * 1e9 * slot_duration_sec;

    let mut buffer_bits = 0.0;
    let mut dropped_bits = 0.0;
    let mut total_input_bits = 0.0;

    for &rate in input_rate_gbps {
        let input_bits = rate * 1e9 * slot_duration_sec;

        buffer_bits += input_bits - drain_bits;
        if buffer_bits < 0.0 {
            buffer_bits = 0.0;
        }
        if buffer_bits > max_buffer_bits {
            dropped_bits += buffer_bits - max_buffer_bits;
            buffer_bits = max_buffer_bits;
        }
        total_input_bits += input_bits;
    }

    if total_input_bits > 0.0 { dropped_bits / total_input_bits } else { 0.0 }
}

/// Leaky-bucket model of one link's ingress buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeakyBucket {
    pub slot_duration_sec: f64,
    pub max_drop_rate: f64,
}

impl Default for LeakyBucket {
    fn default() -> Self {
        Self { slot_duration_sec: SLOT_DURATION_SEC, max_drop_rate: MAX_DROP_RATE }
    }
}

impl From<&SimulationConfig> for LeakyBucket {
    fn from(config: &SimulationConfig) -> Self {
        Self { slot_duration_sec: config.slot_duration_sec, max_drop_rate: config.max_drop_rate }
    }
}

impl LeakyBucket {
    pub fn simulate(&self, capacity_gbps: f64, input_rate_gbps: &[f64], buffer_time_sec: f64) -> SimulationResult {
        let drop_rate = drop_rate(capacity_gbps, input_rate_gbps, buffer_time_sec, self.slot_duration_sec);
        SimulationResult { drop_rate, congested: drop_rate > self.max_drop_rate }
    }
}

/// Runs the default bucket (500 µs slots, 1 % congestion mark).
pub fn simulate(capacity_gbps: f64, input_rate_gbps: &[f64], buffer_time_sec: f64) -> SimulationResult {
    LeakyBucket::default().simulate(capacity_gbps, input_rate_gbps, buffer_time_sec)
}
