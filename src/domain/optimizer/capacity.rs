use crate::domain::config::AnalysisConfig;
use crate::domain::simulator::LeakyBucket;
use crate::domain::utils::statistics;

/// Smallest capacity found for one link and what it saves against peak
/// provisioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationResult {
    pub optimal_capacity_gbps: f64,
    pub peak_load_gbps: f64,
    /// `(1 - optimal / peak) * 100`, or `0` for an idle link.
    pub savings_pct: f64,
    /// `false` when not even the upper search bound met the SLA; the
    /// reported capacity is then that bound.
    pub feasible: bool,
}

impl OptimizationResult {
    pub fn new(optimal_capacity_gbps: f64, peak_load_gbps: f64, feasible: bool) -> Self {
        let savings_pct = if peak_load_gbps > 0.0 { (1.0 - optimal_capacity_gbps / peak_load_gbps) * 100.0 } else { 0.0 };
        Self { optimal_capacity_gbps, peak_load_gbps, savings_pct, feasible }
    }

    pub fn saved_capacity_gbps(&self) -> f64 {
        self.peak_load_gbps - self.optimal_capacity_gbps
    }
}

/// Binary search over link capacity on top of the leaky-bucket simulator.
///
/// Relies on the drop rate being non-increasing in capacity for a fixed
/// input and buffer time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityOptimizer {
    pub bucket: LeakyBucket,
    pub iterations: u32,
    pub headroom_factor: f64,
}

impl Default for CapacityOptimizer {
    fn default() -> Self {
        Self { bucket: LeakyBucket::default(), iterations: 15, headroom_factor: 1.5 }
    }
}

impl From<&AnalysisConfig> for CapacityOptimizer {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            bucket: LeakyBucket::from(&config.simulation),
            iterations: config.optimizer.iterations,
            headroom_factor: config.optimizer.headroom_factor,
        }
    }
}

impl CapacityOptimizer {
    /// Searches `[0, peak * headroom_factor]` for the smallest capacity
    /// whose drop rate stays within `sla_drop_rate`.
    ///
    /// The result is within `peak * headroom_factor / 2^iterations` of the
    /// true minimum and never above the peak when feasible: at peak
    /// capacity the bucket drains every slot completely.
    pub fn optimize(&self, link_series_gbps: &[f64], buffer_time_sec: f64, sla_drop_rate: f64) -> OptimizationResult {
        let peak = statistics::max(link_series_gbps).max(0.0);

        let mut low = 0.0;
        let mut high = peak * self.headroom_factor;
        let mut best_feasible: Option<f64> = None;

        for _ in 0..self.iterations {
            let mid = (low + high) / 2.0;
            let result = self.bucket.simulate(mid, link_series_gbps, buffer_time_sec);

            if result.drop_rate <= sla_drop_rate {
                best_feasible = Some(mid);
                high = mid;
            } else {
                low = mid;
            }
        }

        match best_feasible {
            Some(capacity) => OptimizationResult::new(capacity.min(peak), peak, true),
            None => {
                log::warn!("No capacity up to {:.3} Gbps meets a drop rate of {}; reporting the upper bound.", high, sla_drop_rate);
                OptimizationResult::new(high, peak, false)
            }
        }
    }
}

/// Optimizes one aggregate link series with the default search (15
/// halvings, 1.5x peak upper bound, 500 µs slots).
pub fn optimize(link_series_gbps: &[f64], buffer_time_sec: f64, sla_drop_rate: f64) -> OptimizationResult {
    CapacityOptimizer::default().optimize(link_series_gbps, buffer_time_sec, sla_drop_rate)
}

