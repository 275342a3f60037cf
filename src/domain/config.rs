use std::collections::HashSet;

use crate::api::config_dto::AnalysisConfigDto;
use crate::domain::utils::id::{CellId, LinkId};
use crate::error::{Error, Result};

/// Duration of one OFDM symbol; converts raw per-symbol kilobit counters
/// into a rate.
pub const SYMBOL_DURATION_SEC: f64 = 35.7e-6;

/// Slot duration of the leaky-bucket simulator (500 µs).
pub const SLOT_DURATION_SEC: f64 = 0.0005;

/// Buffer budget of a leaf switch: four symbols.
pub const DEFAULT_BUFFER_TIME_SEC: f64 = 143e-6;

/// Drop rate above which a link counts as congested.
pub const MAX_DROP_RATE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct AlignerConfig {
    pub symbol_duration_sec: f64,
    /// Lower bound of the spike cutoff, in raw kilobit units.
    pub spike_floor_kbits: f64,
    pub spike_median_factor: f64,
    pub spike_mean_factor: f64,
    /// The shift grid spans `[-max_shift_sec, +max_shift_sec]`.
    pub max_shift_sec: f64,
    pub shift_step_sec: f64,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            symbol_duration_sec: SYMBOL_DURATION_SEC,
            spike_floor_kbits: 100.0,
            spike_median_factor: 10.0,
            spike_mean_factor: 5.0,
            max_shift_sec: 1.5,
            shift_step_sec: 0.05,
        }
    }
}

impl AlignerConfig {
    /// Candidate shifts in ascending order, e.g. 61 values from -1.5 s to
    /// +1.5 s for the defaults.
    pub fn shift_grid(&self) -> Vec<f64> {
        let count = (2.0 * self.max_shift_sec / self.shift_step_sec).round() as usize + 1;
        if count == 1 {
            return vec![0.0];
        }
        let span = 2.0 * self.max_shift_sec;
        (0..count).map(|k| -self.max_shift_sec + span * k as f64 / (count - 1) as f64).collect()
    }
}

/// A-priori knowledge that `cell` hangs off `link`. Lower `priority` values
/// are processed first.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnchor {
    pub cell: CellId,
    pub link: LinkId,
    pub priority: u32,
}

impl LinkAnchor {
    pub fn new(cell: impl Into<String>, link: u32, priority: u32) -> Self {
        Self { cell: CellId::new(cell), link: LinkId::new(link), priority }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopologyConfig {
    /// Decimal places kept when snapping timestamps onto the master axis.
    pub timestamp_precision: u32,
    pub threshold_high: f64,
    pub threshold_low: f64,
    pub threshold_step: f64,
    pub target_components: usize,
    pub anchors: Vec<LinkAnchor>,
    /// Link that absorbs every component no anchor claims.
    pub residual_link: LinkId,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            timestamp_precision: 4,
            threshold_high: 0.95,
            threshold_low: 0.20,
            threshold_step: 0.05,
            target_components: 3,
            anchors: vec![LinkAnchor::new("1", 2, 0), LinkAnchor::new("2", 3, 1)],
            residual_link: LinkId::new(1),
        }
    }
}

impl TopologyConfig {
    /// Thresholds from strict to loose. The high bound is included, the low
    /// bound is not: the defaults give 0.95, 0.90, ..., 0.25. A degenerate
    /// range still yields the high bound alone.
    pub fn threshold_sweep(&self) -> Vec<f64> {
        let steps = ((self.threshold_high - self.threshold_low) / self.threshold_step - 1e-9).ceil().max(1.0) as usize;
        (0..steps).map(|k| self.threshold_high - k as f64 * self.threshold_step).collect()
    }

    /// Anchors in processing order: ascending priority, declaration order
    /// breaking ties.
    pub fn anchors_by_priority(&self) -> Vec<&LinkAnchor> {
        let mut anchors: Vec<&LinkAnchor> = self.anchors.iter().collect();
        anchors.sort_by_key(|anchor| anchor.priority);
        anchors
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub slot_duration_sec: f64,
    pub max_drop_rate: f64,
    pub buffer_time_sec: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { slot_duration_sec: SLOT_DURATION_SEC, max_drop_rate: MAX_DROP_RATE, buffer_time_sec: DEFAULT_BUFFER_TIME_SEC }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub iterations: u32,
    /// Upper search bound as a multiple of the peak load.
    pub headroom_factor: f64,
    pub sla_drop_rate: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { iterations: 15, headroom_factor: 1.5, sla_drop_rate: MAX_DROP_RATE }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialConfig {
    pub cost_per_gbps: f64,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self { cost_per_gbps: 50.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisConfig {
    pub aligner: AlignerConfig,
    pub topology: TopologyConfig,
    pub simulation: SimulationConfig,
    pub optimizer: OptimizerConfig,
    pub financial: FinancialConfig,
}

impl AnalysisConfig {
    /// Overlays the values present in `dto` on the defaults and validates
    /// the result.
    pub fn from_dto(dto: AnalysisConfigDto) -> Result<Self> {
        let mut config = AnalysisConfig::default();

        let a = dto.aligner;
        let aligner = &mut config.aligner;
        overlay(&mut aligner.symbol_duration_sec, a.symbol_duration_sec);
        overlay(&mut aligner.spike_floor_kbits, a.spike_floor_kbits);
        overlay(&mut aligner.spike_median_factor, a.spike_median_factor);
        overlay(&mut aligner.spike_mean_factor, a.spike_mean_factor);
        overlay(&mut aligner.max_shift_sec, a.max_shift_sec);
        overlay(&mut aligner.shift_step_sec, a.shift_step_sec);

        let t = dto.topology;
        let topology = &mut config.topology;
        overlay(&mut topology.timestamp_precision, t.timestamp_precision);
        overlay(&mut topology.threshold_high, t.threshold_high);
        overlay(&mut topology.threshold_low, t.threshold_low);
        overlay(&mut topology.threshold_step, t.threshold_step);
        overlay(&mut topology.target_components, t.target_components);
        if let Some(anchors) = t.anchors {
            topology.anchors = anchors.into_iter().map(|a| LinkAnchor::new(a.cell_id, a.link_id, a.priority)).collect();
        }
        overlay(&mut topology.residual_link, t.residual_link.map(LinkId::new));

        let s = dto.simulation;
        overlay(&mut config.simulation.slot_duration_sec, s.slot_duration_sec);
        overlay(&mut config.simulation.max_drop_rate, s.max_drop_rate);
        overlay(&mut config.simulation.buffer_time_sec, s.buffer_time_sec);

        let o = dto.optimizer;
        overlay(&mut config.optimizer.iterations, o.iterations);
        overlay(&mut config.optimizer.headroom_factor, o.headroom_factor);
        overlay(&mut config.optimizer.sla_drop_rate, o.sla_drop_rate);

        overlay(&mut config.financial.cost_per_gbps, dto.financial.cost_per_gbps);

        config.validate()?;
        Ok(config)
    }

    /// Rejects structurally invalid configurations before any computation
    /// starts.
    pub fn validate(&self) -> Result<()> {
        let a = &self.aligner;
        require_positive("aligner.symbolDurationSec", a.symbol_duration_sec)?;
        require_non_negative("aligner.spikeFloorKbits", a.spike_floor_kbits)?;
        require_non_negative("aligner.spikeMedianFactor", a.spike_median_factor)?;
        require_non_negative("aligner.spikeMeanFactor", a.spike_mean_factor)?;
        require_non_negative("aligner.maxShiftSec", a.max_shift_sec)?;
        require_positive("aligner.shiftStepSec", a.shift_step_sec)?;

        let t = &self.topology;
        require_finite("topology.thresholdHigh", t.threshold_high)?;
        require_finite("topology.thresholdLow", t.threshold_low)?;
        require_positive("topology.thresholdStep", t.threshold_step)?;
        if t.threshold_low > t.threshold_high {
            return Err(invalid(format!("topology.thresholdLow ({}) exceeds thresholdHigh ({})", t.threshold_low, t.threshold_high)));
        }
        if t.target_components < 1 {
            return Err(invalid("topology.targetComponents must be at least 1".to_string()));
        }
        if t.timestamp_precision > 9 {
            return Err(invalid(format!("topology.timestampPrecision ({}) must not exceed 9", t.timestamp_precision)));
        }
        if t.residual_link.get() < 1 {
            return Err(invalid("topology.residualLink must be a positive link id".to_string()));
        }
        let mut seen_cells = HashSet::new();
        for anchor in &t.anchors {
            if anchor.link.get() < 1 {
                return Err(invalid(format!("anchor for cell '{}' has non-positive link id", anchor.cell)));
            }
            if !seen_cells.insert(anchor.cell.clone()) {
                return Err(invalid(format!("cell '{}' is anchored more than once", anchor.cell)));
            }
        }

        let s = &self.simulation;
        require_positive("simulation.slotDurationSec", s.slot_duration_sec)?;
        require_rate("simulation.maxDropRate", s.max_drop_rate)?;
        require_non_negative("simulation.bufferTimeSec", s.buffer_time_sec)?;

        let o = &self.optimizer;
        if o.iterations == 0 {
            return Err(invalid("optimizer.iterations must be at least 1".to_string()));
        }
        require_finite("optimizer.headroomFactor", o.headroom_factor)?;
        if o.headroom_factor < 1.0 {
            return Err(invalid(format!("optimizer.headroomFactor ({}) must be at least 1", o.headroom_factor)));
        }
        require_rate("optimizer.slaDropRate", o.sla_drop_rate)?;

        require_non_negative("financial.costPerGbps", self.financial.cost_per_gbps)?;

        Ok(())
    }
}

fn overlay<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration(message)
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() { Ok(()) } else { Err(invalid(format!("{} must be finite, got {}", name, value))) }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if value > 0.0 { Ok(()) } else { Err(invalid(format!("{} must be positive, got {}", name, value))) }
}

fn require_non_negative(name: &str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if value >= 0.0 { Ok(()) } else { Err(invalid(format!("{} must not be negative, got {}", name, value))) }
}

fn require_rate(name: &str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if (0.0..=1.0).contains(&value) { Ok(()) } else { Err(invalid(format!("{} must lie in [0, 1], got {}", name, value))) }
}
