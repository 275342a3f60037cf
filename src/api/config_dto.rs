use serde::{Deserialize, Serialize};

/// JSON shape of an analysis configuration file. Every field is optional;
/// missing values fall back to the defaults of the domain config.
#[derive(Debug, Default, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfigDto {
    pub aligner: AlignerConfigDto,
    pub topology: TopologyConfigDto,
    pub simulation: SimulationConfigDto,
    pub optimizer: OptimizerConfigDto,
    pub financial: FinancialConfigDto,
}

#[derive(Debug, Default, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlignerConfigDto {
    pub symbol_duration_sec: Option<f64>,
    pub spike_floor_kbits: Option<f64>,
    pub spike_median_factor: Option<f64>,
    pub spike_mean_factor: Option<f64>,
    pub max_shift_sec: Option<f64>,
    pub shift_step_sec: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopologyConfigDto {
    pub timestamp_precision: Option<u32>,
    pub threshold_high: Option<f64>,
    pub threshold_low: Option<f64>,
    pub threshold_step: Option<f64>,
    pub target_components: Option<usize>,
    pub anchors: Option<Vec<AnchorDto>>,
    pub residual_link: Option<u32>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorDto {
    pub cell_id: String,
    pub link_id: u32,
    #[serde(default)]
    pub priority: u32,
}

#[derive(Debug, Default, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfigDto {
    pub slot_duration_sec: Option<f64>,
    pub max_drop_rate: Option<f64>,
    pub buffer_time_sec: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizerConfigDto {
    pub iterations: Option<u32>,
    pub headroom_factor: Option<f64>,
    pub sla_drop_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialConfigDto {
    pub cost_per_gbps: Option<f64>,
}
