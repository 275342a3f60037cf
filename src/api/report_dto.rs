use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::financial::FinancialSummary;
use crate::domain::optimizer::OptimizationResult;
use crate::domain::optimizer::link_traffic::{LinkStats, TrafficPoint};
use crate::domain::simulator::SimulationResult;
use crate::domain::utils::id::LinkId;

/// Rounds for presentation. The domain keeps full precision.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OptimizationDto {
    pub optimal_capacity: f64,
    pub peak_load: f64,
    pub savings_pct: f64,
    pub feasible: bool,
}

impl From<&OptimizationResult> for OptimizationDto {
    fn from(result: &OptimizationResult) -> Self {
        Self {
            optimal_capacity: round_to(result.optimal_capacity_gbps, 2),
            peak_load: round_to(result.peak_load_gbps, 2),
            savings_pct: round_to(result.savings_pct, 1),
            feasible: result.feasible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationDto {
    pub drop_rate: f64,
    pub is_congested: bool,
}

impl From<&SimulationResult> for SimulationDto {
    fn from(result: &SimulationResult) -> Self {
        Self { drop_rate: result.drop_rate, is_congested: result.congested }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FinancialSummaryDto {
    pub total_peak_capacity_gbps: f64,
    pub total_optimal_capacity_gbps: f64,
    pub saved_capacity_gbps: f64,
    pub estimated_savings: f64,
    pub cost_basis_per_gbps: f64,
    pub optimization_details: BTreeMap<String, OptimizationDto>,
}

impl From<&FinancialSummary> for FinancialSummaryDto {
    fn from(summary: &FinancialSummary) -> Self {
        Self {
            total_peak_capacity_gbps: round_to(summary.total_peak_capacity_gbps, 2),
            total_optimal_capacity_gbps: round_to(summary.total_optimal_capacity_gbps, 2),
            saved_capacity_gbps: round_to(summary.saved_capacity_gbps, 2),
            estimated_savings: round_to(summary.estimated_savings, 2),
            cost_basis_per_gbps: summary.cost_per_gbps,
            optimization_details: optimization_report(&summary.links),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LinkStatsDto {
    pub link_id: u32,
    pub peak_gbps: f64,
    pub p99_gbps: f64,
    pub p95_gbps: f64,
    pub avg_gbps: f64,
}

impl LinkStatsDto {
    pub fn new(link: LinkId, stats: &LinkStats) -> Self {
        Self {
            link_id: link.get(),
            peak_gbps: round_to(stats.peak_gbps, 2),
            p99_gbps: round_to(stats.p99_gbps, 2),
            p95_gbps: round_to(stats.p95_gbps, 2),
            avg_gbps: round_to(stats.avg_gbps, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrafficPointDto {
    pub time: f64,
    pub gbps: f64,
}

impl From<&TrafficPoint> for TrafficPointDto {
    fn from(point: &TrafficPoint) -> Self {
        Self { time: point.time, gbps: round_to(point.gbps, 2) }
    }
}

/// Optimization results keyed by link id string.
pub fn optimization_report(results: &BTreeMap<LinkId, OptimizationResult>) -> BTreeMap<String, OptimizationDto> {
    results.iter().map(|(link, result)| (link.to_string(), OptimizationDto::from(result))).collect()
}

/// Simulation results keyed by link id string.
pub fn simulation_report(results: &BTreeMap<LinkId, SimulationResult>) -> BTreeMap<String, SimulationDto> {
    results.iter().map(|(link, result)| (link.to_string(), SimulationDto::from(result))).collect()
}
