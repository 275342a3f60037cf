use std::collections::BTreeMap;

use crate::domain::optimizer::OptimizationResult;
use crate::domain::utils::id::LinkId;

/// Network-wide capacity totals and what the saved capacity is worth.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    pub total_peak_capacity_gbps: f64,
    pub total_optimal_capacity_gbps: f64,
    pub saved_capacity_gbps: f64,
    pub estimated_savings: f64,
    pub cost_per_gbps: f64,
    pub links: BTreeMap<LinkId, OptimizationResult>,
}

/// Folds per-link optimization results into network totals.
pub fn summarize_financials(results: &BTreeMap<LinkId, OptimizationResult>, cost_per_gbps: f64) -> FinancialSummary {
    let (total_peak, total_optimal) =
        results.values().fold((0.0, 0.0), |(peak, optimal), r| (peak + r.peak_load_gbps, optimal + r.optimal_capacity_gbps));

    let saved_capacity = total_peak - total_optimal;

    FinancialSummary {
        total_peak_capacity_gbps: total_peak,
        total_optimal_capacity_gbps: total_optimal,
        saved_capacity_gbps: saved_capacity,
        estimated_savings: saved_capacity * cost_per_gbps,
        cost_per_gbps,
        links: results.clone(),
    }
}
