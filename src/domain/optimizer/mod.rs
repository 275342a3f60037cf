//! Per-link capacity search and the traffic views built on the same
//! aggregate series.

use std::collections::BTreeMap;

use crate::domain::series::frame::SeriesFrame;
use crate::domain::topology::LinkTopology;
use crate::domain::utils::id::LinkId;

pub mod capacity;
pub mod link_traffic;

pub use capacity::{CapacityOptimizer, OptimizationResult, optimize};
use link_traffic::LinkTraffic;

/// Optimizes every link of `topology` in ascending link order. Links
/// without any cell data are skipped.
pub fn optimize_links(
    frame: &SeriesFrame,
    topology: &LinkTopology,
    optimizer: &CapacityOptimizer,
    buffer_time_sec: f64,
    sla_drop_rate: f64,
) -> BTreeMap<LinkId, OptimizationResult> {
    let mut results = BTreeMap::new();

    for (link, members) in topology.iter() {
        let traffic = LinkTraffic::aggregate(frame, link, members);
        if !traffic.has_data() {
            log::warn!("Link {} has no cells with data; skipping optimization.", link);
            continue;
        }

        let result = optimizer.optimize(&traffic.aggregate_gbps, buffer_time_sec, sla_drop_rate);
        log::info!(
            "Link {}: peak {:.2} Gbps, optimal {:.2} Gbps ({:.1}% saved){}",
            link,
            result.peak_load_gbps,
            result.optimal_capacity_gbps,
            result.savings_pct,
            if result.feasible { "" } else { " [infeasible]" }
        );
        results.insert(link, result);
    }

    results
}
