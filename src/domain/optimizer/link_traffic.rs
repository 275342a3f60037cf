use std::collections::BTreeSet;

use crate::domain::series::frame::SeriesFrame;
use crate::domain::utils::id::{CellId, LinkId};
use crate::domain::utils::statistics;

/// Display budget for traffic samples.
pub const TRAFFIC_SAMPLE_POINTS: usize = 2000;

/// Slot-by-slot sum of the throughput of a link's cells.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTraffic {
    pub link: LinkId,
    /// Member cells that contributed to the sum.
    pub cells: Vec<CellId>,
    /// Member cells without data in the frame.
    pub missing_cells: Vec<CellId>,
    pub aggregate_gbps: Vec<f64>,
}

impl LinkTraffic {
    /// Sums the member cells present in `frame`. Absent members are logged
    /// and skipped.
    pub fn aggregate(frame: &SeriesFrame, link: LinkId, members: &BTreeSet<CellId>) -> Self {
        let mut aggregate_gbps = vec![0.0; frame.timestamps().len()];
        let mut cells = Vec::new();
        let mut missing_cells = Vec::new();

        for cell in members {
            match frame.throughput(cell) {
                Some(values) => {
                    for (sum, value) in aggregate_gbps.iter_mut().zip(values) {
                        *sum += value;
                    }
                    cells.push(cell.clone());
                }
                None => {
                    log::warn!("Link {}: cell {} has no data and is left out of the aggregate.", link, cell);
                    missing_cells.push(cell.clone());
                }
            }
        }

        Self { link, cells, missing_cells, aggregate_gbps }
    }

    pub fn has_data(&self) -> bool {
        !self.cells.is_empty()
    }
}

/// Load profile of one link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStats {
    pub peak_gbps: f64,
    pub p99_gbps: f64,
    pub p95_gbps: f64,
    pub avg_gbps: f64,
}

impl LinkStats {
    pub fn from_series(values: &[f64]) -> Self {
        Self {
            peak_gbps: statistics::max(values),
            p99_gbps: statistics::percentile(values, 99.0),
            p95_gbps: statistics::percentile(values, 95.0),
            avg_gbps: statistics::mean(values),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficPoint {
    pub time: f64,
    pub gbps: f64,
}

/// Keeps every `max(1, len / target_points)`-th sample, starting with the
/// first.
pub fn downsample(timestamps: &[f64], values: &[f64], target_points: usize) -> Vec<TrafficPoint> {
    let step = (timestamps.len() / target_points.max(1)).max(1);
    timestamps.iter().zip(values).step_by(step).map(|(time, gbps)| TrafficPoint { time: *time, gbps: *gbps }).collect()
}
