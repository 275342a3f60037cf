use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::report_dto::round_to;
use crate::domain::optimizer::OptimizationResult;
use crate::domain::topology::LinkTopology;
use crate::domain::topology::correlation::CorrelationMatrix;
use crate::domain::utils::id::{CellId, LinkId};
use crate::error::Result;

pub const CAPACITY_REPORT_FILE: &str = "link_capacity_estimates.csv";
pub const CORRELATION_MATRIX_FILE: &str = "correlation_matrix.csv";

/// One row of the capacity report. Reading only needs `Link_ID` and
/// `Cells`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReportRow {
    #[serde(rename = "Link_ID")]
    pub link_id: u32,
    /// Space separated cell ids.
    #[serde(rename = "Cells")]
    pub cells: String,
    #[serde(rename = "Capacity_No_Buffer_Gbps", default)]
    pub capacity_no_buffer_gbps: Option<f64>,
    #[serde(rename = "Capacity_With_Buffer_Gbps", default)]
    pub capacity_with_buffer_gbps: Option<f64>,
}

/// Builds one report row per link. Links without an optimization result
/// get empty capacity columns.
pub fn capacity_report_rows(topology: &LinkTopology, results: &BTreeMap<LinkId, OptimizationResult>) -> Vec<CapacityReportRow> {
    topology
        .iter()
        .map(|(link, cells)| {
            let result = results.get(&link);
            CapacityReportRow {
                link_id: link.get(),
                cells: cells.iter().map(CellId::as_str).collect::<Vec<_>>().join(" "),
                capacity_no_buffer_gbps: result.map(|r| round_to(r.peak_load_gbps, 2)),
                capacity_with_buffer_gbps: result.map(|r| round_to(r.optimal_capacity_gbps, 2)),
            }
        })
        .collect()
}

pub fn write_capacity_report(path: impl AsRef<Path>, rows: &[CapacityReportRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads the link membership back from a capacity report.
pub fn read_topology_table(path: impl AsRef<Path>) -> Result<LinkTopology> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let mut topology = LinkTopology::new();
    for row in reader.deserialize::<CapacityReportRow>() {
        let row = row?;
        let link = LinkId::new(row.link_id);
        topology.ensure_link(link);
        topology.extend_link(link, row.cells.split_whitespace().map(CellId::new));
    }

    log::info!("Loaded topology for {} links from '{}'.", topology.len(), path.as_ref().display());
    Ok(topology)
}

/// Writes the matrix with cell ids as header row and first column.
pub fn write_correlation_matrix(path: impl AsRef<Path>, matrix: &CorrelationMatrix) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![String::new()];
    header.extend(matrix.cells().iter().map(|c| c.to_string()));
    writer.write_record(&header)?;

    for (cell, row) in matrix.cells().iter().zip(matrix.rows()) {
        let mut record = vec![cell.to_string()];
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
