use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::aligner::trace::{PacketRecord, RawCellTraces, ThroughputRecord};
use crate::domain::utils::id::CellId;
use crate::error::{Error, Result};

const THROUGHPUT_PREFIX: &str = "throughput-cell-";
const PACKET_PREFIX: &str = "pkt-stats-cell-";
const TRACE_SUFFIX: &str = ".dat";

/// Everything from this character to the end of a line is ignored.
const COMMENT_MARKER: char = '<';

/// The pair of raw trace files belonging to one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTraceFiles {
    pub throughput: PathBuf,
    pub packets: PathBuf,
}

/// Finds `throughput-cell-<id>.dat` / `pkt-stats-cell-<id>.dat` pairs in
/// `log_dir`. Cells with only one of the two files are logged and left
/// out.
pub fn scan_log_dir(log_dir: impl AsRef<Path>) -> Result<BTreeMap<CellId, CellTraceFiles>> {
    let mut throughput: BTreeMap<CellId, PathBuf> = BTreeMap::new();
    let mut packets: BTreeMap<CellId, PathBuf> = BTreeMap::new();

    for entry in fs::read_dir(log_dir.as_ref())? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if let Some(cell) = cell_from_file_name(name, THROUGHPUT_PREFIX) {
            throughput.insert(cell, path);
        } else if let Some(cell) = cell_from_file_name(name, PACKET_PREFIX) {
            packets.insert(cell, path);
        }
    }

    let mut cells = BTreeMap::new();
    for (cell, throughput_path) in throughput {
        match packets.remove(&cell) {
            Some(packet_path) => {
                cells.insert(cell, CellTraceFiles { throughput: throughput_path, packets: packet_path });
            }
            None => log::warn!("Cell {} has a throughput trace but no packet trace; skipping.", cell),
        }
    }
    for cell in packets.keys() {
        log::warn!("Cell {} has a packet trace but no throughput trace; skipping.", cell);
    }

    log::info!("Found {} complete cells (pkt + thr pair) in '{}'.", cells.len(), log_dir.as_ref().display());
    Ok(cells)
}

fn cell_from_file_name(name: &str, prefix: &str) -> Option<CellId> {
    let id = name.strip_prefix(prefix)?.strip_suffix(TRACE_SUFFIX)?;
    (!id.is_empty()).then(|| CellId::new(id))
}

/// Reads a `timestamp kbits` trace.
pub fn read_throughput_trace(path: impl AsRef<Path>) -> Result<Vec<ThroughputRecord>> {
    let rows = read_columns(path.as_ref(), 2)?;
    Ok(rows.into_iter().map(|r| ThroughputRecord { timestamp: r[0], kbits: r[1] }).collect())
}

/// Reads a `timestamp tx rx tooLate` trace.
pub fn read_packet_trace(path: impl AsRef<Path>) -> Result<Vec<PacketRecord>> {
    let rows = read_columns(path.as_ref(), 4)?;
    Ok(rows.into_iter().map(|r| PacketRecord { timestamp: r[0], tx: r[1], rx: r[2], too_late: r[3] }).collect())
}

pub fn read_cell_traces(files: &CellTraceFiles) -> Result<RawCellTraces> {
    Ok(RawCellTraces { throughput: read_throughput_trace(&files.throughput)?, packets: read_packet_trace(&files.packets)? })
}

/// Parses whitespace separated numeric rows with exactly `columns` fields.
fn read_columns(path: &Path, columns: usize) -> Result<Vec<Vec<f64>>> {
    let content = fs::read_to_string(path)?;
    let mut rows = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.split(COMMENT_MARKER).next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields = line
            .split_whitespace()
            .map(|field| parse_field(field).map_err(|reason| Error::MalformedTrace { path: path.to_path_buf(), line: index + 1, reason }))
            .collect::<Result<Vec<f64>>>()?;

        if fields.len() != columns {
            return Err(Error::MalformedTrace {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("expected {} columns, found {}", columns, fields.len()),
            });
        }
        rows.push(fields);
    }

    Ok(rows)
}

/// Numeric field that must be finite; `nan` and `inf` are rejected.
fn parse_field(field: &str) -> std::result::Result<f64, String> {
    let value = field.parse::<f64>().map_err(|e| e.to_string())?;
    if value.is_finite() { Ok(value) } else { Err(format!("non-finite value '{}'", field)) }
}
