use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::aligner::SkippedCell;
use crate::domain::series::CellSeries;
use crate::domain::utils::id::CellId;
use crate::error::{Error, Result};

const FILE_PREFIX: &str = "cell_";
const FILE_SUFFIX: &str = "_aligned.csv";

#[derive(Debug, Serialize, Deserialize)]
struct AlignedRow {
    timestamp: f64,
    gbps: f64,
    packet_loss: f64,
}

/// Aligned series found in a directory, plus the files that could not be
/// used.
#[derive(Debug, Clone, Default)]
pub struct AlignedData {
    pub series: Vec<CellSeries>,
    pub skipped: Vec<SkippedCell>,
}

pub fn aligned_file_name(cell: &CellId) -> String {
    format!("{}{}{}", FILE_PREFIX, cell, FILE_SUFFIX)
}

/// Writes `cell_<id>_aligned.csv` with columns `timestamp,gbps,packet_loss`.
pub fn write_aligned_series(dir: impl AsRef<Path>, series: &CellSeries) -> Result<PathBuf> {
    let path = dir.as_ref().join(aligned_file_name(series.cell()));
    let mut writer = csv::Writer::from_path(&path)?;

    for (timestamp, gbps, packet_loss) in series.rows() {
        writer.serialize(AlignedRow { timestamp, gbps, packet_loss })?;
    }
    writer.flush()?;

    Ok(path)
}

pub fn read_aligned_series(path: impl AsRef<Path>, cell: CellId) -> Result<CellSeries> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let mut timestamps = Vec::new();
    let mut gbps = Vec::new();
    let mut packet_loss = Vec::new();
    for row in reader.deserialize::<AlignedRow>() {
        let row = row?;
        timestamps.push(row.timestamp);
        gbps.push(row.gbps);
        packet_loss.push(row.packet_loss);
    }

    if timestamps.is_empty() {
        return Err(Error::EmptyTrace(path.as_ref().display().to_string()));
    }

    CellSeries::new(cell, timestamps, gbps, packet_loss)
}

/// Loads every `cell_<id>_aligned.csv` in `dir`, ordered by cell id.
/// Unreadable files are skipped with a diagnostic.
pub fn load_aligned_dir(dir: impl AsRef<Path>) -> Result<AlignedData> {
    let mut files: Vec<(CellId, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let cell = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(FILE_PREFIX))
            .and_then(|n| n.strip_suffix(FILE_SUFFIX))
            .filter(|id| !id.is_empty())
            .map(CellId::new);
        if let Some(cell) = cell {
            files.push((cell, path));
        }
    }
    files.sort();

    let total = files.len();
    log::info!("Found {} aligned cell files in '{}'.", total, dir.as_ref().display());

    let mut data = AlignedData::default();
    for (index, (cell, path)) in files.into_iter().enumerate() {
        log::debug!("[{}/{}] Parsing {}", index + 1, total, path.display());
        match read_aligned_series(&path, cell.clone()) {
            Ok(series) => data.series.push(series),
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                data.skipped.push(SkippedCell { cell, reason: e.to_string() });
            }
        }
    }

    Ok(data)
}
