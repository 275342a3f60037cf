//! Cleans and time-aligns the throughput and packet accounting traces of a
//! cell into one [`CellSeries`].

use crate::domain::config::AlignerConfig;
use crate::domain::series::CellSeries;
use crate::domain::utils::id::CellId;
use crate::error::{Error, Result};

pub mod cleaning;
pub mod shift_search;
pub mod trace;

use cleaning::{clean_throughput, derive_packet_loss};
use shift_search::{estimate_shift, resample_loss};
use trace::RawCellTraces;

/// Aligned series of one cell plus what the alignment found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutcome {
    pub series: CellSeries,
    pub shift_sec: f64,
    pub correlation: f64,
    pub spikes_removed: usize,
}

/// A cell that could not be aligned and was left out of the output.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCell {
    pub cell: CellId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentBatch {
    pub aligned: Vec<AlignmentOutcome>,
    pub skipped: Vec<SkippedCell>,
}

/// Aligns the raw traces of one cell.
///
/// Fails with [`Error::EmptyTrace`] when either trace has no samples.
pub fn align(cell: CellId, traces: &RawCellTraces, config: &AlignerConfig) -> Result<AlignmentOutcome> {
    if traces.throughput.is_empty() {
        return Err(Error::EmptyTrace(format!("throughput trace of cell {}", cell)));
    }
    if traces.packets.is_empty() {
        return Err(Error::EmptyTrace(format!("packet trace of cell {}", cell)));
    }

    let throughput = clean_throughput(&traces.throughput, config);
    let loss = derive_packet_loss(&traces.packets);

    let estimate = estimate_shift(&throughput.timestamps, &throughput.gbps, &loss.timestamps, &loss.loss, &config.shift_grid());
    let aligned_loss = resample_loss(&throughput.timestamps, &loss.timestamps, &loss.loss, estimate.shift_sec);

    log::debug!(
        "Cell {}: {} spikes removed (cutoff {:.1} kbits), best shift {:.2}s, correlation {:.4}",
        cell,
        throughput.spikes_removed,
        throughput.cutoff_kbits,
        estimate.shift_sec,
        estimate.correlation
    );

    let series = CellSeries::new(cell, throughput.timestamps, throughput.gbps, aligned_loss)?;

    Ok(AlignmentOutcome { series, shift_sec: estimate.shift_sec, correlation: estimate.correlation, spikes_removed: throughput.spikes_removed })
}

/// Aligns every cell independently. A cell whose traces could not be read
/// or aligned is recorded in `skipped` and processing continues.
pub fn align_cells<I>(inputs: I, config: &AlignerConfig) -> AlignmentBatch
where
    I: IntoIterator<Item = (CellId, Result<RawCellTraces>)>,
{
    let mut batch = AlignmentBatch::default();

    for (cell, traces) in inputs {
        let outcome = traces.and_then(|traces| align(cell.clone(), &traces, config));
        match outcome {
            Ok(outcome) => {
                log::info!(
                    "Cell {}: {} rows aligned, shift {:.2}s, correlation {:.4}",
                    cell,
                    outcome.series.len(),
                    outcome.shift_sec,
                    outcome.correlation
                );
                batch.aligned.push(outcome);
            }
            Err(e) => {
                log::warn!("Skipping cell {}: {}", cell, e);
                batch.skipped.push(SkippedCell { cell, reason: e.to_string() });
            }
        }
    }

    batch
}
