use crate::domain::utils::id::CellId;
use crate::error::{Error, Result};

pub mod frame;

/// Aligned throughput and packet loss of one cell on a shared timestamp
/// axis. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSeries {
    cell: CellId,
    timestamps: Vec<f64>,
    throughput_gbps: Vec<f64>,
    packet_loss: Vec<f64>,
}

impl CellSeries {
    /// Builds a series, checking that all three columns have the same
    /// length and that packet loss is non-negative.
    pub fn new(cell: CellId, timestamps: Vec<f64>, throughput_gbps: Vec<f64>, packet_loss: Vec<f64>) -> Result<Self> {
        if timestamps.len() != throughput_gbps.len() || timestamps.len() != packet_loss.len() {
            return Err(Error::InvalidSeries {
                cell: cell.to_string(),
                reason: format!(
                    "column lengths differ (timestamps {}, throughput {}, packet loss {})",
                    timestamps.len(),
                    throughput_gbps.len(),
                    packet_loss.len()
                ),
            });
        }
        if let Some(bad) = packet_loss.iter().find(|v| v.is_nan() || **v < 0.0) {
            return Err(Error::InvalidSeries { cell: cell.to_string(), reason: format!("packet loss must be non-negative, found {}", bad) });
        }

        Ok(Self { cell, timestamps, throughput_gbps, packet_loss })
    }

    pub fn cell(&self) -> &CellId {
        &self.cell
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn throughput_gbps(&self) -> &[f64] {
        &self.throughput_gbps
    }

    pub fn packet_loss(&self) -> &[f64] {
        &self.packet_loss
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Iterates `(timestamp, gbps, packet_loss)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.timestamps.iter().zip(&self.throughput_gbps).zip(&self.packet_loss).map(|((t, g), l)| (*t, *g, *l))
    }
}
