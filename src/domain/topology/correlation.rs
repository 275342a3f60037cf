use crate::domain::series::frame::SeriesFrame;
use crate::domain::utils::id::CellId;
use crate::domain::utils::statistics::pearson;
use crate::error::{Error, Result};

/// Symmetric matrix of pairwise packet loss correlations. Row and column
/// order follow `cells()`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    cells: Vec<CellId>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn from_frame(frame: &SeriesFrame) -> Self {
        let columns: Vec<(&CellId, &[f64])> = frame.loss_columns().collect();
        let n = columns.len();

        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let r = pearson(columns[i].1, columns[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self { cells: columns.into_iter().map(|(cell, _)| cell.clone()).collect(), values }
    }

    /// Builds a matrix from precomputed values; non-finite entries are
    /// stored as `0.0`.
    ///
    /// Fails with [`Error::InvalidConfiguration`] unless `values` is square
    /// with one row per cell.
    pub fn from_values(cells: Vec<CellId>, values: Vec<Vec<f64>>) -> Result<Self> {
        let n = cells.len();
        if values.len() != n || values.iter().any(|row| row.len() != n) {
            return Err(Error::InvalidConfiguration(format!("correlation matrix must be {0}x{0} for {0} cells", n)));
        }
        let values = values.into_iter().map(|row| row.into_iter().map(|v| if v.is_finite() { v } else { 0.0 }).collect()).collect();
        Ok(Self { cells, values })
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }
}
