use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::series::CellSeries;
use crate::domain::utils::id::CellId;

/// All cells reindexed onto one master timestamp axis.
///
/// Every value array has exactly `timestamps().len()` entries. Slots a
/// cell never reported are filled with `0.0`: absence of data is read as
/// absence of activity.
#[derive(Debug, Clone, Default)]
pub struct SeriesFrame {
    timestamps: Vec<f64>,
    throughput: BTreeMap<CellId, Vec<f64>>,
    loss: BTreeMap<CellId, Vec<f64>>,
}

impl SeriesFrame {
    /// Snaps every timestamp to `precision` decimal places, keeps the first
    /// sample per snapped timestamp within a cell and builds the sorted
    /// union of all snapped timestamps as the master axis.
    pub fn reindex(series: &[CellSeries], precision: u32) -> Self {
        let scale = 10f64.powi(precision as i32);
        let to_tick = |t: f64| (t * scale).round() as i64;

        let mut per_cell: BTreeMap<CellId, Vec<(i64, f64, f64)>> = BTreeMap::new();
        let mut all_ticks: BTreeSet<i64> = BTreeSet::new();

        for cell_series in series {
            if per_cell.contains_key(cell_series.cell()) {
                log::warn!("Cell {} supplied more than once; keeping the first series.", cell_series.cell());
                continue;
            }

            let mut seen: BTreeSet<i64> = BTreeSet::new();
            let mut rows = Vec::with_capacity(cell_series.len());
            let mut duplicates = 0usize;
            for (t, gbps, loss) in cell_series.rows() {
                let tick = to_tick(t);
                if seen.insert(tick) {
                    rows.push((tick, gbps, loss));
                } else {
                    duplicates += 1;
                }
            }
            if duplicates > 0 {
                log::debug!("Cell {}: {} samples collapsed onto an existing timestamp after rounding.", cell_series.cell(), duplicates);
            }

            all_ticks.extend(rows.iter().map(|(tick, _, _)| *tick));
            per_cell.insert(cell_series.cell().clone(), rows);
        }

        let ticks: Vec<i64> = all_ticks.into_iter().collect();
        let position: HashMap<i64, usize> = ticks.iter().enumerate().map(|(i, tick)| (*tick, i)).collect();

        let mut throughput = BTreeMap::new();
        let mut loss = BTreeMap::new();
        for (cell, rows) in per_cell {
            let mut thr_column = vec![0.0; ticks.len()];
            let mut loss_column = vec![0.0; ticks.len()];
            for (tick, gbps, packet_loss) in rows {
                let slot = position[&tick];
                thr_column[slot] = gbps;
                loss_column[slot] = packet_loss;
            }
            throughput.insert(cell.clone(), thr_column);
            loss.insert(cell, loss_column);
        }

        let timestamps = ticks.into_iter().map(|tick| tick as f64 / scale).collect();

        Self { timestamps, throughput, loss }
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Cells in ascending id order.
    pub fn cells(&self) -> impl Iterator<Item = &CellId> {
        self.throughput.keys()
    }

    pub fn cell_count(&self) -> usize {
        self.throughput.len()
    }

    pub fn contains(&self, cell: &CellId) -> bool {
        self.throughput.contains_key(cell)
    }

    pub fn throughput(&self, cell: &CellId) -> Option<&[f64]> {
        self.throughput.get(cell).map(Vec::as_slice)
    }

    pub fn loss(&self, cell: &CellId) -> Option<&[f64]> {
        self.loss.get(cell).map(Vec::as_slice)
    }

    /// Loss columns in ascending cell order.
    pub fn loss_columns(&self) -> impl Iterator<Item = (&CellId, &[f64])> {
        self.loss.iter().map(|(cell, values)| (cell, values.as_slice()))
    }
}
