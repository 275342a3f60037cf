use std::collections::HashMap;

use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use crate::domain::topology::correlation::CorrelationMatrix;
use crate::domain::utils::id::CellId;

/// Connected components found by the threshold sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Threshold at which the sweep stopped.
    pub threshold: f64,
    /// Components in order of their smallest member; members ascending.
    pub components: Vec<Vec<CellId>>,
    /// `false` when even the loosest threshold left more than the target
    /// number of components.
    pub converged: bool,
}

/// Sweeps `thresholds` (strict to loose) and returns the first partition
/// with at most `target_components` components.
///
/// Two cells share an edge when their correlation strictly exceeds the
/// threshold. Lowering the threshold only adds edges, so a single
/// union-find is grown edge by edge in descending correlation order
/// instead of rebuilding the graph at every step.
pub fn sweep_thresholds(matrix: &CorrelationMatrix, thresholds: &[f64], target_components: usize) -> Clustering {
    let n = matrix.len();

    let mut edges: Vec<(usize, usize, f64)> = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push((i, j, matrix.get(i, j)));
        }
    }
    edges.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut dsu = QuickUnionUf::<UnionBySize>::new(n);
    let mut component_count = n;
    let mut next_edge = 0;
    let mut last_threshold = thresholds.first().copied().unwrap_or(0.0);

    for &threshold in thresholds {
        last_threshold = threshold;

        while next_edge < edges.len() && edges[next_edge].2 > threshold {
            let (a, b, _) = edges[next_edge];
            if dsu.union(a, b) {
                component_count -= 1;
            }
            next_edge += 1;
        }

        log::debug!("Threshold {:.2}: {} components", threshold, component_count);

        if component_count <= target_components {
            log::info!("Topology converged at threshold {:.2} with {} components.", threshold, component_count);
            return Clustering { threshold, components: collect_components(&mut dsu, matrix.cells()), converged: true };
        }
    }

    log::warn!(
        "Could not reach {} components; loosest threshold {:.2} leaves {}.",
        target_components,
        last_threshold,
        component_count
    );
    Clustering { threshold: last_threshold, components: collect_components(&mut dsu, matrix.cells()), converged: false }
}

fn collect_components(dsu: &mut QuickUnionUf<UnionBySize>, cells: &[CellId]) -> Vec<Vec<CellId>> {
    let mut slot_by_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<CellId>> = Vec::new();

    for (index, cell) in cells.iter().enumerate() {
        let root = dsu.find(index);
        let slot = *slot_by_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(cell.clone());
    }

    for component in &mut components {
        component.sort();
    }
    components
}
