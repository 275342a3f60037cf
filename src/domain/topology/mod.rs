//! Infers which cells share a fronthaul link from how their packet loss
//! co-varies.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::config::TopologyConfig;
use crate::domain::series::CellSeries;
use crate::domain::series::frame::SeriesFrame;
use crate::domain::utils::id::{CellId, LinkId};
use crate::error::{Error, Result};

pub mod clustering;
pub mod correlation;
pub mod link_assignment;

use clustering::sweep_thresholds;
use correlation::CorrelationMatrix;
use link_assignment::assign_link_ids;

/// Link id to the ordered set of cells attached to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkTopology {
    links: BTreeMap<LinkId, BTreeSet<CellId>>,
}

/// Advisory findings of topology inference or validation. None of them is
/// fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyDiagnostic {
    /// No threshold in the sweep reached the target component count.
    NotConverged { loosest_threshold: f64, components: usize, target: usize },
    /// Two anchors fell into one component; `link` was left without it.
    AnchorCollision { anchor: CellId, link: LinkId, claimed_by: LinkId },
    /// The anchor cell is not part of the data.
    AnchorMissing { anchor: CellId, link: LinkId },
    /// A known cell belongs to no link.
    UncoveredCell { cell: CellId },
    /// A cell is listed under more than one link.
    OverlappingCell { cell: CellId, links: Vec<LinkId> },
}

impl LinkTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `link` with no cells if it is not present yet.
    pub fn ensure_link(&mut self, link: LinkId) {
        self.links.entry(link).or_default();
    }

    pub fn extend_link<I: IntoIterator<Item = CellId>>(&mut self, link: LinkId, cells: I) {
        self.links.entry(link).or_default().extend(cells);
    }

    pub fn link_ids(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.links.keys().copied()
    }

    pub fn cells(&self, link: LinkId) -> Option<&BTreeSet<CellId>> {
        self.links.get(&link)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LinkId, &BTreeSet<CellId>)> {
        self.links.iter().map(|(link, cells)| (*link, cells))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Checks that the links partition `known_cells`: every known cell on
    /// some link and no cell on two links.
    pub fn validate<'a, I>(&self, known_cells: I) -> Vec<TopologyDiagnostic>
    where
        I: IntoIterator<Item = &'a CellId>,
    {
        let mut links_of: BTreeMap<&CellId, Vec<LinkId>> = BTreeMap::new();
        for (link, cells) in &self.links {
            for cell in cells {
                links_of.entry(cell).or_default().push(*link);
            }
        }

        let mut diagnostics = Vec::new();
        for cell in known_cells {
            if !links_of.contains_key(cell) {
                diagnostics.push(TopologyDiagnostic::UncoveredCell { cell: cell.clone() });
            }
        }
        for (cell, links) in links_of {
            if links.len() > 1 {
                diagnostics.push(TopologyDiagnostic::OverlappingCell { cell: cell.clone(), links });
            }
        }

        for diagnostic in &diagnostics {
            log::warn!("Topology check: {:?}", diagnostic);
        }
        diagnostics
    }
}

/// Everything topology inference produced, kept for diagnostics and
/// export.
#[derive(Debug, Clone)]
pub struct TopologyInference {
    pub topology: LinkTopology,
    pub threshold: f64,
    pub converged: bool,
    pub component_count: usize,
    pub correlation: CorrelationMatrix,
    pub diagnostics: Vec<TopologyDiagnostic>,
}

/// Reindexes all cells onto a master axis and infers the link topology.
pub fn infer_topology(series: &[CellSeries], config: &TopologyConfig) -> Result<TopologyInference> {
    let frame = SeriesFrame::reindex(series, config.timestamp_precision);
    infer_from_frame(&frame, config)
}

/// Infers the link topology of an already reindexed frame.
pub fn infer_from_frame(frame: &SeriesFrame, config: &TopologyConfig) -> Result<TopologyInference> {
    if config.target_components < 1 {
        return Err(Error::InvalidConfiguration("target component count must be at least 1".to_string()));
    }

    let correlation = CorrelationMatrix::from_frame(frame);
    let clustering = sweep_thresholds(&correlation, &config.threshold_sweep(), config.target_components);

    let mut diagnostics = Vec::new();
    if !clustering.converged {
        diagnostics.push(TopologyDiagnostic::NotConverged {
            loosest_threshold: clustering.threshold,
            components: clustering.components.len(),
            target: config.target_components,
        });
    }

    let (topology, assignment_diagnostics) = assign_link_ids(&clustering.components, config);
    diagnostics.extend(assignment_diagnostics);
    diagnostics.extend(topology.validate(frame.cells()));

    for (link, cells) in topology.iter() {
        log::info!("Link {}: {} cells", link, cells.len());
    }

    Ok(TopologyInference {
        topology,
        threshold: clustering.threshold,
        converged: clustering.converged,
        component_count: clustering.components.len(),
        correlation,
        diagnostics,
    })
}
