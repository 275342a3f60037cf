use std::collections::HashMap;

use crate::domain::config::TopologyConfig;
use crate::domain::topology::{LinkTopology, TopologyDiagnostic};
use crate::domain::utils::id::{CellId, LinkId};

/// Maps anonymous components onto link ids using the configured anchors.
///
/// Anchors are processed by priority. Each claims the component holding
/// its cell for its link; a component already claimed by another link
/// stays with the earlier anchor and the later anchor's link is left
/// without that component. Unclaimed components go to the residual link.
/// Every anchored link and the residual link appear in the result, empty
/// or not.
pub fn assign_link_ids(components: &[Vec<CellId>], config: &TopologyConfig) -> (LinkTopology, Vec<TopologyDiagnostic>) {
    let component_of: HashMap<&CellId, usize> =
        components.iter().enumerate().flat_map(|(index, members)| members.iter().map(move |cell| (cell, index))).collect();

    let mut owner: Vec<Option<LinkId>> = vec![None; components.len()];
    let mut diagnostics = Vec::new();

    for anchor in config.anchors_by_priority() {
        let Some(&index) = component_of.get(&anchor.cell) else {
            log::warn!("Anchor cell {} for link {} has no data; link {} gets no anchored cells.", anchor.cell, anchor.link, anchor.link);
            diagnostics.push(TopologyDiagnostic::AnchorMissing { anchor: anchor.cell.clone(), link: anchor.link });
            continue;
        };

        match owner[index] {
            None => owner[index] = Some(anchor.link),
            Some(claimed_by) if claimed_by == anchor.link => {}
            Some(claimed_by) => {
                log::warn!(
                    "Anchor cell {} (link {}) shares a cluster with the anchor of link {}; the cluster stays on link {}.",
                    anchor.cell,
                    anchor.link,
                    claimed_by,
                    claimed_by
                );
                diagnostics.push(TopologyDiagnostic::AnchorCollision { anchor: anchor.cell.clone(), link: anchor.link, claimed_by });
            }
        }
    }

    let mut topology = LinkTopology::new();
    for anchor in &config.anchors {
        topology.ensure_link(anchor.link);
    }
    topology.ensure_link(config.residual_link);

    for (members, claimed) in components.iter().zip(owner) {
        topology.extend_link(claimed.unwrap_or(config.residual_link), members.iter().cloned());
    }

    (topology, diagnostics)
}
