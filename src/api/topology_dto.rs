use serde::{Deserialize, Serialize};

use crate::domain::topology::LinkTopology;

/// Node/edge view of the inferred topology: cells hang off links, links
/// hang off one aggregation switch.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TopologyGraphDto {
    pub nodes: Vec<GraphNodeDto>,
    pub links: Vec<GraphEdgeDto>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphNodeDto {
    pub id: String,
    pub group: String,
    pub val: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphEdgeDto {
    pub source: String,
    pub target: String,
}

const SWITCH_NODE: &str = "Switch";

impl From<&LinkTopology> for TopologyGraphDto {
    fn from(topology: &LinkTopology) -> Self {
        let mut nodes = vec![GraphNodeDto { id: SWITCH_NODE.to_string(), group: "core".to_string(), val: 20 }];
        let mut links = Vec::new();

        for (link, cells) in topology.iter() {
            let link_node = format!("Link {}", link);
            nodes.push(GraphNodeDto { id: link_node.clone(), group: "link".to_string(), val: 15 });
            links.push(GraphEdgeDto { source: link_node.clone(), target: SWITCH_NODE.to_string() });

            for cell in cells {
                let cell_node = format!("Cell {}", cell);
                nodes.push(GraphNodeDto { id: cell_node.clone(), group: "cell".to_string(), val: 10 });
                links.push(GraphEdgeDto { source: cell_node, target: link_node.clone() });
            }
        }

        Self { nodes, links }
    }
}
