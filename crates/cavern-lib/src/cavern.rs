//! Cavern scenario documents.
//!
//! A scenario is a JSON file listing the grid nodes (with any gold resting on
//! them), the edges between them, and the three nodes of interest: where the
//! walker enters, where the orb lies, and where the exit is.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::{Graph, GraphBuilder, GridPosition, NodeId};

/// Node entry of a scenario document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioNode {
    pub id: NodeId,
    pub row: i32,
    pub column: i32,
    #[serde(default)]
    pub gold: u64,
}

/// Edge entry of a scenario document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioEdge {
    pub a: NodeId,
    pub b: NodeId,
    pub length: u32,
}

/// Raw scenario document as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioDocument {
    pub nodes: Vec<ScenarioNode>,
    pub edges: Vec<ScenarioEdge>,
    pub entrance: NodeId,
    pub orb: NodeId,
    pub exit: NodeId,
}

/// Validated scenario ready for planning.
#[derive(Debug, Clone)]
pub struct Cavern {
    pub graph: Graph,
    pub gold: BTreeMap<NodeId, u64>,
    pub entrance: NodeId,
    pub orb: NodeId,
    pub exit: NodeId,
}

impl Cavern {
    /// Validate a document and build its graph.
    pub fn from_document(document: ScenarioDocument) -> Result<Self> {
        let mut builder = GraphBuilder::new();
        let mut gold = BTreeMap::new();
        for node in &document.nodes {
            builder.add_node(node.id, GridPosition::new(node.row, node.column))?;
            if node.gold > 0 {
                gold.insert(node.id, node.gold);
            }
        }
        for edge in &document.edges {
            builder.add_edge(edge.a, edge.b, edge.length)?;
        }
        let graph = builder.build();

        for id in [document.entrance, document.orb, document.exit] {
            if !graph.contains(id) {
                return Err(Error::UnknownNode { id });
            }
        }

        if !graph.heuristic_is_admissible() {
            warn!("scenario has edges shorter than their grid distance; a-star routes may not be optimal");
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "scenario loaded"
        );

        Ok(Self {
            graph,
            gold,
            entrance: document.entrance,
            orb: document.orb,
            exit: document.exit,
        })
    }

    /// Parse and validate a JSON scenario.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: ScenarioDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Total gold resting in the cavern.
    pub fn total_gold(&self) -> u64 {
        self.gold.values().sum()
    }
}

/// Load and validate a scenario file.
pub fn load_cavern(path: &Path) -> Result<Cavern> {
    let json = fs::read_to_string(path).map_err(|source| Error::ScenarioRead {
        path: path.to_path_buf(),
        source,
    })?;
    Cavern::from_json_str(&json)
}
