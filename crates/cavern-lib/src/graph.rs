use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric identifier for a cavern node.
pub type NodeId = u64;

/// Grid coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: i32,
    pub column: i32,
}

impl GridPosition {
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Rows away plus columns away.
    pub fn manhattan_distance(&self, other: &Self) -> u64 {
        u64::from(self.row.abs_diff(other.row)) + u64::from(self.column.abs_diff(other.column))
    }
}

/// Edge within the cavern graph, stored once per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeId,
    pub length: u32,
}

/// Immutable undirected graph embedded in a grid.
///
/// Clones share the underlying storage, so a graph can be handed to several
/// independent searches without copying.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    positions: Arc<BTreeMap<NodeId, GridPosition>>,
    adjacency: Arc<HashMap<NodeId, Vec<Edge>>>,
}

impl Graph {
    /// Whether `node` belongs to this graph.
    pub fn contains(&self, node: NodeId) -> bool {
        self.positions.contains_key(&node)
    }

    /// Grid position of `node`, if known.
    pub fn position(&self, node: NodeId) -> Option<GridPosition> {
        self.positions.get(&node).copied()
    }

    /// Return the neighbours for a given node in edge insertion order.
    pub fn neighbours(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edge joining `a` and `b`, if they are adjacent.
    pub fn edge(&self, a: NodeId, b: NodeId) -> Option<Edge> {
        self.neighbours(a).iter().find(|edge| edge.target == b).copied()
    }

    /// All node identifiers in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.positions.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Manhattan distance between the grid positions of two nodes.
    pub fn manhattan_distance(&self, a: NodeId, b: NodeId) -> Option<u64> {
        let from = self.position(a)?;
        let to = self.position(b)?;
        Some(from.manhattan_distance(&to))
    }

    /// Whether every edge is at least as long as the grid distance between its
    /// endpoints. A* routes are only guaranteed optimal when this holds.
    pub fn heuristic_is_admissible(&self) -> bool {
        self.adjacency.iter().all(|(&node, edges)| {
            edges.iter().all(|edge| {
                self.manhattan_distance(node, edge.target)
                    .is_some_and(|grid| u64::from(edge.length) >= grid)
            })
        })
    }
}

/// Incremental, validating constructor for [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    positions: BTreeMap<NodeId, GridPosition>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Identifiers must be unique.
    pub fn add_node(&mut self, id: NodeId, position: GridPosition) -> Result<&mut Self> {
        if self.positions.insert(id, position).is_some() {
            return Err(Error::InvalidGraph {
                reason: format!("duplicate node {id}"),
            });
        }
        self.adjacency.entry(id).or_default();
        Ok(self)
    }

    /// Connect two registered nodes with an undirected edge.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, length: u32) -> Result<&mut Self> {
        for id in [a, b] {
            if !self.positions.contains_key(&id) {
                return Err(Error::UnknownNode { id });
            }
        }
        if a == b {
            return Err(Error::InvalidGraph {
                reason: format!("self-loop on node {a}"),
            });
        }
        if length == 0 {
            return Err(Error::InvalidGraph {
                reason: format!("edge {a}-{b} must have a positive length"),
            });
        }
        let exists = self
            .adjacency
            .get(&a)
            .is_some_and(|edges| edges.iter().any(|edge| edge.target == b));
        if exists {
            return Err(Error::InvalidGraph {
                reason: format!("parallel edge {a}-{b}"),
            });
        }

        self.adjacency
            .entry(a)
            .or_default()
            .push(Edge { target: b, length });
        self.adjacency
            .entry(b)
            .or_default()
            .push(Edge { target: a, length });
        Ok(self)
    }

    pub fn build(self) -> Graph {
        Graph {
            positions: Arc::new(self.positions),
            adjacency: Arc::new(self.adjacency),
        }
    }
}

/// Build a fully connected `rows` x `columns` lattice where every horizontal and
/// vertical neighbour pair is joined by an edge of `length`.
///
/// Node `row * columns + column` sits at `(row, column)`.
pub fn build_grid_graph(rows: u32, columns: u32, length: u32) -> Result<Graph> {
    let id = |row: u32, column: u32| NodeId::from(row) * NodeId::from(columns) + NodeId::from(column);
    let mut builder = GraphBuilder::new();

    for row in 0..rows {
        for column in 0..columns {
            let position = GridPosition::new(grid_coordinate(row)?, grid_coordinate(column)?);
            builder.add_node(id(row, column), position)?;
        }
    }

    for row in 0..rows {
        for column in 0..columns {
            if column + 1 < columns {
                builder.add_edge(id(row, column), id(row, column + 1), length)?;
            }
            if row + 1 < rows {
                builder.add_edge(id(row, column), id(row + 1, column), length)?;
            }
        }
    }

    Ok(builder.build())
}

fn grid_coordinate(value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::InvalidGraph {
        reason: format!("grid coordinate {value} out of range"),
    })
}
