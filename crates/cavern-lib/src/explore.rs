//! Frontier exploration toward a hidden target.
//!
//! At every step only the current node, its open neighbours and each
//! neighbour's distance to the target are known. The walk greedily moves to
//! the closest unvisited neighbour and backtracks out of dead ends, which makes
//! it a depth-first search: it always reaches a target that is connected to
//! the start, though rarely along the shortest route.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::NodeId;

/// One neighbour and its distance to the target, valid for the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NeighbourReading {
    pub id: NodeId,
    pub distance: u64,
}

/// What the walker can observe and do while exploring.
pub trait ExplorationState {
    /// Node the walker is standing on.
    fn current_location(&self) -> NodeId;

    /// Open neighbours of the current node with their distance to the target.
    fn neighbours(&self) -> Vec<NeighbourReading>;

    /// Distance from the current node to the target; zero means arrived.
    fn distance_to_target(&self) -> u64;

    /// Move to an open neighbour of the current node.
    fn move_to(&mut self, id: NodeId) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeTag {
    Visited,
    Exhausted,
}

/// Decision taken by [`Explorer::next_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Enter a node that has never been visited.
    Forward(NodeId),
    /// Current node is a dead end; return to the node we came from.
    Backtrack(NodeId),
    /// Dead end with nowhere left to return to.
    Stuck,
}

/// Depth-first walker state for one exploration run.
#[derive(Debug, Clone)]
pub struct Explorer {
    tags: HashMap<NodeId, NodeTag>,
    trail: Vec<NodeId>,
}

impl Explorer {
    /// Start a fresh walk at `start`.
    pub fn new(start: NodeId) -> Self {
        Self {
            tags: HashMap::from([(start, NodeTag::Visited)]),
            trail: Vec::new(),
        }
    }

    /// Choose the next move from `current` given the visible neighbours.
    ///
    /// The untagged neighbour with the smallest distance wins; among equal
    /// distances the first one listed is taken.
    pub fn next_step(&mut self, current: NodeId, neighbours: &[NeighbourReading]) -> Step {
        let choice = neighbours
            .iter()
            .filter(|reading| !self.tags.contains_key(&reading.id))
            .min_by_key(|reading| reading.distance);

        if let Some(reading) = choice {
            self.trail.push(current);
            self.tags.insert(reading.id, NodeTag::Visited);
            return Step::Forward(reading.id);
        }

        self.tags.insert(current, NodeTag::Exhausted);
        match self.trail.pop() {
            Some(previous) => Step::Backtrack(previous),
            None => Step::Stuck,
        }
    }

    pub fn is_exhausted(&self, node: NodeId) -> bool {
        self.tags.get(&node) == Some(&NodeTag::Exhausted)
    }

    pub fn is_visited(&self, node: NodeId) -> bool {
        self.tags.contains_key(&node)
    }

    /// Number of nodes the walk can still back out through.
    pub fn depth(&self) -> usize {
        self.trail.len()
    }
}

/// Summary of a completed exploration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplorationReport {
    /// Node the walk ended on (the target).
    pub target: NodeId,
    pub steps: usize,
    pub forward_moves: usize,
    pub backtracks: usize,
    /// Every node occupied, starting node first.
    pub walk: Vec<NodeId>,
}

/// Walk until the state reports zero distance to the target.
///
/// No move is made once the walker stands on the target, including when it
/// starts there.
pub fn explore<S: ExplorationState + ?Sized>(state: &mut S) -> Result<ExplorationReport> {
    let start = state.current_location();
    let mut explorer = Explorer::new(start);
    let mut walk = vec![start];
    let mut forward_moves = 0usize;
    let mut backtracks = 0usize;

    while state.distance_to_target() != 0 {
        let current = state.current_location();
        let neighbours = state.neighbours();

        let next = match explorer.next_step(current, &neighbours) {
            Step::Forward(next) => {
                forward_moves += 1;
                next
            }
            Step::Backtrack(previous) => {
                debug!(from = current, to = previous, "dead end, backtracking");
                backtracks += 1;
                previous
            }
            Step::Stuck => {
                return Err(Error::TargetUnreachable {
                    steps: forward_moves + backtracks,
                });
            }
        };

        state.move_to(next)?;
        walk.push(next);
    }

    let report = ExplorationReport {
        target: state.current_location(),
        steps: forward_moves + backtracks,
        forward_moves,
        backtracks,
        walk,
    };
    info!(
        node = report.target,
        steps = report.steps,
        backtracks = report.backtracks,
        "exploration reached target"
    );
    Ok(report)
}
