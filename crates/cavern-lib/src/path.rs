use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::cost::route_cost;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

/// Ordered node sequence from `start` to `goal` (both included) and its cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub steps: Vec<NodeId>,
    pub cost: u64,
}

impl Route {
    pub fn start(&self) -> Option<NodeId> {
        self.steps.first().copied()
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.steps.last().copied()
    }

    /// Number of edges in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Nodes to move to, in order, when walking the route from its start.
    pub fn moves(&self) -> &[NodeId] {
        self.steps.get(1..).unwrap_or(&[])
    }
}

/// Per-node bookkeeping for one A* run.
///
/// The start node is its own predecessor and carries an infinite final cost.
#[derive(Debug, Clone, Copy)]
struct SearchRecord {
    predecessor: NodeId,
    cost_so_far: u64,
    final_cost: u64,
}

/// Run A* from `start` to `goal` using the Manhattan distance between grid
/// positions as the heuristic.
///
/// Among open nodes with equal final cost the lowest identifier is expanded
/// first, so repeated runs over the same graph return the same route. The
/// result is a minimum-cost route whenever every edge is at least as long as
/// the grid distance between its endpoints (see
/// [`Graph::heuristic_is_admissible`]).
pub fn find_path(graph: &Graph, start: NodeId, goal: NodeId) -> Result<Route> {
    let goal_position = graph
        .position(goal)
        .ok_or(Error::UnknownNode { id: goal })?;
    if !graph.contains(start) {
        return Err(Error::UnknownNode { id: start });
    }

    let mut open: HashMap<NodeId, SearchRecord> = HashMap::new();
    let mut closed: HashMap<NodeId, SearchRecord> = HashMap::new();
    let mut queue = BinaryHeap::new();

    open.insert(
        start,
        SearchRecord {
            predecessor: start,
            cost_so_far: 0,
            final_cost: u64::MAX,
        },
    );
    queue.push(OpenEntry::new(start, u64::MAX));

    while let Some(entry) = queue.pop() {
        // Superseded queue entries are skipped; the open map holds the truth.
        let record = match open.get(&entry.node) {
            Some(record) if record.final_cost == entry.final_cost => *record,
            _ => continue,
        };
        open.remove(&entry.node);
        closed.insert(entry.node, record);

        if entry.node == goal {
            let steps = reconstruct_path(&closed, start, goal)?;
            let cost = route_cost(graph, &steps)?;
            debug!(
                start,
                goal,
                cost,
                hops = steps.len().saturating_sub(1),
                expanded = closed.len(),
                "a* route found"
            );
            return Ok(Route { steps, cost });
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            if closed.contains_key(&next) {
                continue;
            }

            let heuristic = graph
                .position(next)
                .map(|position| position.manhattan_distance(&goal_position))
                .unwrap_or(0);
            let cost_so_far = record.cost_so_far + u64::from(edge.length);
            let candidate = SearchRecord {
                predecessor: entry.node,
                cost_so_far,
                final_cost: cost_so_far + heuristic,
            };

            match open.get_mut(&next) {
                Some(existing) if candidate.final_cost < existing.final_cost => {
                    *existing = candidate;
                    queue.push(OpenEntry::new(next, candidate.final_cost));
                }
                Some(_) => {}
                None => {
                    open.insert(next, candidate);
                    queue.push(OpenEntry::new(next, candidate.final_cost));
                }
            }
        }
    }

    debug!(start, goal, expanded = closed.len(), "a* open set exhausted");
    Err(Error::NoPathFound { start, goal })
}

/// Run Dijkstra's algorithm from `start` to `goal`.
///
/// Makes no use of grid positions, so it stays exact on graphs where the
/// Manhattan heuristic is not admissible.
pub fn find_path_dijkstra(graph: &Graph, start: NodeId, goal: NodeId) -> Result<Route> {
    for id in [start, goal] {
        if !graph.contains(id) {
            return Err(Error::UnknownNode { id });
        }
    }

    let mut distances: HashMap<NodeId, u64> = HashMap::new();
    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0);
    queue.push(OpenEntry::new(start, 0));

    while let Some(entry) = queue.pop() {
        match distances.get(&entry.node) {
            Some(&distance) if distance < entry.final_cost => continue,
            _ => {}
        }

        if entry.node == goal {
            let mut steps = vec![goal];
            let mut current = goal;
            while let Some(&parent) = parents.get(&current) {
                steps.push(parent);
                current = parent;
            }
            steps.reverse();
            let cost = route_cost(graph, &steps)?;
            return Ok(Route { steps, cost });
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            let next_cost = entry.final_cost + u64::from(edge.length);
            if next_cost < distances.get(&next).copied().unwrap_or(u64::MAX) {
                distances.insert(next, next_cost);
                parents.insert(next, entry.node);
                queue.push(OpenEntry::new(next, next_cost));
            }
        }
    }

    Err(Error::NoPathFound { start, goal })
}

/// Walk predecessors back from `goal`; every node on the way must be closed.
fn reconstruct_path(
    closed: &HashMap<NodeId, SearchRecord>,
    start: NodeId,
    goal: NodeId,
) -> Result<Vec<NodeId>> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        let record = closed.get(&current).ok_or_else(|| Error::InvalidGraph {
            reason: format!("search record missing for node {current} while tracing {start} to {goal}"),
        })?;
        if record.predecessor == current {
            return Err(Error::InvalidGraph {
                reason: format!("route to {goal} ends at node {current} instead of {start}"),
            });
        }
        current = record.predecessor;
        path.push(current);
    }
    path.reverse();
    Ok(path)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct OpenEntry {
    node: NodeId,
    final_cost: u64,
}

impl OpenEntry {
    fn new(node: NodeId, final_cost: u64) -> Self {
        Self { node, final_cost }
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost, then id.
        other
            .final_cost
            .cmp(&self.final_cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
