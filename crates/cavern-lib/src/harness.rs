//! In-memory implementations of the exploration and escape state surfaces.
//!
//! Both sessions enforce the effector preconditions and reject violations with
//! [`Error::EffectorRejected`], so a policy defect surfaces as an error instead
//! of a silently corrupted run.

use std::collections::BTreeMap;

use crate::cavern::Cavern;
use crate::error::{Error, Result};
use crate::escape::EscapeState;
use crate::explore::{ExplorationState, NeighbourReading};
use crate::graph::{Graph, NodeId};

/// Walker searching for a target whose location is only revealed as a
/// distance.
#[derive(Debug, Clone)]
pub struct ExplorationSession {
    graph: Graph,
    current: NodeId,
    target: NodeId,
    moves: usize,
}

impl ExplorationSession {
    pub fn new(graph: Graph, start: NodeId, target: NodeId) -> Result<Self> {
        for id in [start, target] {
            if !graph.contains(id) {
                return Err(Error::UnknownNode { id });
            }
        }
        Ok(Self {
            graph,
            current: start,
            target,
            moves: 0,
        })
    }

    /// Session from the cavern entrance toward the orb.
    pub fn for_cavern(cavern: &Cavern) -> Result<Self> {
        Self::new(cavern.graph.clone(), cavern.entrance, cavern.orb)
    }

    /// Moves made so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Grid distance to the target, ignoring walls. Only the target itself
    /// reads as zero, even if another node shares its grid cell.
    fn distance_from(&self, node: NodeId) -> u64 {
        if node == self.target {
            return 0;
        }
        self.graph
            .manhattan_distance(node, self.target)
            .unwrap_or(u64::MAX)
            .max(1)
    }
}

impl ExplorationState for ExplorationSession {
    fn current_location(&self) -> NodeId {
        self.current
    }

    fn neighbours(&self) -> Vec<NeighbourReading> {
        self.graph
            .neighbours(self.current)
            .iter()
            .map(|edge| NeighbourReading {
                id: edge.target,
                distance: self.distance_from(edge.target),
            })
            .collect()
    }

    fn distance_to_target(&self) -> u64 {
        self.distance_from(self.current)
    }

    fn move_to(&mut self, id: NodeId) -> Result<()> {
        if self.current == self.target {
            return Err(Error::EffectorRejected {
                action: "move",
                reason: "already standing on the target".to_string(),
            });
        }
        if self.graph.edge(self.current, id).is_none() {
            return Err(Error::EffectorRejected {
                action: "move",
                reason: format!("node {id} is not a neighbour of node {}", self.current),
            });
        }
        self.current = id;
        self.moves += 1;
        Ok(())
    }
}

/// Walker racing a time budget to the exit while gold lies around.
#[derive(Debug, Clone)]
pub struct EscapeSession {
    graph: Graph,
    current: NodeId,
    exit: NodeId,
    time_remaining: u64,
    gold: BTreeMap<NodeId, u64>,
    collected: u64,
    distance_travelled: u64,
}

impl EscapeSession {
    pub fn new(
        graph: Graph,
        start: NodeId,
        exit: NodeId,
        time_remaining: u64,
        gold: BTreeMap<NodeId, u64>,
    ) -> Result<Self> {
        for id in [start, exit] {
            if !graph.contains(id) {
                return Err(Error::UnknownNode { id });
            }
        }
        Ok(Self {
            graph,
            current: start,
            exit,
            time_remaining,
            gold,
            collected: 0,
            distance_travelled: 0,
        })
    }

    /// Session starting at `start` (usually the orb) with the cavern's gold.
    pub fn for_cavern(cavern: &Cavern, start: NodeId, time_remaining: u64) -> Result<Self> {
        Self::new(
            cavern.graph.clone(),
            start,
            cavern.exit,
            time_remaining,
            cavern.gold.clone(),
        )
    }

    pub fn gold_collected(&self) -> u64 {
        self.collected
    }

    /// Sum of the lengths of every edge crossed.
    pub fn distance_travelled(&self) -> u64 {
        self.distance_travelled
    }

    /// Gold still resting in the cavern.
    pub fn gold_remaining(&self) -> u64 {
        self.gold.values().sum()
    }
}

impl EscapeState for EscapeSession {
    fn current_node(&self) -> NodeId {
        self.current
    }

    fn exit(&self) -> NodeId {
        self.exit
    }

    fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    fn gold_at(&self, node: NodeId) -> u64 {
        self.gold.get(&node).copied().unwrap_or(0)
    }

    fn pick_up_gold(&mut self) -> Result<u64> {
        match self.gold.remove(&self.current) {
            Some(gold) if gold > 0 => {
                self.collected += gold;
                Ok(gold)
            }
            _ => Err(Error::EffectorRejected {
                action: "pick up gold",
                reason: format!("no gold on node {}", self.current),
            }),
        }
    }

    fn move_to(&mut self, node: NodeId) -> Result<()> {
        let edge = self
            .graph
            .edge(self.current, node)
            .ok_or_else(|| Error::EffectorRejected {
                action: "move",
                reason: format!("node {node} is not adjacent to node {}", self.current),
            })?;
        let length = u64::from(edge.length);
        if length > self.time_remaining {
            return Err(Error::EffectorRejected {
                action: "move",
                reason: format!(
                    "edge to node {node} takes {length} but only {} remains",
                    self.time_remaining
                ),
            });
        }
        self.time_remaining -= length;
        self.distance_travelled += length;
        self.current = node;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_grid_graph;

    #[test]
    fn exploration_readings_use_grid_distance() {
        let graph = build_grid_graph(3, 3, 1).unwrap();
        let session = ExplorationSession::new(graph, 0, 8).unwrap();
        assert_eq!(session.distance_to_target(), 4);
        let mut readings = session.neighbours();
        readings.sort_by_key(|r| r.id);
        assert_eq!(
            readings,
            vec![
                NeighbourReading { id: 1, distance: 3 },
                NeighbourReading { id: 3, distance: 3 },
            ]
        );
    }

    #[test]
    fn exploration_rejects_non_neighbours_and_moves_after_arrival() {
        let graph = build_grid_graph(1, 2, 1).unwrap();
        let mut session = ExplorationSession::new(graph, 0, 1).unwrap();
        assert!(matches!(
            session.move_to(0),
            Err(Error::EffectorRejected { .. })
        ));
        session.move_to(1).unwrap();
        assert_eq!(session.distance_to_target(), 0);
        assert!(matches!(
            session.move_to(0),
            Err(Error::EffectorRejected { .. })
        ));
        assert_eq!(session.moves(), 1);
    }

    #[test]
    fn escape_session_charges_edge_length() {
        let graph = build_grid_graph(1, 3, 4).unwrap();
        let mut session =
            EscapeSession::new(graph, 0, 2, 5, BTreeMap::from([(1, 3)])).unwrap();
        session.move_to(1).unwrap();
        assert_eq!(session.time_remaining(), 1);
        assert_eq!(session.pick_up_gold().unwrap(), 3);
        assert!(matches!(
            session.pick_up_gold(),
            Err(Error::EffectorRejected { .. })
        ));
        assert!(matches!(
            session.move_to(2),
            Err(Error::EffectorRejected { .. })
        ));
        assert_eq!(session.current_node(), 1);
        assert_eq!(session.gold_collected(), 3);
        assert_eq!(session.distance_travelled(), 4);
    }

    #[test]
    fn sessions_reject_unknown_nodes() {
        let graph = build_grid_graph(2, 2, 1).unwrap();
        assert!(ExplorationSession::new(graph.clone(), 0, 99).is_err());
        assert!(EscapeSession::new(graph, 99, 0, 10, BTreeMap::new()).is_err());
    }
}
