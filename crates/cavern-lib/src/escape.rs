//! Budget-constrained gold collection ending at the exit.
//!
//! The policy repeatedly heads for the closest of the richest nodes, but only
//! when the remaining time still covers the detour plus the shortest route
//! from there to the exit. Once no detour is affordable (or no gold is left)
//! it walks the shortest route out.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::path::Route;
use crate::planner::{select_planner, RoutePlanner};

/// What the walker can observe and do while escaping.
pub trait EscapeState {
    /// Node the walker is standing on.
    fn current_node(&self) -> NodeId;

    /// Node the run must end on.
    fn exit(&self) -> NodeId;

    /// Time left; each move consumes the length of the edge crossed.
    fn time_remaining(&self) -> u64;

    /// Gold currently resting on `node`.
    fn gold_at(&self, node: NodeId) -> u64;

    /// Collect all gold on the current node, returning the amount.
    fn pick_up_gold(&mut self) -> Result<u64>;

    /// Move to a node adjacent to the current one.
    fn move_to(&mut self, node: NodeId) -> Result<()>;
}

/// Summary of a completed escape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EscapeReport {
    pub exit: NodeId,
    pub gold_collected: u64,
    pub time_spent: u64,
    pub time_remaining: u64,
    /// Detours committed before heading for the exit.
    pub detours: usize,
    /// Every node occupied, starting node first.
    pub walk: Vec<NodeId>,
}

/// Collect as much gold as the budget allows, then finish on the exit.
pub fn escape<S: EscapeState + ?Sized>(
    graph: &Graph,
    state: &mut S,
    config: &PlannerConfig,
) -> Result<EscapeReport> {
    let planner = select_planner(config.algorithm);
    let mut run = EscapeRun {
        graph,
        state,
        config,
        planner: planner.as_ref(),
        gold_collected: 0,
        walk: Vec::new(),
    };
    run.execute()
}

struct EscapeRun<'a, S: EscapeState + ?Sized> {
    graph: &'a Graph,
    state: &'a mut S,
    config: &'a PlannerConfig,
    planner: &'a dyn RoutePlanner,
    gold_collected: u64,
    walk: Vec<NodeId>,
}

impl<S: EscapeState + ?Sized> EscapeRun<'_, S> {
    fn execute(&mut self) -> Result<EscapeReport> {
        let initial_time = self.state.time_remaining();
        let exit = self.state.exit();
        self.walk.push(self.state.current_node());
        self.collect_here()?;

        let mut detours = 0usize;
        while let Some(route) = self.next_detour(exit)? {
            debug!(
                node = route.goal(),
                cost = route.cost,
                remaining = self.state.time_remaining(),
                "committing to detour"
            );
            self.follow(&route)?;
            detours += 1;
        }

        let current = self.state.current_node();
        let route = self.planner.find_path(self.graph, current, exit)?;
        let remaining = self.state.time_remaining();
        if route.cost > remaining {
            return Err(Error::InsufficientBudget {
                required: route.cost,
                remaining,
            });
        }
        self.follow(&route)?;

        let time_remaining = self.state.time_remaining();
        let report = EscapeReport {
            exit,
            gold_collected: self.gold_collected,
            time_spent: initial_time.saturating_sub(time_remaining),
            time_remaining,
            detours,
            walk: std::mem::take(&mut self.walk),
        };
        info!(
            gold = report.gold_collected,
            time_spent = report.time_spent,
            time_remaining = report.time_remaining,
            detours = report.detours,
            "escaped"
        );
        Ok(report)
    }

    /// Route to the next affordable collection target, if any.
    fn next_detour(&self, exit: NodeId) -> Result<Option<Route>> {
        let gilded: Vec<(NodeId, u64)> = self
            .graph
            .nodes()
            .map(|node| (node, self.state.gold_at(node)))
            .filter(|&(_, gold)| gold > 0)
            .collect();
        let Some(richest) = gilded.iter().map(|&(_, gold)| gold).max() else {
            return Ok(None);
        };

        let current = self.state.current_node();
        let mut best: Option<Route> = None;
        for &(node, gold) in &gilded {
            if !self.config.is_rich(gold, richest) {
                continue;
            }
            let route = match self.planner.find_path(self.graph, current, node) {
                Ok(route) => route,
                Err(Error::NoPathFound { .. }) => {
                    debug!(node, "gold unreachable, skipping candidate");
                    continue;
                }
                Err(err) => return Err(err),
            };
            if best.as_ref().map_or(true, |b| route.cost < b.cost) {
                best = Some(route);
            }
        }

        let Some(to_candidate) = best else {
            return Ok(None);
        };
        let candidate = to_candidate.goal().unwrap_or(current);
        let to_exit = match self.planner.find_path(self.graph, candidate, exit) {
            Ok(route) => route,
            // Left to the final exit route to report from the current node.
            Err(Error::NoPathFound { .. }) => {
                debug!(candidate, "no route from candidate to exit, heading for exit");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let required = to_candidate.cost + to_exit.cost;
        let remaining = self.state.time_remaining();
        if required > remaining {
            debug!(
                candidate,
                required, remaining, "detour unaffordable, heading for exit"
            );
            return Ok(None);
        }
        Ok(Some(to_candidate))
    }

    /// Walk `route` from the current node, collecting along the way.
    fn follow(&mut self, route: &Route) -> Result<()> {
        for &next in route.moves() {
            let current = self.state.current_node();
            let edge = self
                .graph
                .edge(current, next)
                .ok_or(Error::InvalidTraversal { from: current, to: next })?;
            let remaining = self.state.time_remaining();
            if u64::from(edge.length) > remaining {
                return Err(Error::InsufficientBudget {
                    required: u64::from(edge.length),
                    remaining,
                });
            }
            self.state.move_to(next)?;
            self.walk.push(next);
            self.collect_here()?;
        }
        Ok(())
    }

    fn collect_here(&mut self) -> Result<()> {
        let here = self.state.current_node();
        if self.state.gold_at(here) > 0 {
            let gold = self.state.pick_up_gold()?;
            self.gold_collected += gold;
            debug!(node = here, gold, total = self.gold_collected, "picked up gold");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::graph::{GraphBuilder, GridPosition};

    /// Minimal in-test state; the full harness lives in `crate::harness`.
    struct Walker {
        graph: Graph,
        current: NodeId,
        exit: NodeId,
        time: u64,
        gold: HashMap<NodeId, u64>,
    }

    impl EscapeState for Walker {
        fn current_node(&self) -> NodeId {
            self.current
        }

        fn exit(&self) -> NodeId {
            self.exit
        }

        fn time_remaining(&self) -> u64 {
            self.time
        }

        fn gold_at(&self, node: NodeId) -> u64 {
            self.gold.get(&node).copied().unwrap_or(0)
        }

        fn pick_up_gold(&mut self) -> Result<u64> {
            self.gold
                .remove(&self.current)
                .filter(|&gold| gold > 0)
                .ok_or(Error::EffectorRejected {
                    action: "pick up gold",
                    reason: "no gold here".to_string(),
                })
        }

        fn move_to(&mut self, node: NodeId) -> Result<()> {
            let edge = self.graph.edge(self.current, node).ok_or(Error::EffectorRejected {
                action: "move",
                reason: format!("{node} is not adjacent"),
            })?;
            self.time -= u64::from(edge.length);
            self.current = node;
            Ok(())
        }
    }

    fn line(nodes: u64) -> Graph {
        let mut builder = GraphBuilder::new();
        for id in 0..nodes {
            builder
                .add_node(id, GridPosition::new(0, id as i32))
                .unwrap();
            if id > 0 {
                builder.add_edge(id - 1, id, 1).unwrap();
            }
        }
        builder.build()
    }

    fn walker(graph: &Graph, time: u64, gold: &[(NodeId, u64)]) -> Walker {
        Walker {
            graph: graph.clone(),
            current: 0,
            exit: 0,
            time,
            gold: gold.iter().copied().collect(),
        }
    }

    #[test]
    fn unaffordable_detour_goes_straight_out() {
        let graph = line(5);
        let mut state = walker(&graph, 6, &[(4, 10)]);
        let report = escape(&graph, &mut state, &PlannerConfig::default()).unwrap();

        assert_eq!(report.gold_collected, 0);
        assert_eq!(report.walk, vec![0]);
        assert_eq!(state.time, 6);
        assert_eq!(state.gold_at(4), 10);
    }

    #[test]
    fn affordable_detour_collects_and_returns() {
        let graph = line(5);
        let mut state = walker(&graph, 10, &[(4, 10)]);
        let report = escape(&graph, &mut state, &PlannerConfig::default()).unwrap();

        assert_eq!(report.gold_collected, 10);
        assert_eq!(report.detours, 1);
        assert_eq!(state.current, 0);
        assert_eq!(state.time, 2);
        assert_eq!(report.time_spent, 8);
    }

    #[test]
    fn gold_on_start_is_collected_for_free() {
        let graph = line(3);
        let mut state = walker(&graph, 0, &[(0, 7)]);
        let report = escape(&graph, &mut state, &PlannerConfig::default()).unwrap();
        assert_eq!(report.gold_collected, 7);
        assert_eq!(report.time_spent, 0);
    }

    #[test]
    fn collects_poorer_gold_passed_on_the_way() {
        let graph = line(5);
        let mut state = walker(&graph, 20, &[(2, 1), (4, 10)]);
        let report = escape(&graph, &mut state, &PlannerConfig::default()).unwrap();
        assert_eq!(report.gold_collected, 11);
        assert_eq!(report.detours, 1);
    }

    #[test]
    fn starting_away_from_exit_without_budget_fails() {
        let graph = line(3);
        let mut state = walker(&graph, 1, &[]);
        state.current = 2;
        let err = escape(&graph, &mut state, &PlannerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientBudget {
                required: 2,
                remaining: 1
            }
        ));
        assert_eq!(state.current, 2, "no move attempted");
    }
}
