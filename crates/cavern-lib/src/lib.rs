//! Cavern library entry points.
//!
//! This crate plans routes through a static, grid-embedded cavern graph:
//! A* shortest paths, a depth-first exploration policy that homes in on a
//! hidden target from distance readings alone, and a budget-constrained escape
//! policy that collects gold while always keeping enough time to reach the
//! exit. Higher-level consumers (the CLI) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod cavern;
pub mod config;
pub mod cost;
pub mod error;
pub mod escape;
pub mod explore;
pub mod graph;
pub mod harness;
pub mod path;
pub mod planner;

pub use cavern::{load_cavern, Cavern, ScenarioDocument, ScenarioEdge, ScenarioNode};
pub use config::{PlannerConfig, DEFAULT_RICHNESS_THRESHOLD};
pub use cost::route_cost;
pub use error::{Error, Result};
pub use escape::{escape, EscapeReport, EscapeState};
pub use explore::{explore, ExplorationReport, ExplorationState, Explorer, NeighbourReading, Step};
pub use graph::{build_grid_graph, Edge, Graph, GraphBuilder, GridPosition, NodeId};
pub use harness::{EscapeSession, ExplorationSession};
pub use path::{find_path, find_path_dijkstra, Route};
pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RouteAlgorithm, RoutePlanner};
