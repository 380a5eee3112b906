use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the cavern library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the open set empties before the goal is settled.
    #[error("no path found between node {start} and node {goal}")]
    NoPathFound { start: NodeId, goal: NodeId },

    /// Raised when two consecutive nodes of a route are not adjacent.
    #[error("invalid traversal: node {from} is not adjacent to node {to}")]
    InvalidTraversal { from: NodeId, to: NodeId },

    /// Raised by a harness when a move or pick-up precondition is violated.
    #[error("{action} rejected: {reason}")]
    EffectorRejected { action: &'static str, reason: String },

    /// Raised when exploration has nothing left to backtrack to.
    #[error("exploration target unreachable after {steps} steps")]
    TargetUnreachable { steps: usize },

    /// Raised when the remaining time cannot cover a required traversal.
    #[error("insufficient time: {required} required but only {remaining} remaining")]
    InsufficientBudget { required: u64, remaining: u64 },

    /// Raised when a node identifier is not part of the graph.
    #[error("unknown node: {id}")]
    UnknownNode { id: NodeId },

    /// Raised when graph construction input violates the graph invariants.
    #[error("invalid graph: {reason}")]
    InvalidGraph { reason: String },

    /// Raised when planner configuration is out of range or malformed.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Raised when a scenario file cannot be read.
    #[error("failed to read scenario {}: {source}", path.display())]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
