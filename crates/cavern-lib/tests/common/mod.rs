//! Common test utilities and fixture helpers.
//!
//! Provides the checked-in scenario fixtures plus a small deterministic
//! generator for random grid caverns, so property-style tests stay
//! reproducible without extra dependencies.

use std::collections::HashMap;
use std::path::PathBuf;

use cavern_lib::{load_cavern, Cavern, Graph, GraphBuilder, GridPosition, NodeId};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Load a scenario fixture by file name.
#[allow(dead_code)]
pub fn fixture_cavern(name: &str) -> Cavern {
    load_cavern(&fixtures_dir().join(name)).expect("fixture scenario loads")
}

/// Linear-congruential generator; good enough for shuffling test graphs.
#[allow(dead_code)]
pub struct Lcg(u64);

#[allow(dead_code)]
impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound
    }
}

/// Connected `rows` x `columns` grid with random walls and edge lengths in
/// `1..=max_length`. Every row is fully linked and column 0 links the rows,
/// so the graph always stays connected.
#[allow(dead_code)]
pub fn random_grid(seed: u64, rows: u32, columns: u32, max_length: u32) -> Graph {
    let mut rng = Lcg::new(seed);
    let id = |row: u32, column: u32| NodeId::from(row * columns + column);
    let mut builder = GraphBuilder::new();

    for row in 0..rows {
        for column in 0..columns {
            builder
                .add_node(id(row, column), GridPosition::new(row as i32, column as i32))
                .expect("unique node");
        }
    }

    for row in 0..rows {
        for column in 0..columns {
            if column + 1 < columns {
                let length = 1 + rng.below(max_length);
                builder
                    .add_edge(id(row, column), id(row, column + 1), length)
                    .expect("valid edge");
            }
            if row + 1 < rows && (column == 0 || rng.below(3) > 0) {
                let length = 1 + rng.below(max_length);
                builder
                    .add_edge(id(row, column), id(row + 1, column), length)
                    .expect("valid edge");
            }
        }
    }

    builder.build()
}

/// Exhaustive single-source shortest distances by repeated edge relaxation.
#[allow(dead_code)]
pub fn brute_force_distances(graph: &Graph, source: NodeId) -> HashMap<NodeId, u64> {
    let mut distances = HashMap::from([(source, 0u64)]);
    loop {
        let mut changed = false;
        for node in graph.nodes() {
            let Some(&base) = distances.get(&node) else {
                continue;
            };
            for edge in graph.neighbours(node) {
                let candidate = base + u64::from(edge.length);
                let entry = distances.entry(edge.target).or_insert(u64::MAX);
                if candidate < *entry {
                    *entry = candidate;
                    changed = true;
                }
            }
        }
        if !changed {
            return distances;
        }
    }
}

/// Whether consecutive nodes of `walk` are joined by edges.
#[allow(dead_code)]
pub fn is_connected_walk(graph: &Graph, walk: &[NodeId]) -> bool {
    walk.windows(2)
        .all(|pair| graph.edge(pair[0], pair[1]).is_some())
}
