use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

/// Sum the edge lengths between every consecutive pair in `nodes`.
///
/// Empty and single-node sequences cost nothing. A pair that is not joined by
/// an edge yields [`Error::InvalidTraversal`].
pub fn route_cost(graph: &Graph, nodes: &[NodeId]) -> Result<u64> {
    nodes.windows(2).try_fold(0u64, |total, pair| {
        let (from, to) = (pair[0], pair[1]);
        let edge = graph
            .edge(from, to)
            .ok_or(Error::InvalidTraversal { from, to })?;
        Ok(total + u64::from(edge.length))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_grid_graph;

    #[test]
    fn empty_and_single_node_routes_are_free() {
        let graph = build_grid_graph(2, 2, 3).unwrap();
        assert_eq!(route_cost(&graph, &[]).unwrap(), 0);
        assert_eq!(route_cost(&graph, &[2]).unwrap(), 0);
    }

    #[test]
    fn sums_each_hop() {
        let graph = build_grid_graph(2, 2, 3).unwrap();
        assert_eq!(route_cost(&graph, &[0, 1, 3, 2]).unwrap(), 9);
    }

    #[test]
    fn rejects_non_adjacent_pairs() {
        let graph = build_grid_graph(2, 2, 1).unwrap();
        let err = route_cost(&graph, &[0, 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidTraversal { from: 0, to: 3 }));
    }
}
