use bitvec::prelude::*;
use tracing::debug;

use crate::{Cover, CoverError, Edge, Node};

/// Symmetric N×N table of edge multiplicities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    size: usize,
    counts: Vec<u32>,
}

impl AdjacencyMatrix {
    /// Counts every edge into both (u, v) and (v, u). Parallel edges and
    /// self-loops accumulate, a self-loop adds 2 to its diagonal cell.
    pub fn build(node_count: usize, edges: &[Edge]) -> Result<Self, CoverError> {
        let mut counts = vec![0u32; node_count * node_count];
        for &(u, v) in edges {
            if u as usize >= node_count || v as usize >= node_count {
                return Err(CoverError::InvalidEdge { u, v, node_count });
            }
            let (u, v) = (u as usize, v as usize);
            counts[u * node_count + v] += 1;
            counts[v * node_count + u] += 1;
        }
        Ok(AdjacencyMatrix {
            size: node_count,
            counts,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, u: usize, v: usize) -> u32 {
        self.counts[u * self.size + v]
    }

    pub fn degree(&self, u: usize) -> u32 {
        self.counts[u * self.size..(u + 1) * self.size].iter().sum()
    }
}

/// A graph over the node index space `0..N`. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    matrix: AdjacencyMatrix,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, CoverError> {
        let node_count = nodes.len();
        let mut seen = bitvec![0; node_count];
        for &node in &nodes {
            if node as usize >= node_count {
                return Err(CoverError::InvalidNode { node, node_count });
            }
            if seen.replace(node as usize, true) {
                return Err(CoverError::DuplicateNode(node));
            }
        }
        let matrix = AdjacencyMatrix::build(node_count, &edges)?;
        debug!(nodes = node_count, edges = edges.len(), "built adjacency matrix");
        Ok(Graph {
            nodes,
            edges,
            matrix,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn matrix(&self) -> &AdjacencyMatrix {
        &self.matrix
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn validate_cover(&self, cover: &Cover) -> bool {
        for (start, end) in &self.edges {
            if !(cover.contains(*start) || cover.contains(*end)) {
                debug!("edge ({start}, {end}) not covered");
                return false;
            }
        }
        true
    }

    /// Same check as [`Graph::validate_cover`] against a membership mask.
    pub(crate) fn covered_by(&self, selected: &BitSlice) -> bool {
        self.edges
            .iter()
            .all(|&(u, v)| selected[u as usize] || selected[v as usize])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_matrix_is_symmetric() {
        let matrix = AdjacencyMatrix::build(4, &[(0, 1), (2, 1), (3, 0)]).unwrap();
        for u in 0..4 {
            for v in 0..4 {
                assert_eq!(matrix.get(u, v), matrix.get(v, u));
            }
        }
        assert_eq!(matrix.get(1, 2), 1);
        assert_eq!(matrix.get(2, 3), 0);
        assert_eq!(matrix.degree(0), 2);
    }

    #[test]
    fn test_parallel_edges_and_loops_accumulate() {
        let matrix = AdjacencyMatrix::build(3, &[(0, 1), (1, 0), (0, 1), (2, 2)]).unwrap();
        assert_eq!(matrix.get(0, 1), 3);
        assert_eq!(matrix.get(1, 0), 3);
        assert_eq!(matrix.get(2, 2), 2);
    }

    #[test]
    fn test_edge_out_of_range() {
        let err = AdjacencyMatrix::build(3, &[(0, 1), (1, 3)]).unwrap_err();
        assert!(matches!(
            err,
            CoverError::InvalidEdge {
                u: 1,
                v: 3,
                node_count: 3
            }
        ));
    }

    #[test]
    fn test_invalid_nodes() {
        assert!(matches!(
            Graph::new(vec![0, 1, 5], vec![]),
            Err(CoverError::InvalidNode { node: 5, .. })
        ));
        assert!(matches!(
            Graph::new(vec![0, 1, 1], vec![]),
            Err(CoverError::DuplicateNode(1))
        ));
    }

    #[test]
    fn test_full_cover() {
        let graph = Graph::new(vec![0, 1, 2], vec![(0, 1), (1, 2), (0, 2)]).unwrap();
        assert!(!graph.validate_cover(&Cover::default()));
        assert!(graph.validate_cover(&Cover::from(vec![0, 1, 2])));
        assert!(graph.validate_cover(&Cover::from(vec![0, 2])));
        assert!(!graph.validate_cover(&Cover::from(vec![1])));
    }

    #[test]
    fn test_self_loop_needs_its_node() {
        let graph = Graph::new(vec![0, 1], vec![(1, 1)]).unwrap();
        assert!(!graph.covered_by(&bitvec![0, 0]));
        assert!(graph.covered_by(&bitvec![0, 1]));
    }
}
