//! Vertex covers of size at most `k`, found by exhaustive subset search or a
//! penalty-driven greedy heuristic, each run under a time and memory budget.
//!
//! ```
//! use bounded_vertex_cover::{Limits, Method, Outcome, VertexCover};
//!
//! let mut engine = VertexCover::new();
//! engine.set_graph(vec![0, 1, 2], vec![(0, 1), (1, 2)]).unwrap();
//! let report = engine.get_cover(1, Method::BruteForce, Limits::default()).unwrap();
//! assert_eq!(report.outcome, Outcome::Found);
//! assert_eq!(report.cover.vertices(), &[1]);
//! ```

use std::sync::Arc;

use tracing::debug;

pub mod bounded;
pub mod brute_force;
pub mod cover;
pub mod error;
pub mod graph;
pub mod greedy;
pub mod input;
pub mod memory;
pub mod validate;

pub use bounded::{CoverReport, Limits, Method, Outcome};
pub use cover::Cover;
pub use error::CoverError;
pub use graph::{AdjacencyMatrix, Graph};
pub use input::parse_input;
pub use validate::PenaltyRule;

use bounded::Request;
use memory::{MemoryGauge, ProcessGauge};

pub type Node = u32;
pub type Edge = (Node, Node);

/// Holds one graph at a time and answers cover requests against it.
#[derive(Clone)]
pub struct VertexCover {
    graph: Arc<Graph>,
    gauge: Arc<dyn MemoryGauge>,
    penalty_rule: PenaltyRule,
}

impl Default for VertexCover {
    fn default() -> Self {
        VertexCover {
            graph: Arc::default(),
            gauge: Arc::new(ProcessGauge),
            penalty_rule: PenaltyRule::default(),
        }
    }
}

impl VertexCover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gauge(mut self, gauge: Arc<dyn MemoryGauge>) -> Self {
        self.gauge = gauge;
        self
    }

    pub fn with_penalty_rule(mut self, penalty_rule: PenaltyRule) -> Self {
        self.penalty_rule = penalty_rule;
        self
    }

    /// Replaces the current graph. On error the previous graph is kept.
    pub fn set_graph(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Result<(), CoverError> {
        let graph = Graph::new(nodes, edges)?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edges().len(),
            "graph replaced"
        );
        self.graph = Arc::new(graph);
        Ok(())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn get_cover(
        &self,
        k: usize,
        method: Method,
        limits: Limits,
    ) -> Result<CoverReport, CoverError> {
        let request = Request {
            method,
            k,
            limits,
            penalty_rule: self.penalty_rule,
        };
        bounded::run_bounded(self.graph.clone(), request, self.gauge.clone())
    }

    /// Like [`VertexCover::get_cover`] with the method given as
    /// `"brute_force"` or `"greedy"`.
    pub fn get_cover_named(
        &self,
        k: usize,
        method: &str,
        limits: Limits,
    ) -> Result<CoverReport, CoverError> {
        let method = method.parse()?;
        self.get_cover(k, method, limits)
    }
}
