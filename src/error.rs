use thiserror::Error;

use crate::Node;

/// Hard failures of the engine. These are raised before any search work
/// starts; running out of time or memory is reported through
/// [`Outcome`](crate::Outcome) instead.
#[derive(Error, Debug)]
pub enum CoverError {
    #[error("invalid method `{0}`, expected `brute_force` or `greedy`")]
    InvalidMethod(String),

    #[error("edge ({u}, {v}) references a node outside 0..{node_count}")]
    InvalidEdge { u: Node, v: Node, node_count: usize },

    #[error("node {node} is outside 0..{node_count}")]
    InvalidNode { node: Node, node_count: usize },

    #[error("node {0} is listed more than once")]
    DuplicateNode(Node),

    #[error("invalid limits: {0}")]
    InvalidLimits(String),

    #[error("failed to spawn search worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("search worker panicked")]
    WorkerPanicked,
}
