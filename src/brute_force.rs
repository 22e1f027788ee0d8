use bitvec::prelude::*;
use smallvec::SmallVec;
use tracing::debug;

use crate::bounded::{Budget, Interrupt};
use crate::{Cover, Graph};

type Positions = SmallVec<[usize; 16]>;

/// Walks all subsets of `0..len` with at most `max_size` elements, smallest
/// first, each size in lexicographic order.
#[derive(Debug, Clone)]
pub struct Subsets {
    len: usize,
    max_size: usize,
    current: Option<Positions>,
}

impl Subsets {
    pub fn new(len: usize, max_size: usize) -> Self {
        Subsets {
            len,
            max_size: max_size.min(len),
            current: Some(Positions::new()),
        }
    }

    fn advance(&self, positions: &Positions) -> Option<Positions> {
        let size = positions.len();
        let mut next = positions.clone();
        // Rightmost position that can still move right.
        if let Some(i) = (0..size).rev().find(|&i| next[i] < self.len - size + i) {
            next[i] += 1;
            for j in i + 1..size {
                next[j] = next[j - 1] + 1;
            }
            return Some(next);
        }
        if size < self.max_size {
            return Some((0..size + 1).collect());
        }
        None
    }
}

impl Iterator for Subsets {
    type Item = Positions;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        self.current = self.advance(&current);
        Some(current)
    }
}

/// Returns the first subset of the node list, of size at most `k`, that
/// covers every edge. `None` when no such subset exists.
pub fn search(graph: &Graph, k: usize, budget: &mut Budget) -> Result<Option<Cover>, Interrupt> {
    let nodes = graph.nodes();
    let mut selected = bitvec![0; graph.node_count()];
    for positions in Subsets::new(nodes.len(), k) {
        budget.check()?;
        for &p in &positions {
            selected.set(nodes[p] as usize, true);
        }
        if graph.covered_by(&selected) {
            debug!(size = positions.len(), "brute force found cover");
            return Ok(Some(Cover::from(
                positions.iter().map(|&p| nodes[p]).collect::<Vec<_>>(),
            )));
        }
        for &p in &positions {
            selected.set(nodes[p] as usize, false);
        }
    }
    debug!(k, "brute force exhausted subsets");
    Ok(None)
}
