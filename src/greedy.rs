use bitvec::prelude::*;
use tracing::{debug, trace};

use crate::bounded::{Budget, Interrupt};
use crate::validate::{validate, PenaltyRule};
use crate::{Cover, Graph, Node};

/// Unchosen node with the strictly highest penalty, lowest index on ties.
fn pick(penalties: &[u32], chosen: &BitSlice) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (node, &penalty) in penalties.iter().enumerate() {
        if chosen[node] {
            continue;
        }
        match best {
            Some((_, max)) if penalty <= max => {}
            _ => best = Some((node, penalty)),
        }
    }
    best.map(|(node, _)| node)
}

/// Adds the highest-penalty node until the cover is valid. Gives up with
/// `None` once the cover holds `k` nodes and is still invalid.
pub fn search(
    graph: &Graph,
    k: usize,
    rule: PenaltyRule,
    budget: &mut Budget,
) -> Result<Option<Cover>, Interrupt> {
    let matrix = graph.matrix();
    let mut chosen = bitvec![0; matrix.size()];
    let mut cover: Vec<Node> = Vec::new();
    loop {
        budget.check()?;
        let check = validate(matrix, &chosen, rule);
        if check.valid {
            debug!(size = cover.len(), "greedy found cover");
            return Ok(Some(Cover::from(cover)));
        }
        if cover.len() >= k {
            debug!(k, "greedy ran out of budget");
            return Ok(None);
        }
        let Some(node) = pick(&check.penalties, &chosen) else {
            return Ok(None);
        };
        trace!(node, penalty = check.penalties[node], "greedy pick");
        chosen.set(node, true);
        cover.push(node as Node);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run(n: u32, edges: Vec<(u32, u32)>, k: usize, rule: PenaltyRule) -> Option<Vec<u32>> {
        let graph = Graph::new((0..n).collect(), edges).unwrap();
        search(&graph, k, rule, &mut Budget::unlimited())
            .unwrap()
            .map(Cover::into_vec)
    }

    #[test]
    fn test_pick_tie_break() {
        let chosen = bitvec![0; 4];
        assert_eq!(pick(&[1, 3, 3, 0], &chosen), Some(1));
        assert_eq!(pick(&[0, 0, 0, 0], &chosen), Some(0));
        let mut chosen = bitvec![0; 2];
        chosen.set(0, true);
        assert_eq!(pick(&[5, 0], &chosen), Some(1));
        chosen.set(1, true);
        assert_eq!(pick(&[5, 0], &chosen), None);
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(run(3, vec![], 0, PenaltyRule::default()), Some(vec![]));
    }

    #[test]
    fn test_single_edge() {
        assert_eq!(run(2, vec![(0, 1)], 1, PenaltyRule::default()), Some(vec![0]));
        assert_eq!(run(2, vec![(0, 1)], 0, PenaltyRule::default()), None);
    }

    #[test]
    fn test_star() {
        let star = vec![(0, 1), (0, 2), (0, 3), (0, 4)];
        assert_eq!(run(5, star, 1, PenaltyRule::default()), Some(vec![0]));
    }

    #[test]
    fn test_triangle() {
        let triangle = vec![(0, 1), (1, 2), (0, 2)];
        assert_eq!(run(3, triangle.clone(), 2, PenaltyRule::default()), Some(vec![0, 1]));
        assert_eq!(run(3, triangle, 1, PenaltyRule::default()), None);
    }

    #[test]
    fn test_never_exceeds_k() {
        // Two disjoint stars joined at the leaves make greedy take the centers first.
        let edges = vec![(0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7), (2, 5)];
        let cover = run(8, edges.clone(), 3, PenaltyRule::default()).unwrap();
        assert!(cover.len() <= 3);
        let graph = Graph::new((0..8).collect(), edges).unwrap();
        assert!(graph.validate_cover(&Cover::from(cover)));
        assert_eq!(run(8, vec![(0, 1), (2, 3), (4, 5)], 2, PenaltyRule::default()), None);
    }

    #[test]
    fn test_multi_edge_rules() {
        // (0, 1) doubled, path 1-2-3.
        let edges = vec![(0, 1), (0, 1), (1, 2), (2, 3)];
        // Both pairs at 1 score: penalties [1, 2, 2, 1], node 1 then node 2.
        assert_eq!(
            run(4, edges.clone(), 2, PenaltyRule::AnyMultiplicity),
            Some(vec![1, 2])
        );
        // The doubled pair is ignored for scoring: penalties [0, 1, 2, 1]
        // pick 2, then only (0, 1) is left and scores nothing, so the lowest
        // unchosen index wins.
        assert_eq!(
            run(4, edges.clone(), 3, PenaltyRule::SingleEdgeOnly),
            Some(vec![2, 0])
        );
        assert_eq!(run(4, edges, 1, PenaltyRule::SingleEdgeOnly), None);
    }
}
