use bitvec::prelude::*;

use crate::AdjacencyMatrix;

/// Which uncovered node pairs contribute to the penalty vector.
///
/// Validity never depends on the rule: a pair joined by any number of edges
/// must be covered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PenaltyRule {
    /// Every uncovered pair scores once, whatever its multiplicity.
    #[default]
    AnyMultiplicity,
    /// Only pairs joined by exactly one edge score. Uncovered parallel edges
    /// still make the cover invalid but never attract the greedy choice.
    ///
    /// This keeps the single-edge filter for scoring only. Filtering validity
    /// the same way would let greedy return covers that miss parallel edges,
    /// so validity deliberately counts every pair with at least one edge.
    SingleEdgeOnly,
}

impl PenaltyRule {
    #[inline]
    fn scores(self, count: u32) -> bool {
        match self {
            PenaltyRule::AnyMultiplicity => count >= 1,
            PenaltyRule::SingleEdgeOnly => count == 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverCheck {
    pub valid: bool,
    /// Uncovered incident pairs per node.
    pub penalties: Vec<u32>,
}

/// Scans every pair `u <= v` once. `candidate` is a membership mask over
/// `0..matrix.size()`.
pub fn validate(matrix: &AdjacencyMatrix, candidate: &BitSlice, rule: PenaltyRule) -> CoverCheck {
    let size = matrix.size();
    debug_assert_eq!(candidate.len(), size);
    let mut valid = true;
    let mut penalties = vec![0u32; size];
    for u in 0..size {
        if candidate[u] {
            continue;
        }
        for v in u..size {
            let count = matrix.get(u, v);
            if count == 0 || candidate[v] {
                continue;
            }
            valid = false;
            if rule.scores(count) {
                penalties[u] += 1;
                penalties[v] += 1;
            }
        }
    }
    CoverCheck { valid, penalties }
}

#[cfg(test)]
mod test {
    use super::*;

    fn mask(size: usize, chosen: &[usize]) -> BitVec {
        let mut bits = bitvec![0; size];
        for &c in chosen {
            bits.set(c, true);
        }
        bits
    }

    #[test]
    fn test_empty_candidate_on_path() {
        let matrix = AdjacencyMatrix::build(3, &[(0, 1), (1, 2)]).unwrap();
        let check = validate(&matrix, &mask(3, &[]), PenaltyRule::default());
        assert!(!check.valid);
        assert_eq!(check.penalties, vec![1, 2, 1]);
    }

    #[test]
    fn test_valid_candidate_has_no_penalties() {
        let matrix = AdjacencyMatrix::build(3, &[(0, 1), (1, 2)]).unwrap();
        let check = validate(&matrix, &mask(3, &[1]), PenaltyRule::default());
        assert!(check.valid);
        assert_eq!(check.penalties, vec![0, 0, 0]);
    }

    #[test]
    fn test_edgeless_graph_is_valid() {
        let matrix = AdjacencyMatrix::build(4, &[]).unwrap();
        let check = validate(&matrix, &mask(4, &[]), PenaltyRule::default());
        assert!(check.valid);
    }

    #[test]
    fn test_multi_edge_penalty_rules() {
        // (0, 1) is doubled, (1, 2) is single.
        let matrix = AdjacencyMatrix::build(3, &[(0, 1), (0, 1), (1, 2)]).unwrap();
        let empty = mask(3, &[]);

        let any = validate(&matrix, &empty, PenaltyRule::AnyMultiplicity);
        assert!(!any.valid);
        assert_eq!(any.penalties, vec![1, 2, 1]);

        let single = validate(&matrix, &empty, PenaltyRule::SingleEdgeOnly);
        assert!(!single.valid);
        assert_eq!(single.penalties, vec![0, 1, 1]);

        // Only the doubled edge is left: invalid under both rules, silent
        // under the single-edge rule.
        let two = mask(3, &[2]);
        let single = validate(&matrix, &two, PenaltyRule::SingleEdgeOnly);
        assert!(!single.valid);
        assert_eq!(single.penalties, vec![0, 0, 0]);
    }

    #[test]
    fn test_self_loop() {
        let matrix = AdjacencyMatrix::build(2, &[(1, 1)]).unwrap();
        let check = validate(&matrix, &mask(2, &[]), PenaltyRule::AnyMultiplicity);
        assert!(!check.valid);
        assert_eq!(check.penalties, vec![0, 2]);
        // A loop counts 2 on the diagonal, so the single-edge rule ignores it.
        let check = validate(&matrix, &mask(2, &[]), PenaltyRule::SingleEdgeOnly);
        assert_eq!(check.penalties, vec![0, 0]);
    }
}
