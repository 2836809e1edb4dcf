//! Search-space nodes for optimal pairing.
//!
//! A [`MatchingState`] is a partial assignment: the pairs formed so far, the
//! candidates still waiting for a partner, the accumulated score and an
//! optimistic estimate of what the remainder can still add. States are never
//! mutated; expanding one produces fresh successors.
//!
//! Identity is carried by [`StateKey`], which holds only sorted candidate ids.
//! Reasons never take part in equality or hashing.

use crate::core::matrix::ScoreMatrix;
use crate::models::CandidateId;
use std::cmp::Ordering;

/// A pair formed during search. `first` is always the smaller id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormedPair {
    pub first: CandidateId,
    pub second: CandidateId,
    pub score: f64,
}

/// Canonical, order-independent identity of a state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    pairs: Vec<(CandidateId, CandidateId)>,
    unmatched: Vec<CandidateId>,
}

/// Optimistic bound on the score still obtainable from `unmatched`
///
/// Each candidate contributes the best score it could get with any other
/// unmatched candidate; the sum is halved because every real pair is seen
/// from both ends. Dropping the one-partner-per-candidate constraint can only
/// raise the total, so the bound never underestimates an exact pairing.
///
/// Returned negated, since the search minimizes cost. Pairs missing from the
/// matrix are ignored.
pub fn heuristic(unmatched: &[CandidateId], matrix: &ScoreMatrix) -> f64 {
    if unmatched.len() < 2 {
        return 0.0;
    }

    let best_sum: f64 = unmatched
        .iter()
        .map(|&id| {
            unmatched
                .iter()
                .filter(|&&other| other != id)
                .filter_map(|&other| matrix.value(id, other))
                .fold(0.0, f64::max)
        })
        .sum();

    -(best_sum / 2.0)
}

/// A node in the pairing search space
#[derive(Debug, Clone)]
pub struct MatchingState {
    pairs: Vec<FormedPair>,
    unmatched: Vec<CandidateId>,
    total_score: f64,
    heuristic: f64,
}

impl MatchingState {
    /// Root state: nothing paired, every id unmatched
    pub fn initial(mut ids: Vec<CandidateId>, matrix: &ScoreMatrix) -> Self {
        ids.sort_unstable();
        let heuristic = heuristic(&ids, matrix);

        Self {
            pairs: Vec::new(),
            unmatched: ids,
            total_score: 0.0,
            heuristic,
        }
    }

    pub fn pairs(&self) -> &[FormedPair] {
        &self.pairs
    }

    /// Unmatched ids in ascending order
    pub fn unmatched(&self) -> &[CandidateId] {
        &self.unmatched
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn heuristic(&self) -> f64 {
        self.heuristic
    }

    /// Accumulated cost (g): negated score so far
    pub fn cost(&self) -> f64 {
        -self.total_score
    }

    /// Frontier priority (f = g + h); lower is better
    pub fn priority(&self) -> f64 {
        self.cost() + self.heuristic
    }

    pub fn is_goal(&self) -> bool {
        self.unmatched.is_empty()
    }

    pub fn key(&self) -> StateKey {
        let mut pairs: Vec<_> = self.pairs.iter().map(|p| (p.first, p.second)).collect();
        pairs.sort_unstable();

        StateKey {
            pairs,
            unmatched: self.unmatched.clone(),
        }
    }

    /// Pair the anchor (smallest unmatched id) with each remaining candidate
    ///
    /// Returns the offending pair when the matrix has no score for it.
    pub fn successors(
        &self,
        matrix: &ScoreMatrix,
    ) -> Result<Vec<MatchingState>, (CandidateId, CandidateId)> {
        let Some((&anchor, rest)) = self.unmatched.split_first() else {
            return Ok(Vec::new());
        };

        let mut successors = Vec::with_capacity(rest.len());

        for &partner in rest {
            let score = matrix.value(anchor, partner).ok_or((anchor, partner))?;

            let unmatched: Vec<CandidateId> =
                rest.iter().copied().filter(|&id| id != partner).collect();

            let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
            pairs.extend_from_slice(&self.pairs);
            pairs.push(FormedPair {
                first: anchor,
                second: partner,
                score,
            });

            let heuristic = heuristic(&unmatched, matrix);

            successors.push(MatchingState {
                pairs,
                unmatched,
                total_score: self.total_score + score,
                heuristic,
            });
        }

        Ok(successors)
    }

    /// Frontier order: priority, then sorted unmatched ids, then pair ids
    pub fn frontier_cmp(&self, other: &Self) -> Ordering {
        self.priority()
            .total_cmp(&other.priority())
            .then_with(|| self.unmatched.cmp(&other.unmatched))
            .then_with(|| {
                let ours = self.pairs.iter().map(|p| (p.first, p.second));
                let theirs = other.pairs.iter().map(|p| (p.first, p.second));
                ours.cmp(theirs)
            })
    }

    /// Whether this state is a better fallback than `other`: more pairs
    /// formed, then a higher accumulated score
    pub fn is_better_partial_than(&self, other: &Self) -> bool {
        self.pairs
            .len()
            .cmp(&other.pairs.len())
            .then_with(|| self.total_score.total_cmp(&other.total_score))
            == Ordering::Greater
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PairScore;

    fn matrix_from(entries: &[(CandidateId, CandidateId, f64)]) -> ScoreMatrix {
        let mut matrix = ScoreMatrix::new();
        for &(a, b, score) in entries {
            matrix.insert(a, b, PairScore { score, reasons: vec![] });
        }
        matrix
    }

    fn four_matrix() -> ScoreMatrix {
        matrix_from(&[
            (1, 2, 90.0),
            (3, 4, 90.0),
            (1, 3, 10.0),
            (1, 4, 10.0),
            (2, 3, 10.0),
            (2, 4, 10.0),
        ])
    }

    #[test]
    fn test_heuristic_small_sets() {
        let matrix = four_matrix();
        assert_eq!(heuristic(&[], &matrix), 0.0);
        assert_eq!(heuristic(&[1], &matrix), 0.0);
        assert_eq!(heuristic(&[1, 2], &matrix), -90.0);
    }

    #[test]
    fn test_heuristic_sums_best_partners() {
        let matrix = four_matrix();
        // every candidate's best partner scores 90: (4 * 90) / 2
        assert_eq!(heuristic(&[1, 2, 3, 4], &matrix), -180.0);
        // 1 -> 90 (with 2), 2 -> 90, 3 -> 10: 190 / 2
        assert_eq!(heuristic(&[1, 2, 3], &matrix), -95.0);
    }

    #[test]
    fn test_initial_state() {
        let matrix = four_matrix();
        let state = MatchingState::initial(vec![4, 2, 3, 1], &matrix);

        assert_eq!(state.unmatched(), &[1, 2, 3, 4]);
        assert!(state.pairs().is_empty());
        assert_eq!(state.cost(), 0.0);
        assert_eq!(state.priority(), -180.0);
        assert!(!state.is_goal());
    }

    #[test]
    fn test_successors_anchor_smallest_id() {
        let matrix = four_matrix();
        let state = MatchingState::initial(vec![3, 1, 4, 2], &matrix);
        let successors = state.successors(&matrix).unwrap();

        assert_eq!(successors.len(), 3);
        for (successor, partner) in successors.iter().zip([2, 3, 4]) {
            assert_eq!(successor.pairs()[0].first, 1);
            assert_eq!(successor.pairs()[0].second, partner);
            assert_eq!(successor.unmatched().len(), 2);
        }

        assert_eq!(successors[0].total_score(), 90.0);
        assert_eq!(successors[0].heuristic(), -90.0);
        assert_eq!(successors[0].priority(), -180.0);
        assert_eq!(successors[1].priority(), -20.0);

        let goals = successors[0].successors(&matrix).unwrap();
        assert_eq!(goals.len(), 1);
        assert!(goals[0].is_goal());
        assert_eq!(goals[0].total_score(), 180.0);
        assert!(goals[0].successors(&matrix).unwrap().is_empty());
    }

    #[test]
    fn test_successors_report_missing_pair() {
        let matrix = matrix_from(&[(1, 2, 50.0)]);
        let state = MatchingState::initial(vec![1, 2, 3, 4], &matrix);

        assert_eq!(state.successors(&matrix).unwrap_err(), (1, 3));
    }

    #[test]
    fn test_key_ignores_pair_order() {
        let a = MatchingState {
            pairs: vec![
                FormedPair { first: 1, second: 2, score: 10.0 },
                FormedPair { first: 3, second: 4, score: 20.0 },
            ],
            unmatched: vec![5, 6],
            total_score: 30.0,
            heuristic: 0.0,
        };
        let b = MatchingState {
            pairs: vec![
                FormedPair { first: 3, second: 4, score: 20.0 },
                FormedPair { first: 1, second: 2, score: 10.0 },
            ],
            ..a.clone()
        };

        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_frontier_tie_break_on_unmatched() {
        let matrix = matrix_from(&[
            (1, 2, 50.0),
            (1, 3, 50.0),
            (2, 3, 50.0),
            (1, 4, 50.0),
            (2, 4, 50.0),
            (3, 4, 50.0),
        ]);
        let root = MatchingState::initial(vec![1, 2, 3, 4], &matrix);
        let successors = root.successors(&matrix).unwrap();

        // equal priorities: (1,4) leaves [2,3], which sorts first
        assert_eq!(successors[2].frontier_cmp(&successors[0]), Ordering::Less);
        assert_eq!(successors[1].frontier_cmp(&successors[0]), Ordering::Less);
        assert_eq!(successors[0].frontier_cmp(&successors[0]), Ordering::Equal);
    }

    #[test]
    fn test_better_partial() {
        let matrix = four_matrix();
        let root = MatchingState::initial(vec![1, 2, 3, 4], &matrix);
        let successors = root.successors(&matrix).unwrap();

        assert!(successors[1].is_better_partial_than(&root));
        assert!(successors[0].is_better_partial_than(&successors[1]));
        assert!(!successors[1].is_better_partial_than(&successors[0]));
    }
}
