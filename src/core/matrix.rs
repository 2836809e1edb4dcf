use crate::models::{CandidateId, PairScore};
use std::collections::HashMap;

/// Pairwise compatibility scores for a candidate set
///
/// Each unordered pair is stored once under its (smaller id, larger id) key,
/// and lookups accept either ordering.
#[derive(Debug, Clone, Default)]
pub struct ScoreMatrix {
    scores: HashMap<(CandidateId, CandidateId), PairScore>,
}

#[inline]
fn pair_key(a: CandidateId, b: CandidateId) -> (CandidateId, CandidateId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ScoreMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(candidates: usize) -> Self {
        Self {
            scores: HashMap::with_capacity(candidates * candidates.saturating_sub(1) / 2),
        }
    }

    /// Store the score for an unordered pair, replacing any previous entry
    pub fn insert(&mut self, a: CandidateId, b: CandidateId, score: PairScore) {
        self.scores.insert(pair_key(a, b), score);
    }

    pub fn get(&self, a: CandidateId, b: CandidateId) -> Option<&PairScore> {
        self.scores.get(&pair_key(a, b))
    }

    /// Numeric score for a pair, if present
    #[inline]
    pub fn value(&self, a: CandidateId, b: CandidateId) -> Option<f64> {
        self.get(a, b).map(|s| s.score)
    }

    /// Number of unordered pairs stored
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
