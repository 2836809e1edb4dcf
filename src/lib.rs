//! Roommate Match - optimal roommate pairing engine
//!
//! This library scores pairwise lifestyle compatibility between candidates and
//! finds the pairing of a whole group that maximizes total compatibility using
//! an informed best-first search.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use self::core::{
    match_optimal, score_pair, CompatibilityScorer, OptimalMatcher, ScoreMatrix, SearchError,
    SearchOptions,
};
pub use models::{CandidateId, CandidateVector, MatchResult, MatchedPair, PairScore, WeightProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let a = CandidateVector::new(1, 1, 1, 3, 3, 1, ["music"]);
        let b = CandidateVector::new(2, 1, 1, 3, 3, 1, ["music"]);

        let pair = score_pair(&a, &b, &WeightProfile::default());
        assert_eq!(pair.score, 100.0);

        let result = match_optimal(&[a, b], &WeightProfile::default(), SearchOptions::default()).unwrap();
        assert_eq!(result.matches.len(), 1);
    }
}
