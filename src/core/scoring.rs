use crate::core::{
    distance::{interest_overlap, weighted_distance},
    matrix::ScoreMatrix,
    reasons::match_reasons,
};
use crate::models::{round2, CandidateVector, PairScore, WeightProfile, WeightsError};

/// Multiplier applied when interest overlap exceeds `HOBBY_BONUS_THRESHOLD`
pub const DEFAULT_HOBBY_OVERLAP_BONUS: f64 = 1.2;

/// Overlap above which the hobby bonus applies (strictly greater)
pub const HOBBY_BONUS_THRESHOLD: f64 = 0.5;

pub const MAX_SCORE: f64 = 100.0;

/// Pairwise compatibility scorer
///
/// Scoring formula:
/// score = (1 - distance) * 100
///         * bonus        # when interest overlap > 0.5
/// clamped to [0, 100], rounded to 2 decimals
///
/// The weight profile is validated once in [`CompatibilityScorer::new`]; all
/// scoring operations are total after that.
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    weights: WeightProfile,
    hobby_overlap_bonus: f64,
}

impl CompatibilityScorer {
    pub fn new(weights: WeightProfile, hobby_overlap_bonus: f64) -> Result<Self, WeightsError> {
        weights.validate()?;
        if !hobby_overlap_bonus.is_finite() || hobby_overlap_bonus < 0.0 {
            return Err(WeightsError::InvalidWeight {
                name: "hobby_overlap_bonus",
                value: hobby_overlap_bonus,
            });
        }

        Ok(Self {
            weights,
            hobby_overlap_bonus,
        })
    }

    pub fn with_default_weights() -> Self {
        Self::from_parts(WeightProfile::default(), DEFAULT_HOBBY_OVERLAP_BONUS)
    }

    /// Build without validation, for weights checked when they were configured
    pub(crate) fn from_parts(weights: WeightProfile, hobby_overlap_bonus: f64) -> Self {
        Self {
            weights,
            hobby_overlap_bonus,
        }
    }

    pub fn weights(&self) -> &WeightProfile {
        &self.weights
    }

    pub fn hobby_overlap_bonus(&self) -> f64 {
        self.hobby_overlap_bonus
    }

    /// Jaccard overlap of the two candidates' interests
    pub fn interest_overlap(&self, a: &CandidateVector, b: &CandidateVector) -> f64 {
        interest_overlap(&a.interests, &b.interests)
    }

    /// Weighted normalized distance in [0, 1]
    pub fn distance(&self, a: &CandidateVector, b: &CandidateVector) -> f64 {
        weighted_distance(a, b, &self.weights)
    }

    /// Compatibility score (0-100) and reasons for a pair of distinct candidates
    pub fn score(&self, a: &CandidateVector, b: &CandidateVector) -> PairScore {
        debug_assert_ne!(a.id, b.id, "a candidate cannot be scored against itself");

        let mut score = (1.0 - self.distance(a, b)) * MAX_SCORE;

        if self.interest_overlap(a, b) > HOBBY_BONUS_THRESHOLD {
            score *= self.hobby_overlap_bonus;
        }

        PairScore {
            score: round2(score.min(MAX_SCORE).max(0.0)),
            reasons: match_reasons(a, b),
        }
    }

    /// Score every unordered pair exactly once
    pub fn all_pair_scores(&self, candidates: &[CandidateVector]) -> ScoreMatrix {
        let mut matrix = ScoreMatrix::with_capacity(candidates.len());

        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                matrix.insert(a.id, b.id, self.score(a, b));
            }
        }

        tracing::debug!(
            "Scored {} pairs for {} candidates",
            matrix.len(),
            candidates.len()
        );

        matrix
    }
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Score two candidates with the given weights and the default hobby bonus
///
/// The weights are assumed to have been validated when they were configured.
pub fn score_pair(a: &CandidateVector, b: &CandidateVector, weights: &WeightProfile) -> PairScore {
    CompatibilityScorer::from_parts(*weights, DEFAULT_HOBBY_OVERLAP_BONUS).score(a, b)
}
