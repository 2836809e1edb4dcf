use crate::models::{CandidateVector, WeightProfile};
use std::collections::BTreeSet;

/// Range spans used to normalize each attribute difference into [0, 1]
pub const SLEEP_TIME_SPAN: f64 = 2.0;
pub const STUDY_TIME_SPAN: f64 = 3.0;
pub const CLEANLINESS_SPAN: f64 = 4.0;
pub const NOISE_TOLERANCE_SPAN: f64 = 4.0;
pub const PERSONALITY_SPAN: f64 = 2.0;

/// Overlap reported when neither candidate lists any interest
pub const NEUTRAL_OVERLAP: f64 = 0.5;

/// Jaccard index of two interest sets
///
/// # Returns
/// * `0.5` when both sets are empty (nothing to compare)
/// * `0.0` when exactly one set is empty
/// * `|a ∩ b| / |a ∪ b|` otherwise
pub fn interest_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return NEUTRAL_OVERLAP,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// Absolute difference of two ordinal values divided by the attribute span
#[inline]
fn normalized_diff(a: u8, b: u8, span: f64) -> f64 {
    (a as f64 - b as f64).abs() / span
}

/// Weighted normalized distance between two candidates
///
/// Every attribute term lies in [0, 1] before weighting, and the hobby term is
/// `1 - interest_overlap`, so the result stays in [0, 1] for weights summing
/// to 1.0 and in-range attributes.
pub fn weighted_distance(a: &CandidateVector, b: &CandidateVector, weights: &WeightProfile) -> f64 {
    let sleep = normalized_diff(a.sleep_time, b.sleep_time, SLEEP_TIME_SPAN);
    let study = normalized_diff(a.study_time, b.study_time, STUDY_TIME_SPAN);
    let clean = normalized_diff(a.cleanliness, b.cleanliness, CLEANLINESS_SPAN);
    let noise = normalized_diff(a.noise_tolerance, b.noise_tolerance, NOISE_TOLERANCE_SPAN);
    let personality = normalized_diff(a.personality, b.personality, PERSONALITY_SPAN);
    let hobbies = 1.0 - interest_overlap(&a.interests, &b.interests);

    weights.sleep_time * sleep
        + weights.study_time * study
        + weights.cleanliness * clean
        + weights.noise_tolerance * noise
        + weights.personality * personality
        + weights.hobbies * hobbies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::normalize_interests;

    fn tags(list: &[&str]) -> BTreeSet<String> {
        normalize_interests(list.iter())
    }

    #[test]
    fn test_overlap_both_empty_is_neutral() {
        assert_eq!(interest_overlap(&tags(&[]), &tags(&[])), 0.5);
    }

    #[test]
    fn test_overlap_one_empty_is_zero() {
        assert_eq!(interest_overlap(&tags(&["chess"]), &tags(&[])), 0.0);
        assert_eq!(interest_overlap(&tags(&[]), &tags(&["chess"])), 0.0);
    }

    #[test]
    fn test_overlap_jaccard() {
        let a = tags(&["chess", "music", "hiking"]);
        let b = tags(&["music", "hiking", "cooking", "films"]);
        // 2 shared out of 5 distinct
        assert!((interest_overlap(&a, &b) - 0.4).abs() < 1e-12);
        assert_eq!(interest_overlap(&a, &a), 1.0);
    }

    #[test]
    fn test_distance_extremes() {
        let weights = WeightProfile::default();
        let a = CandidateVector::new(1, 0, 0, 1, 1, 0, ["chess"]);
        let b = CandidateVector::new(2, 2, 3, 5, 5, 2, ["music"]);

        assert!(weighted_distance(&a, &a, &weights).abs() < 1e-12);
        assert!((weighted_distance(&a, &b, &weights) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_partial() {
        let weights = WeightProfile::default();
        let a = CandidateVector::new(1, 0, 0, 3, 3, 1, Vec::<String>::new());
        let b = CandidateVector::new(2, 1, 0, 3, 3, 1, Vec::<String>::new());

        // sleep: 0.25 * 0.5, hobbies: 0.10 * (1 - 0.5)
        let expected = 0.125 + 0.05;
        assert!((weighted_distance(&a, &b, &weights) - expected).abs() < 1e-12);
    }
}
