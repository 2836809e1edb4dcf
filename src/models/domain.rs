use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Caller-assigned candidate identifier, unique within one search invocation
pub type CandidateId = u64;

/// Lifestyle feature vector for a person looking for a roommate
///
/// Attribute ranges:
/// - `sleep_time`: 0 early, 1 moderate, 2 late
/// - `study_time`: 0 morning, 1 afternoon, 2 evening, 3 night
/// - `cleanliness`, `noise_tolerance`: 1-5
/// - `personality`: 0 introvert, 1 ambivert, 2 extrovert
///
/// Values outside these ranges are not rejected here; the host is expected
/// to validate records before handing them to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateVector {
    pub id: CandidateId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "sleepTime")]
    pub sleep_time: u8,
    #[serde(rename = "studyTime")]
    pub study_time: u8,
    pub cleanliness: u8,
    #[serde(rename = "noiseTolerance")]
    pub noise_tolerance: u8,
    pub personality: u8,
    #[serde(default, deserialize_with = "deserialize_interests")]
    pub interests: BTreeSet<String>,
}

impl CandidateVector {
    pub fn new<I, S>(
        id: CandidateId,
        sleep_time: u8,
        study_time: u8,
        cleanliness: u8,
        noise_tolerance: u8,
        personality: u8,
        interests: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id,
            name: None,
            sleep_time,
            study_time,
            cleanliness,
            noise_tolerance,
            personality,
            interests: normalize_interests(interests),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Normalize interest tags: trimmed, lowercased, empty tags dropped,
/// duplicates collapsed.
pub fn normalize_interests<I, S>(interests: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    interests
        .into_iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Split a comma-separated hobby string (as stored on candidate records)
/// into normalized interest tags.
pub fn parse_interests(raw: &str) -> BTreeSet<String> {
    normalize_interests(raw.split(','))
}

fn deserialize_interests<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_interests(raw))
}

/// Errors raised when a weight profile is rejected
#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weight for {name} must be non-negative and finite, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("weights must sum to 1.0, got {sum}")]
    BadSum { sum: f64 },
}

/// Tolerance used when checking that weights sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-attribute weights for the compatibility distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub sleep_time: f64,
    pub study_time: f64,
    pub cleanliness: f64,
    pub noise_tolerance: f64,
    pub personality: f64,
    pub hobbies: f64,
}

impl WeightProfile {
    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("sleep_time", self.sleep_time),
            ("study_time", self.study_time),
            ("cleanliness", self.cleanliness),
            ("noise_tolerance", self.noise_tolerance),
            ("personality", self.personality),
            ("hobbies", self.hobbies),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }

    /// Check that every weight is non-negative and that they sum to 1.0
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in self.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::InvalidWeight { name, value });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum { sum });
        }

        Ok(())
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self {
            sleep_time: 0.25,
            study_time: 0.20,
            cleanliness: 0.20,
            noise_tolerance: 0.15,
            personality: 0.10,
            hobbies: 0.10,
        }
    }
}

/// Compatibility of two candidates: a 0-100 score plus the reasons behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// One roommate pair in a final assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    #[serde(rename = "firstId")]
    pub first: CandidateId,
    #[serde(rename = "secondId")]
    pub second: CandidateId,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Search diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// States popped from the frontier
    pub nodes_explored: usize,
    pub states_generated: usize,
    pub max_frontier: usize,
}

/// Outcome of a completed optimal matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matches: Vec<MatchedPair>,
    pub unmatched: Vec<CandidateId>,
    pub total_score: f64,
    pub average_score: f64,
    pub stats: SearchStats,
}

impl MatchResult {
    /// Result for inputs too small to pair; every candidate is left unmatched
    pub fn empty(unmatched: Vec<CandidateId>) -> Self {
        Self {
            matches: Vec::new(),
            unmatched,
            total_score: 0.0,
            average_score: 0.0,
            stats: SearchStats::default(),
        }
    }

    pub fn nodes_explored(&self) -> usize {
        self.stats.nodes_explored
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary::from_pairs(&self.matches)
    }
}

/// Aggregate score statistics over a set of pairs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub total_pairs: usize,
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
}

impl MatchSummary {
    pub fn from_pairs(pairs: &[MatchedPair]) -> Self {
        if pairs.is_empty() {
            return Self {
                total_pairs: 0,
                average_score: 0.0,
                min_score: 0.0,
                max_score: 0.0,
            };
        }

        let total: f64 = pairs.iter().map(|p| p.score).sum();
        let min = pairs.iter().map(|p| p.score).fold(f64::INFINITY, f64::min);
        let max = pairs.iter().map(|p| p.score).fold(f64::NEG_INFINITY, f64::max);

        Self {
            total_pairs: pairs.len(),
            average_score: round2(total / pairs.len() as f64),
            min_score: round2(min),
            max_score: round2(max),
        }
    }
}

/// Best assignment known when a search stops early
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialMatch {
    pub pairs: Vec<MatchedPair>,
    pub unmatched: Vec<CandidateId>,
    pub total_score: f64,
    /// True when every searched candidate is paired
    pub complete: bool,
}

/// Round to two decimal places
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        let weights = WeightProfile::default();
        assert!(weights.validate().is_ok());
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_weights_bad_sum_rejected() {
        let weights = WeightProfile {
            hobbies: 0.5,
            ..WeightProfile::default()
        };
        assert!(matches!(weights.validate(), Err(WeightsError::BadSum { .. })));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = WeightProfile {
            sleep_time: 0.45,
            hobbies: -0.10,
            ..WeightProfile::default()
        };
        assert_eq!(
            weights.validate(),
            Err(WeightsError::InvalidWeight { name: "hobbies", value: -0.10 })
        );
    }

    #[test]
    fn test_interest_normalization() {
        let candidate = CandidateVector::new(1, 0, 0, 3, 3, 1, [" Reading", "reading", "GAMING", ""]);
        let tags: Vec<_> = candidate.interests.iter().cloned().collect();
        assert_eq!(tags, vec!["gaming", "reading"]);
    }

    #[test]
    fn test_parse_interests() {
        let tags = parse_interests("Hiking, Music ,  ,music");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("hiking"));
        assert!(tags.contains("music"));
    }

    #[test]
    fn test_deserialize_normalizes_interests() {
        let json = r#"{
            "id": 7,
            "sleepTime": 1,
            "studyTime": 2,
            "cleanliness": 4,
            "noiseTolerance": 2,
            "personality": 0,
            "interests": ["Chess", "chess ", "Cooking"]
        }"#;
        let candidate: CandidateVector = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.interests.len(), 2);
        assert!(candidate.interests.contains("chess"));
        assert_eq!(candidate.name, None);
    }

    #[test]
    fn test_summary_statistics() {
        let pairs = vec![
            MatchedPair { first: 1, second: 2, score: 80.0, reasons: vec![] },
            MatchedPair { first: 3, second: 4, score: 60.5, reasons: vec![] },
        ];
        let summary = MatchSummary::from_pairs(&pairs);
        assert_eq!(summary.total_pairs, 2);
        assert_eq!(summary.average_score, 70.25);
        assert_eq!(summary.min_score, 60.5);
        assert_eq!(summary.max_score, 80.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666), 66.67);
        assert_eq!(round2(100.0), 100.0);
    }
}
