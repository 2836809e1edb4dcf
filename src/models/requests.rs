use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{normalize_interests, parse_interests, CandidateId, CandidateVector};

/// Candidate record as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CandidateInput {
    pub id: CandidateId,
    #[serde(default)]
    pub name: Option<String>,
    #[validate(range(max = 2))]
    #[serde(alias = "sleep_time", rename = "sleepTime")]
    pub sleep_time: u8,
    #[validate(range(max = 3))]
    #[serde(alias = "study_time", rename = "studyTime")]
    pub study_time: u8,
    #[validate(range(min = 1, max = 5))]
    pub cleanliness: u8,
    #[validate(range(min = 1, max = 5))]
    #[serde(alias = "noise_tolerance", rename = "noiseTolerance")]
    pub noise_tolerance: u8,
    #[validate(range(max = 2))]
    pub personality: u8,
    #[serde(default)]
    pub interests: Vec<String>,
    /// Comma-separated hobbies, as stored on candidate records
    #[serde(default)]
    pub hobbies: Option<String>,
}

impl From<CandidateInput> for CandidateVector {
    fn from(input: CandidateInput) -> Self {
        let mut interests = normalize_interests(&input.interests);
        if let Some(raw) = &input.hobbies {
            interests.extend(parse_interests(raw));
        }

        CandidateVector {
            id: input.id,
            name: input.name,
            sleep_time: input.sleep_time,
            study_time: input.study_time,
            cleanliness: input.cleanliness,
            noise_tolerance: input.noise_tolerance,
            personality: input.personality,
            interests,
        }
    }
}

/// Request to score a single pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_distinct_pair"))]
pub struct ScorePairRequest {
    #[validate(nested)]
    #[serde(alias = "candidate_a", rename = "candidateA")]
    pub candidate_a: CandidateInput,
    #[validate(nested)]
    #[serde(alias = "candidate_b", rename = "candidateB")]
    pub candidate_b: CandidateInput,
}

fn validate_distinct_pair(req: &ScorePairRequest) -> Result<(), ValidationError> {
    if req.candidate_a.id == req.candidate_b.id {
        return Err(ValidationError::new("candidates_must_differ"));
    }
    Ok(())
}

/// Request to run optimal matching over a batch of candidates
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchOptimalRequest {
    #[validate(nested)]
    pub candidates: Vec<CandidateInput>,
    #[validate(range(min = 1))]
    #[serde(alias = "max_nodes", rename = "maxNodes", default)]
    pub max_nodes: Option<usize>,
    #[validate(range(min = 1))]
    #[serde(alias = "timeout_ms", rename = "timeoutMs", default)]
    pub timeout_ms: Option<u64>,
}
