use serde::{Deserialize, Serialize};
use crate::models::domain::{CandidateId, MatchSummary, MatchedPair, PartialMatch, SearchStats};

/// Response for the pair scoring endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePairResponse {
    #[serde(rename = "firstId")]
    pub first_id: CandidateId,
    #[serde(rename = "secondId")]
    pub second_id: CandidateId,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Response for the optimal matching endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptimalResponse {
    pub run_id: String,
    pub matches: Vec<MatchedPair>,
    pub unmatched: Vec<CandidateId>,
    pub total_score: f64,
    pub average_score: f64,
    pub nodes_explored: usize,
    pub stats: SearchStats,
    pub summary: MatchSummary,
}

/// Returned when a search stops before proving an optimal pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFailureResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(rename = "nodesExplored")]
    pub nodes_explored: usize,
    pub best: Option<PartialMatch>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
