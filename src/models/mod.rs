// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    normalize_interests, parse_interests, round2, CandidateId, CandidateVector, MatchResult,
    MatchSummary, MatchedPair, PairScore, PartialMatch, SearchStats, WeightProfile, WeightsError,
};
pub use requests::{CandidateInput, MatchOptimalRequest, ScorePairRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchOptimalResponse, ScorePairResponse, SearchFailureResponse};
