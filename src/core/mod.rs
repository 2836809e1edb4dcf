// Core algorithm exports
pub mod distance;
pub mod matcher;
pub mod matrix;
pub mod reasons;
pub mod scoring;
pub mod state;

pub use distance::{interest_overlap, weighted_distance};
pub use matcher::{match_optimal, OptimalMatcher, SearchError, SearchOptions, DEFAULT_MAX_NODES};
pub use matrix::ScoreMatrix;
pub use reasons::match_reasons;
pub use scoring::{score_pair, CompatibilityScorer, DEFAULT_HOBBY_OVERLAP_BONUS};
pub use state::{heuristic, MatchingState, StateKey};
