use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::SearchSettings;
use crate::core::{CompatibilityScorer, OptimalMatcher, SearchError};
use crate::models::{
    CandidateVector, ErrorResponse, HealthResponse, MatchOptimalRequest, MatchOptimalResponse,
    ScorePairRequest, ScorePairResponse, SearchFailureResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub scorer: CompatibilityScorer,
    pub search: SearchSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match/pair", web::post().to(score_pair))
        .route("/match/optimal", web::post().to(match_optimal));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Score a single pair
///
/// POST /api/v1/match/pair
///
/// Request body:
/// ```json
/// {
///   "candidateA": { "id": 1, "sleepTime": 0, "studyTime": 1, "cleanliness": 4,
///                   "noiseTolerance": 2, "personality": 1, "interests": ["chess"] },
///   "candidateB": { ... }
/// }
/// ```
async fn score_pair(
    state: web::Data<AppState>,
    req: web::Json<ScorePairRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score_pair request: {:?}", errors);
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let a: CandidateVector = req.candidate_a.into();
    let b: CandidateVector = req.candidate_b.into();

    let pair = state.scorer.score(&a, &b);

    tracing::info!("Scored pair {} / {}: {:.2}", a.id, b.id, pair.score);

    HttpResponse::Ok().json(ScorePairResponse {
        first_id: a.id,
        second_id: b.id,
        score: pair.score,
        reasons: pair.reasons,
    })
}

/// Run optimal matching over a batch
///
/// POST /api/v1/match/optimal
///
/// Request body:
/// ```json
/// {
///   "candidates": [ { "id": 1, ... }, { "id": 2, ... } ],
///   "maxNodes": 5000,
///   "timeoutMs": 2000
/// }
/// ```
///
/// Client limits can only tighten the configured ones.
async fn match_optimal(
    state: web::Data<AppState>,
    req: web::Json<MatchOptimalRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match_optimal request: {:?}", errors);
        return validation_failed(errors);
    }

    let req = req.into_inner();

    let mut search = state.search.clone();
    if let Some(max_nodes) = req.max_nodes {
        search.max_nodes = max_nodes.min(search.max_nodes);
    }
    if let Some(timeout_ms) = req.timeout_ms {
        search.timeout_ms = Some(search.timeout_ms.map_or(timeout_ms, |t| t.min(timeout_ms)));
    }

    let candidates: Vec<CandidateVector> = req.candidates.into_iter().map(Into::into).collect();
    let candidate_count = candidates.len();
    let matcher = OptimalMatcher::new(state.scorer.clone(), search.options());

    tracing::info!(
        "Running optimal matching for {} candidates (max nodes: {})",
        candidate_count,
        search.max_nodes
    );

    let outcome = web::block(move || matcher.match_candidates(&candidates)).await;

    match outcome {
        Ok(Ok(result)) => {
            let run_id = uuid::Uuid::new_v4().to_string();
            tracing::info!(
                "Run {}: {} pairs, total {:.2}, {} nodes explored",
                run_id,
                result.matches.len(),
                result.total_score,
                result.nodes_explored()
            );

            let summary = result.summary();
            HttpResponse::Ok().json(MatchOptimalResponse {
                run_id,
                nodes_explored: result.nodes_explored(),
                matches: result.matches,
                unmatched: result.unmatched,
                total_score: result.total_score,
                average_score: result.average_score,
                stats: result.stats,
                summary,
            })
        }
        Ok(Err(e)) => search_error_response(e),
        Err(e) => {
            tracing::error!("Matching task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

fn search_error_response(err: SearchError) -> HttpResponse {
    match err {
        SearchError::BudgetExceeded { nodes_explored, ref best }
        | SearchError::Cancelled { nodes_explored, ref best } => {
            tracing::warn!("Optimal matching stopped early: {}", err);
            HttpResponse::UnprocessableEntity().json(SearchFailureResponse {
                error: "Search stopped before an optimal pairing was proven".to_string(),
                message: err.to_string(),
                status_code: 422,
                nodes_explored,
                best: best.clone(),
            })
        }
        SearchError::DuplicateCandidate(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid candidates".to_string(),
            message: err.to_string(),
            status_code: 400,
        }),
        SearchError::Unreachable { .. } | SearchError::IncompleteMatrix(..) => {
            tracing::error!("Matching invariant violated: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}
