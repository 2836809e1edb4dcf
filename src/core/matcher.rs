use crate::core::{
    matrix::ScoreMatrix,
    scoring::{CompatibilityScorer, DEFAULT_HOBBY_OVERLAP_BONUS},
    state::MatchingState,
};
use crate::models::{
    round2, CandidateId, CandidateVector, MatchResult, MatchedPair, PartialMatch, SearchStats,
    WeightProfile,
};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default cap on frontier pops per search
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Ways an optimal search can end without an optimal answer
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search budget exceeded after {nodes_explored} nodes")]
    BudgetExceeded {
        nodes_explored: usize,
        best: Option<PartialMatch>,
    },

    #[error("search cancelled after {nodes_explored} nodes")]
    Cancelled {
        nodes_explored: usize,
        best: Option<PartialMatch>,
    },

    /// Frontier exhausted without reaching a goal. Indicates a broken invariant.
    #[error("no complete pairing found after {nodes_explored} nodes")]
    Unreachable { nodes_explored: usize },

    #[error("score matrix has no entry for pair ({0}, {1})")]
    IncompleteMatrix(CandidateId, CandidateId),

    #[error("duplicate candidate id {0}")]
    DuplicateCandidate(CandidateId),
}

impl SearchError {
    /// Best known assignment carried by a budget or cancellation outcome
    pub fn best_partial(&self) -> Option<&PartialMatch> {
        match self {
            SearchError::BudgetExceeded { best, .. } | SearchError::Cancelled { best, .. } => {
                best.as_ref()
            }
            _ => None,
        }
    }

    /// Whether this outcome signals an engine invariant violation
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SearchError::Unreachable { .. } | SearchError::IncompleteMatrix(..)
        )
    }
}

/// Limits for a single search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_nodes: usize,
    pub deadline: Option<Instant>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchOptions {
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline measured from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Flag that stops the search once set to `true`
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn should_stop(&self) -> bool {
        if let Some(flag) = &self.cancel {
            if flag.load(atomic::Ordering::Relaxed) {
                return true;
            }
        }

        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            deadline: None,
            cancel: None,
        }
    }
}

/// Min-heap adapter: the state with the lowest frontier order pops first
struct FrontierEntry(MatchingState);

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.frontier_cmp(&self.0)
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Candidates split into the searchable (even-sized) pool and the excluded one
struct SearchPlan {
    pool: Vec<CandidateId>,
    excluded: Vec<CandidateId>,
}

/// Sort ids, reject duplicates and drop the highest id when the count is odd
fn plan_search(ids: impl IntoIterator<Item = CandidateId>) -> Result<SearchPlan, SearchError> {
    let mut pool: Vec<CandidateId> = ids.into_iter().collect();
    pool.sort_unstable();

    if let Some(window) = pool.windows(2).find(|w| w[0] == w[1]) {
        return Err(SearchError::DuplicateCandidate(window[0]));
    }

    if pool.len() < 2 {
        return Ok(SearchPlan {
            pool: Vec::new(),
            excluded: pool,
        });
    }

    let mut excluded = Vec::new();
    if pool.len() % 2 == 1 {
        excluded.extend(pool.pop());
    }

    Ok(SearchPlan { pool, excluded })
}

/// Best-first search for the pairing with maximum total compatibility
///
/// # Search
/// 1. Score every pair once
/// 2. Pop the state with the lowest `cost + heuristic` from the frontier
/// 3. Return the first goal popped; otherwise expand by pairing the smallest
///    unmatched id with each other unmatched id
///
/// With an odd number of candidates the highest id sits out and is reported
/// as unmatched.
#[derive(Debug, Clone)]
pub struct OptimalMatcher {
    scorer: CompatibilityScorer,
    options: SearchOptions,
}

impl OptimalMatcher {
    pub fn new(scorer: CompatibilityScorer, options: SearchOptions) -> Self {
        Self { scorer, options }
    }

    pub fn with_default_weights() -> Self {
        Self {
            scorer: CompatibilityScorer::with_default_weights(),
            options: SearchOptions::default(),
        }
    }

    pub fn scorer(&self) -> &CompatibilityScorer {
        &self.scorer
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Copy of this matcher with different search limits
    pub fn with_options(&self, options: SearchOptions) -> Self {
        Self {
            scorer: self.scorer.clone(),
            options,
        }
    }

    /// Score the candidates and find the optimal pairing
    pub fn match_candidates(
        &self,
        candidates: &[CandidateVector],
    ) -> Result<MatchResult, SearchError> {
        let plan = plan_search(candidates.iter().map(|c| c.id))?;
        if plan.pool.is_empty() {
            return Ok(MatchResult::empty(plan.excluded));
        }

        let pool: Vec<CandidateVector> = candidates
            .iter()
            .filter(|c| !plan.excluded.contains(&c.id))
            .cloned()
            .collect();
        let matrix = self.scorer.all_pair_scores(&pool);

        self.run(plan, &matrix)
    }

    /// Find the optimal pairing of `ids` over a prebuilt score matrix
    pub fn search(
        &self,
        ids: &[CandidateId],
        matrix: &ScoreMatrix,
    ) -> Result<MatchResult, SearchError> {
        let plan = plan_search(ids.iter().copied())?;
        if plan.pool.is_empty() {
            return Ok(MatchResult::empty(plan.excluded));
        }

        self.run(plan, matrix)
    }

    fn run(&self, plan: SearchPlan, matrix: &ScoreMatrix) -> Result<MatchResult, SearchError> {
        self.run_observed(plan, matrix, |_| {})
    }

    /// Search loop; `before_pop` sees the running stats at the top of every iteration
    fn run_observed(
        &self,
        plan: SearchPlan,
        matrix: &ScoreMatrix,
        mut before_pop: impl FnMut(&SearchStats),
    ) -> Result<MatchResult, SearchError> {
        let SearchPlan { pool, excluded } = plan;

        tracing::debug!(
            "Starting optimal search over {} candidates ({} excluded, max nodes: {})",
            pool.len(),
            excluded.len(),
            self.options.max_nodes
        );

        let root = MatchingState::initial(pool, matrix);
        let mut best_partial = root.clone();
        let mut best_complete: Option<MatchingState> = None;

        let mut frontier = BinaryHeap::new();
        let mut visited = HashSet::new();
        let mut stats = SearchStats {
            states_generated: 1,
            max_frontier: 1,
            ..SearchStats::default()
        };

        frontier.push(FrontierEntry(root));

        while !frontier.is_empty() {
            before_pop(&stats);

            if stats.nodes_explored >= self.options.max_nodes {
                tracing::warn!(
                    "Search budget of {} nodes exceeded ({} states on frontier)",
                    self.options.max_nodes,
                    frontier.len()
                );
                let best = best_complete.as_ref().unwrap_or(&best_partial);
                return Err(SearchError::BudgetExceeded {
                    nodes_explored: stats.nodes_explored,
                    best: Some(partial_match(best, &excluded, matrix)),
                });
            }

            if self.options.should_stop() {
                tracing::warn!("Search cancelled after {} nodes", stats.nodes_explored);
                let best = best_complete.as_ref().unwrap_or(&best_partial);
                return Err(SearchError::Cancelled {
                    nodes_explored: stats.nodes_explored,
                    best: Some(partial_match(best, &excluded, matrix)),
                });
            }

            let Some(FrontierEntry(state)) = frontier.pop() else {
                break;
            };
            stats.nodes_explored += 1;

            if state.is_goal() {
                tracing::debug!(
                    "Optimal pairing found: total {:.2} after {} nodes",
                    state.total_score(),
                    stats.nodes_explored
                );
                return Ok(finish(&state, excluded, matrix, stats));
            }

            if !visited.insert(state.key()) {
                continue;
            }

            let successors = state
                .successors(matrix)
                .map_err(|(a, b)| SearchError::IncompleteMatrix(a, b))?;

            for successor in successors {
                if successor.is_goal() {
                    let improves = best_complete
                        .as_ref()
                        .map_or(true, |best| successor.total_score() > best.total_score());
                    if improves {
                        best_complete = Some(successor.clone());
                    }
                } else if successor.is_better_partial_than(&best_partial) {
                    best_partial = successor.clone();
                }

                if !visited.contains(&successor.key()) {
                    frontier.push(FrontierEntry(successor));
                    stats.states_generated += 1;
                }
            }

            stats.max_frontier = stats.max_frontier.max(frontier.len());
        }

        Err(SearchError::Unreachable {
            nodes_explored: stats.nodes_explored,
        })
    }
}

impl Default for OptimalMatcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn matched_pairs(state: &MatchingState, matrix: &ScoreMatrix) -> Vec<MatchedPair> {
    state
        .pairs()
        .iter()
        .map(|pair| MatchedPair {
            first: pair.first,
            second: pair.second,
            score: pair.score,
            reasons: matrix
                .get(pair.first, pair.second)
                .map(|s| s.reasons.clone())
                .unwrap_or_default(),
        })
        .collect()
}

fn finish(
    state: &MatchingState,
    unmatched: Vec<CandidateId>,
    matrix: &ScoreMatrix,
    stats: SearchStats,
) -> MatchResult {
    let matches = matched_pairs(state, matrix);
    let total_score = state.total_score();
    let average_score = if matches.is_empty() {
        0.0
    } else {
        total_score / matches.len() as f64
    };

    MatchResult {
        matches,
        unmatched,
        total_score: round2(total_score),
        average_score: round2(average_score),
        stats,
    }
}

fn partial_match(
    state: &MatchingState,
    excluded: &[CandidateId],
    matrix: &ScoreMatrix,
) -> PartialMatch {
    let mut unmatched = state.unmatched().to_vec();
    unmatched.extend_from_slice(excluded);

    PartialMatch {
        pairs: matched_pairs(state, matrix),
        unmatched,
        total_score: round2(state.total_score()),
        complete: state.is_goal(),
    }
}

/// Optimal pairing of `candidates` with the given weights and the default
/// hobby bonus
///
/// The weights are assumed to have been validated when they were configured.
pub fn match_optimal(
    candidates: &[CandidateVector],
    weights: &WeightProfile,
    options: SearchOptions,
) -> Result<MatchResult, SearchError> {
    let scorer = CompatibilityScorer::from_parts(*weights, DEFAULT_HOBBY_OVERLAP_BONUS);

    OptimalMatcher::new(scorer, options).match_candidates(candidates)
}
