// Property-based tests for scoring and optimal search

use proptest::prelude::*;
use roommate_match::core::{heuristic, CompatibilityScorer, OptimalMatcher, ScoreMatrix};
use roommate_match::models::{CandidateId, CandidateVector, PairScore};

const HOBBIES: [&str; 6] = ["chess", "music", "films", "hiking", "cooking", "games"];

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    }
}

fn arb_candidate(id: CandidateId) -> impl Strategy<Value = CandidateVector> {
    (
        0u8..=2,
        0u8..=3,
        1u8..=5,
        1u8..=5,
        0u8..=2,
        prop::sample::subsequence(HOBBIES.to_vec(), 0..=4),
    )
        .prop_map(move |(sleep, study, clean, noise, personality, interests)| {
            CandidateVector::new(id, sleep, study, clean, noise, personality, interests)
        })
}

/// Even candidate count with one score per unordered pair
fn arb_scored_ids() -> impl Strategy<Value = (Vec<CandidateId>, ScoreMatrix)> {
    (1usize..=4).prop_flat_map(|half| {
        let n = half * 2;
        prop::collection::vec(0.0f64..=100.0, n * (n - 1) / 2).prop_map(move |scores| {
            // spaced ids so nothing depends on ids being contiguous
            let ids: Vec<CandidateId> = (0..n as u64).map(|i| i * 3 + 2).collect();
            let mut matrix = ScoreMatrix::new();
            let mut scores = scores.into_iter();
            for i in 0..n {
                for j in i + 1..n {
                    let score = scores.next().unwrap_or(0.0);
                    matrix.insert(ids[i], ids[j], PairScore { score, reasons: vec![] });
                }
            }
            (ids, matrix)
        })
    })
}

/// Best total over every perfect matching of `ids`
fn brute_force_best(ids: &[CandidateId], matrix: &ScoreMatrix) -> f64 {
    let Some((&first, rest)) = ids.split_first() else {
        return 0.0;
    };

    rest.iter()
        .map(|&partner| {
            let remaining: Vec<CandidateId> = rest.iter().copied().filter(|&id| id != partner).collect();
            matrix.value(first, partner).unwrap_or(0.0) + brute_force_best(&remaining, matrix)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn score_is_symmetric_and_bounded(a in arb_candidate(1), b in arb_candidate(2)) {
        let scorer = CompatibilityScorer::with_default_weights();
        let ab = scorer.score(&a, &b);
        let ba = scorer.score(&b, &a);

        prop_assert_eq!(&ab, &ba);
        prop_assert!(ab.score >= 0.0 && ab.score <= 100.0);
        prop_assert!(!ab.reasons.is_empty());
    }

    #[test]
    fn distance_stays_in_unit_interval(a in arb_candidate(1), b in arb_candidate(2)) {
        let scorer = CompatibilityScorer::with_default_weights();
        let distance = scorer.distance(&a, &b);
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&distance));
    }

    #[test]
    fn heuristic_never_underestimates((ids, matrix) in arb_scored_ids()) {
        // full set, then every remainder left after pairing the anchor
        let bound = -heuristic(&ids, &matrix);
        prop_assert!(bound + 1e-9 >= brute_force_best(&ids, &matrix));

        for &partner in &ids[1..] {
            let rest: Vec<CandidateId> = ids[1..].iter().copied().filter(|&id| id != partner).collect();
            let bound = -heuristic(&rest, &matrix);
            prop_assert!(bound + 1e-9 >= brute_force_best(&rest, &matrix));
        }
    }

    #[test]
    fn search_matches_brute_force((ids, matrix) in arb_scored_ids()) {
        let result = OptimalMatcher::with_default_weights().search(&ids, &matrix).unwrap();

        let found: f64 = result.matches.iter().map(|m| m.score).sum();
        let best = brute_force_best(&ids, &matrix);
        prop_assert!((found - best).abs() < 1e-6, "found {} expected {}", found, best);

        let mut paired: Vec<CandidateId> = result.matches.iter().flat_map(|m| [m.first, m.second]).collect();
        paired.sort_unstable();
        prop_assert_eq!(paired, ids);
    }

    #[test]
    fn search_is_deterministic((ids, matrix) in arb_scored_ids()) {
        let matcher = OptimalMatcher::with_default_weights();
        let first = matcher.search(&ids, &matrix).unwrap();
        let second = matcher.search(&ids, &matrix).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn odd_input_leaves_exactly_one_out(
        candidates in (1u64..=3).prop_flat_map(|half| {
            let n = half * 2 + 1;
            (1..=n).map(arb_candidate).collect::<Vec<_>>()
        })
    ) {
        let result = OptimalMatcher::with_default_weights().match_candidates(&candidates).unwrap();
        let highest = candidates.iter().map(|c| c.id).max().unwrap_or_default();

        prop_assert_eq!(result.unmatched, vec![highest]);
        prop_assert_eq!(result.matches.len() * 2, candidates.len() - 1);
    }
}
