use crate::models::CandidateVector;

/// Reason emitted when none of the specific rules fire
pub const FALLBACK_REASON: &str = "Balanced overall compatibility";

/// Shared interests listed in a single reason
const MAX_SHARED_INTERESTS: usize = 3;

fn sleep_label(bucket: u8) -> Option<&'static str> {
    match bucket {
        0 => Some("early birds"),
        1 => Some("moderate sleepers"),
        2 => Some("night owls"),
        _ => None,
    }
}

fn study_label(bucket: u8) -> Option<&'static str> {
    match bucket {
        0 => Some("morning studiers"),
        1 => Some("afternoon studiers"),
        2 => Some("evening studiers"),
        3 => Some("night studiers"),
        _ => None,
    }
}

fn personality_label(bucket: u8) -> Option<&'static str> {
    match bucket {
        0 => Some("introverted"),
        1 => Some("balanced"),
        2 => Some("extroverted"),
        _ => None,
    }
}

/// Human-readable justifications for pairing two candidates
///
/// Rules are checked in a fixed order and are independent of the numeric
/// score. The returned list is never empty.
pub fn match_reasons(a: &CandidateVector, b: &CandidateVector) -> Vec<String> {
    let mut reasons = Vec::new();

    if a.sleep_time == b.sleep_time {
        if let Some(label) = sleep_label(a.sleep_time) {
            reasons.push(format!("Both are {}", label));
        }
    }

    if a.study_time == b.study_time {
        if let Some(label) = study_label(a.study_time) {
            reasons.push(format!("Both prefer {}", label));
        }
    }

    if a.cleanliness.abs_diff(b.cleanliness) <= 1 {
        reasons.push("Similar cleanliness standards".to_string());
    }

    if a.noise_tolerance.abs_diff(b.noise_tolerance) <= 1 {
        reasons.push("Compatible noise tolerance levels".to_string());
    }

    if a.personality == b.personality {
        if let Some(label) = personality_label(a.personality) {
            reasons.push(format!("Both have {} personality", label));
        }
    }

    // Interest sets are sorted, so the listed tags are stable
    let shared: Vec<&str> = a
        .interests
        .intersection(&b.interests)
        .take(MAX_SHARED_INTERESTS)
        .map(String::as_str)
        .collect();
    if !shared.is_empty() {
        reasons.push(format!("Share hobbies: {}", shared.join(", ")));
    }

    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }

    reasons
}
