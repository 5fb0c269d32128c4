use domain::matching::{MatchSet, PracticeMatch};

/// Static dataset served when the matching service stays unreachable
/// through all retries. Entries are generic on purpose; the UI labels
/// fallback results as samples.
pub fn fallback_matches() -> MatchSet {
    MatchSet::new(vec![
        PracticeMatch {
            id: "fallback-general-1".to_string(),
            name: "City Centre Practice".to_string(),
            location: "London".to_string(),
            score: 0.0,
            summary: "Sample listing shown while live matching is unavailable.".to_string(),
        },
        PracticeMatch {
            id: "fallback-general-2".to_string(),
            name: "Riverside Health Group".to_string(),
            location: "Manchester".to_string(),
            score: 0.0,
            summary: "Sample listing shown while live matching is unavailable.".to_string(),
        },
        PracticeMatch {
            id: "fallback-general-3".to_string(),
            name: "Northgate Associates".to_string(),
            location: "Leeds".to_string(),
            score: 0.0,
            summary: "Sample listing shown while live matching is unavailable.".to_string(),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_dataset_is_non_empty_and_unscored() {
        let set = fallback_matches();
        assert!(!set.is_empty());
        assert!(set.practices.iter().all(|p| p.score.abs() < f32::EPSILON));
    }
}
