//! Duplicate-review detection
//!
//! Stateless predicate over the PR's existing comments; correctness survives
//! process restarts because nothing is cached between calls.

use revu_core::AI_REVIEW_MARKER;

/// True if any existing comment body starts with the `[AI - Review]` marker.
pub fn already_reviewed<S: AsRef<str>>(existing_comments: &[S]) -> bool {
    existing_comments
        .iter()
        .any(|c| c.as_ref().starts_with(AI_REVIEW_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_comment_detected() {
        let comments = vec![
            "LGTM".to_string(),
            "[AI - Review] P1: consider extracting this".to_string(),
        ];
        assert!(already_reviewed(&comments));
    }

    #[test]
    fn test_no_marker() {
        let comments = vec!["LGTM".to_string(), "please rebase".to_string()];
        assert!(!already_reviewed(&comments));
    }

    #[test]
    fn test_marker_must_be_prefix() {
        // A human quoting the marker mid-comment does not count.
        let comments = vec!["I saw a [AI - Review] comment on another PR".to_string()];
        assert!(!already_reviewed(&comments));
    }

    #[test]
    fn test_empty_comment_list() {
        assert!(!already_reviewed::<String>(&[]));
    }
}
