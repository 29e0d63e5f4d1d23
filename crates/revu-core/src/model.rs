//! Domain models shared across the review pipeline

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Fixed prefix identifying machine-generated review comments.
///
/// Used both when formatting comment bodies and when detecting whether a
/// pull request already received an AI review.
pub const AI_REVIEW_MARKER: &str = "[AI - Review]";

/// Comment priority classification. P2 is filtered out of automated posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    P0,
    P1,
    P2,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::P0 => "P0",
            Severity::P1 => "P1",
            Severity::P2 => "P2",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Severity::P0 => "Critical security or functionality issues",
            Severity::P1 => "Code quality improvements",
            Severity::P2 => "Minor warnings and suggestions",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P0" => Ok(Severity::P0),
            "P1" => Ok(Severity::P1),
            "P2" => Ok(Severity::P2),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Open pull request metadata supplied by the Bitbucket collaborator.
///
/// The core never mutates it, only matches against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author: String,
    pub state: String,
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_branch: Option<String>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub updated_at: Option<OffsetDateTime>,
}

impl PullRequestRef {
    pub fn new(id: u64, title: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            author: String::new(),
            state: "OPEN".to_string(),
            repository: repository.into(),
            source_branch: None,
            destination_branch: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_source_branch(mut self, branch: impl Into<String>) -> Self {
        self.source_branch = Some(branch.into());
        self
    }
}

/// Kind of change a diff line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Context,
}

/// One changed line from a unified diff, sanitized and annotated with its
/// position in the new revision. `new_line` is None for removed lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffLine {
    pub file_path: String,
    pub new_line: Option<u32>,
    pub kind: ChangeKind,
    pub text: String,
}

/// A single review comment ready for classification and posting.
///
/// Inline comments carry both a file path and a line number; the line must
/// refer to an added or context line of the analyzed diff (Bitbucket rejects
/// comments anchored to removed lines). Entries without an anchor are
/// summary-level and are never posted inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    pub severity: Severity,
    pub body: String,
}

impl ReviewComment {
    pub fn inline(
        file_path: impl Into<String>,
        line_number: u32,
        severity: Severity,
        body: impl Into<String>,
    ) -> Self {
        Self {
            file_path: Some(file_path.into()),
            line_number: Some(line_number),
            severity,
            body: body.into(),
        }
    }

    pub fn summary(severity: Severity, body: impl Into<String>) -> Self {
        Self {
            file_path: None,
            line_number: None,
            severity,
            body: body.into(),
        }
    }

    pub fn is_inline(&self) -> bool {
        self.file_path.is_some() && self.line_number.is_some()
    }

    /// Format the comment body for posting: `[AI - Review] {SEVERITY}: {message}`.
    ///
    /// Bodies already carrying the marker are passed through unchanged so that
    /// re-posting a formatted body never double-prefixes it.
    pub fn formatted_body(&self) -> String {
        if self.body.starts_with(AI_REVIEW_MARKER) {
            self.body.clone()
        } else {
            format!("{} {}: {}", AI_REVIEW_MARKER, self.severity, self.body)
        }
    }
}

/// How a review invocation decides between confirm-then-post and
/// post-immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    ManualConfirm,
    AutoPost,
}

/// Why a classified comment was withheld from posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Severity P2, below the auto-post threshold.
    FilteredMinor,
    /// No file/line reference, summary-level feedback.
    NoAnchor,
    /// Anchor does not point at an added or context line of the diff.
    InvalidAnchor,
    /// Over the per-PR comment cap.
    CommentCap,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::FilteredMinor => "filtered-minor",
            SkipReason::NoAnchor => "no-anchor",
            SkipReason::InvalidAnchor => "invalid-anchor",
            SkipReason::CommentCap => "comment-cap",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedComment {
    pub comment: ReviewComment,
    pub reason: SkipReason,
}

/// Outcome of classifying one review invocation. Ephemeral: derived fresh
/// from the same inputs on every call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub pr_id: u64,
    pub repository: String,
    pub mode: ReviewMode,
    pub comments_to_post: Vec<ReviewComment>,
    pub comments_skipped: Vec<SkippedComment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ReviewDecision {
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.comments_to_post
            .iter()
            .chain(self.comments_skipped.iter().map(|s| &s.comment))
            .filter(|c| c.severity == severity)
            .count()
    }

    pub fn total_comments(&self) -> usize {
        self.comments_to_post.len() + self.comments_skipped.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PostStatus {
    Posted,
    Failed { reason: String },
}

/// Per-comment result of the posting step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostOutcome {
    pub comment: ReviewComment,
    #[serde(flatten)]
    pub status: PostStatus,
}

/// Report of one posting pass. A per-comment failure does not abort the
/// remaining comments, so partial success is expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostReport {
    pub pr_id: u64,
    pub repository: String,
    pub outcomes: Vec<PostOutcome>,
}

impl PostReport {
    pub fn posted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == PostStatus::Posted)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.posted()
    }

    pub fn all_posted(&self) -> bool {
        self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_body() {
        let comment = ReviewComment::inline("src/main.rs", 12, Severity::P0, "hardcoded secret");
        assert_eq!(
            comment.formatted_body(),
            "[AI - Review] P0: hardcoded secret"
        );
    }

    #[test]
    fn test_formatted_body_idempotent() {
        let comment = ReviewComment::inline("src/main.rs", 12, Severity::P1, "x");
        let formatted = comment.formatted_body();
        let again = ReviewComment::inline("src/main.rs", 12, Severity::P1, formatted.clone());
        assert_eq!(again.formatted_body(), formatted);
    }

    #[test]
    fn test_severity_roundtrip() {
        for s in [Severity::P0, Severity::P1, Severity::P2] {
            assert_eq!(s.as_str().parse::<Severity>().unwrap(), s);
        }
        assert!("P3".parse::<Severity>().is_err());
    }

    #[test]
    fn test_summary_comment_is_not_inline() {
        let comment = ReviewComment::summary(Severity::P2, "overall fine");
        assert!(!comment.is_inline());
    }

    #[test]
    fn test_post_report_counts() {
        let comment = ReviewComment::inline("a.rs", 1, Severity::P0, "x");
        let report = PostReport {
            pr_id: 7,
            repository: "repo".to_string(),
            outcomes: vec![
                PostOutcome {
                    comment: comment.clone(),
                    status: PostStatus::Posted,
                },
                PostOutcome {
                    comment,
                    status: PostStatus::Failed {
                        reason: "invalid line anchor".to_string(),
                    },
                },
            ],
        };
        assert_eq!(report.posted(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_posted());
    }
}
