//! Comment classification and the posting workflow state machine
//!
//! Classification is a pure function of the comment set, the diff's anchor
//! index and the invocation mode, so a post call can re-derive the exact
//! same decision a preview produced without any stored workflow state.

use revu_core::{
    PullRequestRef, ReviewComment, ReviewDecision, ReviewMode, Severity, SkipReason,
    SkippedComment,
};
use revu_diff::AnchorIndex;
use serde::{Deserialize, Serialize};

/// Why a review invocation ended without posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    NotFound { identifier: String },
    AlreadyReviewed { pr_id: u64 },
    NotConfirmed,
}

/// Strict call sites surface an abort as the matching error.
impl From<AbortReason> for revu_core::Error {
    fn from(reason: AbortReason) -> Self {
        match reason {
            AbortReason::NotFound { identifier } => revu_core::Error::NotFound(identifier),
            AbortReason::AlreadyReviewed { pr_id } => revu_core::Error::AlreadyReviewed(pr_id),
            AbortReason::NotConfirmed => revu_core::Error::NotConfirmed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Matched,
    Analyzed,
    Classified,
    AwaitingConfirmation,
    ReadyToPost,
    Posted,
    Aborted(AbortReason),
}

/// One review invocation's progress.
///
/// Terminal states are final for the invocation; nothing carries over to the
/// next one except what the tracker re-derives from Bitbucket.
#[derive(Debug, Clone)]
pub struct Workflow {
    mode: ReviewMode,
    state: WorkflowState,
}

impl Workflow {
    pub fn new(mode: ReviewMode) -> Self {
        Self {
            mode,
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            WorkflowState::Posted | WorkflowState::Aborted(_)
        )
    }

    pub fn matched(&mut self) {
        debug_assert_eq!(self.state, WorkflowState::Idle);
        self.transition(WorkflowState::Matched);
    }

    pub fn not_found(&mut self, identifier: impl Into<String>) {
        debug_assert_eq!(self.state, WorkflowState::Idle);
        self.transition(WorkflowState::Aborted(AbortReason::NotFound {
            identifier: identifier.into(),
        }));
    }

    pub fn analyzed(&mut self) {
        debug_assert_eq!(self.state, WorkflowState::Matched);
        self.transition(WorkflowState::Analyzed);
    }

    /// Duplicate-prevention short-circuit: an expected skip, not an error.
    pub fn already_reviewed(&mut self, pr_id: u64) {
        debug_assert_eq!(self.state, WorkflowState::Matched);
        self.transition(WorkflowState::Aborted(AbortReason::AlreadyReviewed { pr_id }));
    }

    /// Classification routes by mode: manual-confirm invocations wait for an
    /// explicit answer, auto-post invocations go straight to posting.
    pub fn classified(&mut self) {
        debug_assert_eq!(self.state, WorkflowState::Analyzed);
        self.transition(WorkflowState::Classified);
        let next = match self.mode {
            ReviewMode::ManualConfirm => WorkflowState::AwaitingConfirmation,
            ReviewMode::AutoPost => WorkflowState::ReadyToPost,
        };
        self.transition(next);
    }

    /// Only an explicit `true` proceeds; anything else aborts and posts nothing.
    pub fn confirmation(&mut self, confirmed: bool) {
        debug_assert_eq!(self.state, WorkflowState::AwaitingConfirmation);
        let next = if confirmed {
            WorkflowState::ReadyToPost
        } else {
            WorkflowState::Aborted(AbortReason::NotConfirmed)
        };
        self.transition(next);
    }

    pub fn posted(&mut self) {
        debug_assert_eq!(self.state, WorkflowState::ReadyToPost);
        self.transition(WorkflowState::Posted);
    }

    fn transition(&mut self, next: WorkflowState) {
        tracing::debug!(from = ?self.state, to = ?next, "workflow transition");
        self.state = next;
    }
}

/// Partition comments into post/skip sets.
///
/// In order: P2 is filtered as minor, entries without an anchor stay
/// summary-level, anchors that do not land on an added/context line are
/// rejected, and everything past the per-PR cap is withheld. Deterministic
/// for a given input set regardless of mode.
pub fn classify(
    pr: &PullRequestRef,
    mode: ReviewMode,
    comments: Vec<ReviewComment>,
    anchors: &AnchorIndex,
    max_comments: usize,
) -> ReviewDecision {
    let mut to_post = Vec::new();
    let mut skipped = Vec::new();

    for comment in comments {
        let reason = if comment.severity == Severity::P2 {
            Some(SkipReason::FilteredMinor)
        } else if !comment.is_inline() {
            Some(SkipReason::NoAnchor)
        } else {
            let file = comment.file_path.as_deref().unwrap_or_default();
            let line = comment.line_number.unwrap_or(0);
            if !anchors.is_anchorable(file, line) {
                Some(SkipReason::InvalidAnchor)
            } else if to_post.len() >= max_comments {
                Some(SkipReason::CommentCap)
            } else {
                None
            }
        };

        match reason {
            Some(reason) => skipped.push(SkippedComment { comment, reason }),
            None => to_post.push(comment),
        }
    }

    let summary = build_summary(&to_post, &skipped);

    ReviewDecision {
        pr_id: pr.id,
        repository: pr.repository.clone(),
        mode,
        comments_to_post: to_post,
        comments_skipped: skipped,
        summary,
    }
}

fn build_summary(to_post: &[ReviewComment], skipped: &[SkippedComment]) -> Option<String> {
    let all = || to_post.iter().chain(skipped.iter().map(|s| &s.comment));
    let total = all().count();
    if total == 0 {
        return None;
    }

    let count = |sev: Severity| all().filter(|c| c.severity == sev).count();
    Some(format!(
        "PR review summary: {total} issue(s) found. P0 (critical): {}, P1 (important): {}, P2 (minor): {}. Posting {} inline comment(s).",
        count(Severity::P0),
        count(Severity::P1),
        count(Severity::P2),
        to_post.len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use revu_core::{ChangeKind, DiffLine};

    fn pr() -> PullRequestRef {
        PullRequestRef::new(7, "title", "repo")
    }

    fn anchors() -> AnchorIndex {
        let lines: Vec<DiffLine> = (1..=50)
            .map(|n| DiffLine {
                file_path: "a.rs".to_string(),
                new_line: Some(n),
                kind: ChangeKind::Added,
                text: String::new(),
            })
            .collect();
        AnchorIndex::from_lines(&lines)
    }

    fn inline(line: u32, severity: Severity) -> ReviewComment {
        ReviewComment::inline("a.rs", line, severity, "msg")
    }

    #[test]
    fn test_severity_partition() {
        let comments = vec![
            inline(1, Severity::P0),
            inline(2, Severity::P1),
            inline(3, Severity::P1),
            inline(4, Severity::P2),
            inline(5, Severity::P2),
            inline(6, Severity::P2),
        ];
        let decision = classify(&pr(), ReviewMode::AutoPost, comments, &anchors(), 20);

        assert_eq!(decision.comments_to_post.len(), 3);
        assert_eq!(decision.comments_skipped.len(), 3);
        assert!(
            decision
                .comments_skipped
                .iter()
                .all(|s| s.reason == SkipReason::FilteredMinor)
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let comments = vec![inline(1, Severity::P0), inline(2, Severity::P2)];
        let a = classify(&pr(), ReviewMode::AutoPost, comments.clone(), &anchors(), 20);
        let b = classify(&pr(), ReviewMode::AutoPost, comments, &anchors(), 20);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_invalid_anchor_skipped() {
        let comments = vec![inline(999, Severity::P0)];
        let decision = classify(&pr(), ReviewMode::AutoPost, comments, &anchors(), 20);
        assert!(decision.comments_to_post.is_empty());
        assert_eq!(decision.comments_skipped[0].reason, SkipReason::InvalidAnchor);
    }

    #[test]
    fn test_summary_comment_not_posted_inline() {
        let comments = vec![ReviewComment::summary(Severity::P1, "overall")];
        let decision = classify(&pr(), ReviewMode::ManualConfirm, comments, &anchors(), 20);
        assert!(decision.comments_to_post.is_empty());
        assert_eq!(decision.comments_skipped[0].reason, SkipReason::NoAnchor);
    }

    #[test]
    fn test_comment_cap() {
        let comments: Vec<ReviewComment> =
            (1..=5).map(|n| inline(n, Severity::P1)).collect();
        let decision = classify(&pr(), ReviewMode::AutoPost, comments, &anchors(), 3);
        assert_eq!(decision.comments_to_post.len(), 3);
        assert_eq!(decision.comments_skipped.len(), 2);
        assert!(
            decision
                .comments_skipped
                .iter()
                .all(|s| s.reason == SkipReason::CommentCap)
        );
    }

    #[test]
    fn test_summary_breakdown() {
        let comments = vec![inline(1, Severity::P0), inline(2, Severity::P2)];
        let decision = classify(&pr(), ReviewMode::AutoPost, comments, &anchors(), 20);
        let summary = decision.summary.unwrap();
        assert!(summary.contains("P0 (critical): 1"));
        assert!(summary.contains("P2 (minor): 1"));
    }

    #[test]
    fn test_empty_comments_no_summary() {
        let decision = classify(&pr(), ReviewMode::AutoPost, vec![], &anchors(), 20);
        assert!(decision.summary.is_none());
        assert_eq!(decision.total_comments(), 0);
    }

    #[test]
    fn test_manual_confirm_transitions() {
        let mut wf = Workflow::new(ReviewMode::ManualConfirm);
        wf.matched();
        wf.analyzed();
        wf.classified();
        assert_eq!(wf.state(), &WorkflowState::AwaitingConfirmation);
        wf.confirmation(true);
        assert_eq!(wf.state(), &WorkflowState::ReadyToPost);
        wf.posted();
        assert!(wf.is_terminal());
    }

    #[test]
    fn test_declined_confirmation_aborts() {
        let mut wf = Workflow::new(ReviewMode::ManualConfirm);
        wf.matched();
        wf.analyzed();
        wf.classified();
        wf.confirmation(false);
        assert_eq!(
            wf.state(),
            &WorkflowState::Aborted(AbortReason::NotConfirmed)
        );
        assert!(wf.is_terminal());
    }

    #[test]
    fn test_auto_post_skips_confirmation() {
        let mut wf = Workflow::new(ReviewMode::AutoPost);
        wf.matched();
        wf.analyzed();
        wf.classified();
        assert_eq!(wf.state(), &WorkflowState::ReadyToPost);
    }

    #[test]
    fn test_already_reviewed_aborts() {
        let mut wf = Workflow::new(ReviewMode::AutoPost);
        wf.matched();
        wf.already_reviewed(7);
        assert_eq!(
            wf.state(),
            &WorkflowState::Aborted(AbortReason::AlreadyReviewed { pr_id: 7 })
        );
    }

    #[test]
    fn test_not_found_aborts_from_idle() {
        let mut wf = Workflow::new(ReviewMode::AutoPost);
        wf.not_found("nope");
        assert!(wf.is_terminal());
    }

    #[test]
    fn test_abort_reason_maps_to_error() {
        let err: revu_core::Error = AbortReason::AlreadyReviewed { pr_id: 42 }.into();
        assert!(matches!(err, revu_core::Error::AlreadyReviewed(42)));

        let err: revu_core::Error = AbortReason::NotFound {
            identifier: "x".to_string(),
        }
        .into();
        assert!(matches!(err, revu_core::Error::NotFound(_)));
    }
}
