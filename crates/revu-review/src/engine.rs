//! Review engine
//!
//! Orchestrates one review invocation end to end: resolve the PR, fetch and
//! sanitize the diff, classify comments, and hand the survivors to the host
//! one at a time. Each invocation is processed to completion before the next
//! begins; nothing is shared across invocations.

use revu_bitbucket::{CommentAnchor, PullRequestHost};
use revu_core::{
    Error, Intent, PostOutcome, PostReport, PostStatus, PullRequestRef, Result, ReviewComment,
    ReviewDecision, ReviewMode, Severity,
};
use revu_diff::{AnchorIndex, DiffAnalyzer, IssueScan};
use revu_sanitize::{PatternRegistry, Sanitizer};
use serde::Serialize;

use crate::feedback::FeedbackParser;
use crate::matcher::match_prs;
use crate::platform::Platform;
use crate::tracker::already_reviewed;
use crate::workflow::{Workflow, classify};

const DEFAULT_MAX_COMMENTS: usize = 20;

/// Result of resolving a user-supplied identifier.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolveOutcome {
    NotFound,
    One(PullRequestRef),
    /// Equally plausible candidates; the presentation layer prompts.
    Many(Vec<PullRequestRef>),
}

/// Everything the AI collaborator needs to review one PR.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewPackage {
    pub pr: PullRequestRef,
    pub platform: Platform,
    pub checklist: String,
    pub sanitized_diff: String,
    /// (pattern id, count) pairs; never the matched content.
    pub redactions: Vec<(String, usize)>,
    pub heuristic_findings: Vec<ReviewComment>,
    pub instructions: String,
}

/// Outcome of a one-shot auto review.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AutoReviewOutcome {
    NotFound { identifier: String },
    Ambiguous { candidates: Vec<PullRequestRef> },
    AlreadyReviewed { pr: PullRequestRef },
    Posted {
        pr: PullRequestRef,
        decision: ReviewDecision,
        report: PostReport,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PrReviewStatus {
    pub pr: PullRequestRef,
    pub reviewed: bool,
}

/// Result of dispatching a resolved [`Intent`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum IntentDispatch {
    Listing { statuses: Vec<PrReviewStatus> },
    Single { outcome: AutoReviewOutcome },
    Batch { outcomes: Vec<AutoReviewOutcome> },
    Preview {
        resolution: ResolveOutcome,
        decision: Option<ReviewDecision>,
    },
}

pub struct ReviewEngine<H: PullRequestHost> {
    host: H,
    sanitizer: Sanitizer,
    analyzer: DiffAnalyzer,
    feedback: FeedbackParser,
    issues: IssueScan,
    max_comments: usize,
}

impl<H: PullRequestHost> ReviewEngine<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            sanitizer: Sanitizer::new(PatternRegistry::builtin()),
            analyzer: DiffAnalyzer::new(),
            feedback: FeedbackParser::new(),
            issues: IssueScan::builtin(),
            max_comments: DEFAULT_MAX_COMMENTS,
        }
    }

    pub fn with_registry(mut self, registry: PatternRegistry) -> Self {
        self.sanitizer = Sanitizer::new(registry);
        self
    }

    pub fn with_max_comments(mut self, max_comments: usize) -> Self {
        self.max_comments = max_comments;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub async fn list_open_prs(&self) -> Result<Vec<PullRequestRef>> {
        self.host.list_open_prs().await
    }

    pub async fn resolve(&self, identifier: &str) -> Result<ResolveOutcome> {
        let candidates = self.host.list_open_prs().await?;
        let mut matched = match_prs(identifier, &candidates);
        Ok(match matched.len() {
            0 => ResolveOutcome::NotFound,
            1 => ResolveOutcome::One(matched.remove(0)),
            _ => ResolveOutcome::Many(matched),
        })
    }

    pub async fn is_reviewed(&self, pr: &PullRequestRef) -> Result<bool> {
        let comments = self.host.pr_comments(&pr.repository, pr.id).await?;
        Ok(already_reviewed(&comments))
    }

    /// Build the sanitized review package for one PR.
    pub async fn prepare(&self, pr: &PullRequestRef) -> Result<ReviewPackage> {
        let raw_diff = self.host.pr_diff(&pr.repository, pr.id).await?;
        let analyzed = self.analyzer.analyze(&self.sanitizer, &raw_diff);

        let platform = Platform::detect(&pr.repository, &analyzed.changed_files());
        let heuristic_findings = self.issues.scan(&analyzed.lines);

        tracing::info!(
            pr_id = pr.id,
            repository = %pr.repository,
            redactions = analyzed.report.total(),
            findings = heuristic_findings.len(),
            "prepared review package"
        );

        Ok(ReviewPackage {
            instructions: build_instructions(pr, platform),
            checklist: platform.checklist().to_string(),
            redactions: analyzed.report.counts_by_pattern(),
            sanitized_diff: analyzed.sanitized_diff,
            heuristic_findings,
            platform,
            pr: pr.clone(),
        })
    }

    /// Derive the classified decision for one PR.
    ///
    /// Pure in its inputs: the same diff and feedback yield the same decision
    /// on every call, which is what makes the preview/post split re-entrant.
    pub async fn decide(
        &self,
        pr: &PullRequestRef,
        feedback: &str,
        mode: ReviewMode,
    ) -> Result<ReviewDecision> {
        let raw_diff = self.host.pr_diff(&pr.repository, pr.id).await?;
        let analyzed = self.analyzer.analyze(&self.sanitizer, &raw_diff);
        let anchors = AnchorIndex::from_lines(&analyzed.lines);

        let mut comments = self.feedback.parse(feedback);
        // Heuristic findings fill in behind AI feedback, never duplicating an
        // anchor the AI already commented on.
        for finding in self.issues.scan(&analyzed.lines) {
            let taken = comments
                .iter()
                .any(|c| c.file_path == finding.file_path && c.line_number == finding.line_number);
            if !taken {
                comments.push(finding);
            }
        }

        Ok(classify(pr, mode, comments, &anchors, self.max_comments))
    }

    /// Post a decision's surviving comments, one at a time.
    ///
    /// In manual-confirm mode nothing is posted without `confirmed == true`.
    /// A per-comment failure is recorded and the rest continue.
    pub async fn post(
        &self,
        pr: &PullRequestRef,
        decision: &ReviewDecision,
        confirmed: bool,
    ) -> Result<PostReport> {
        let mut workflow = Workflow::new(decision.mode);
        workflow.matched();
        workflow.analyzed();
        workflow.classified();
        if decision.mode == ReviewMode::ManualConfirm {
            workflow.confirmation(confirmed);
            if workflow.is_terminal() {
                return Err(Error::NotConfirmed);
            }
        }

        let mut outcomes = Vec::new();
        for comment in &decision.comments_to_post {
            let anchor = match (&comment.file_path, comment.line_number) {
                (Some(path), Some(line)) => Some(CommentAnchor {
                    file_path: path.clone(),
                    line,
                }),
                _ => None,
            };

            let status = match self
                .host
                .post_comment(&pr.repository, pr.id, &comment.formatted_body(), anchor)
                .await
            {
                Ok(()) => PostStatus::Posted,
                Err(e) => {
                    tracing::warn!(pr_id = pr.id, error = %e, "comment post failed");
                    PostStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(PostOutcome {
                comment: comment.clone(),
                status,
            });
        }
        workflow.posted();

        let report = PostReport {
            pr_id: pr.id,
            repository: pr.repository.clone(),
            outcomes,
        };
        tracing::info!(
            pr_id = pr.id,
            posted = report.posted(),
            failed = report.failed(),
            "posting pass finished"
        );
        Ok(report)
    }

    /// One-shot: resolve, skip if already reviewed, classify, post.
    pub async fn auto_review(&self, identifier: &str, feedback: &str) -> Result<AutoReviewOutcome> {
        let pr = match self.resolve(identifier).await? {
            ResolveOutcome::NotFound => {
                let mut workflow = Workflow::new(ReviewMode::AutoPost);
                workflow.not_found(identifier);
                return Ok(AutoReviewOutcome::NotFound {
                    identifier: identifier.to_string(),
                });
            }
            ResolveOutcome::Many(candidates) => {
                return Ok(AutoReviewOutcome::Ambiguous { candidates });
            }
            ResolveOutcome::One(pr) => pr,
        };
        self.auto_review_pr(&pr, feedback).await
    }

    /// Review a PR already in hand: skip if already reviewed, classify, post.
    ///
    /// Batch review goes through here directly. PR ids are unique only
    /// within one repository, so re-resolving an id string could land on a
    /// same-numbered PR in a sibling repository.
    pub async fn auto_review_pr(
        &self,
        pr: &PullRequestRef,
        feedback: &str,
    ) -> Result<AutoReviewOutcome> {
        let mut workflow = Workflow::new(ReviewMode::AutoPost);
        workflow.matched();

        if self.is_reviewed(pr).await? {
            workflow.already_reviewed(pr.id);
            return Ok(AutoReviewOutcome::AlreadyReviewed { pr: pr.clone() });
        }

        let decision = self.decide(pr, feedback, ReviewMode::AutoPost).await?;
        let report = self.post(pr, &decision, true).await?;
        Ok(AutoReviewOutcome::Posted {
            pr: pr.clone(),
            decision,
            report,
        })
    }

    /// Auto-review every open PR that is still pending.
    ///
    /// PRs carrying the review marker are reported as already reviewed and
    /// never re-posted; the rest go through the one-shot flow on the ref
    /// already in hand.
    pub async fn auto_review_all(&self, feedback: &str) -> Result<Vec<AutoReviewOutcome>> {
        let statuses = self.review_statuses().await?;
        let mut outcomes = Vec::with_capacity(statuses.len());
        for status in statuses {
            if status.reviewed {
                outcomes.push(AutoReviewOutcome::AlreadyReviewed { pr: status.pr });
                continue;
            }
            outcomes.push(self.auto_review_pr(&status.pr, feedback).await?);
        }
        Ok(outcomes)
    }

    /// Run one resolved intent end to end.
    pub async fn dispatch(&self, intent: &Intent, feedback: &str) -> Result<IntentDispatch> {
        Ok(match intent {
            Intent::List => IntentDispatch::Listing {
                statuses: self.review_statuses().await?,
            },
            Intent::ReviewAllAuto => IntentDispatch::Batch {
                outcomes: self.auto_review_all(feedback).await?,
            },
            Intent::ReviewOneAuto { identifier } => IntentDispatch::Single {
                outcome: self.auto_review(identifier, feedback).await?,
            },
            Intent::ReviewOneConfirm { identifier } => {
                let resolution = self.resolve(identifier).await?;
                let decision = match &resolution {
                    ResolveOutcome::One(pr) => {
                        Some(self.decide(pr, feedback, ReviewMode::ManualConfirm).await?)
                    }
                    _ => None,
                };
                IntentDispatch::Preview {
                    resolution,
                    decision,
                }
            }
        })
    }

    /// Reviewed/pending status for every open PR, checked sequentially so the
    /// duplicate-prevention reads stay consistent.
    pub async fn review_statuses(&self) -> Result<Vec<PrReviewStatus>> {
        let prs = self.host.list_open_prs().await?;
        let mut statuses = Vec::with_capacity(prs.len());
        for pr in prs {
            let reviewed = self.is_reviewed(&pr).await?;
            statuses.push(PrReviewStatus { pr, reviewed });
        }
        Ok(statuses)
    }
}

fn build_instructions(pr: &PullRequestRef, platform: Platform) -> String {
    format!(
        "Review pull request #{} \"{}\" in {} ({} change).\n\
         Severity levels:\n\
         - P0: {}\n\
         - P1: {}\n\
         - P2: {}\n\
         Report each issue on its own line as `file:line: P0|P1|P2: message`.\n\
         Platform checklist:\n{}",
        pr.id,
        pr.title,
        pr.repository,
        platform.name(),
        Severity::P0.description(),
        Severity::P1.description(),
        Severity::P2.description(),
        platform.checklist(),
    )
}
