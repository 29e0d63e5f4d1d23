//! Pull request host trait

use async_trait::async_trait;
use revu_core::{PullRequestRef, Result};

/// Inline position for a posted comment, in new-revision coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAnchor {
    pub file_path: String,
    pub line: u32,
}

/// External collaborator the review core reads PRs from and posts comments to.
#[async_trait]
pub trait PullRequestHost: Send + Sync {
    /// Open pull requests across all configured repositories.
    async fn list_open_prs(&self) -> Result<Vec<PullRequestRef>>;

    /// Raw unified diff for one pull request.
    async fn pr_diff(&self, repository: &str, pr_id: u64) -> Result<String>;

    /// Raw bodies of the existing comments on one pull request.
    async fn pr_comments(&self, repository: &str, pr_id: u64) -> Result<Vec<String>>;

    /// Post one comment; inline when an anchor is given, PR-level otherwise.
    async fn post_comment(
        &self,
        repository: &str,
        pr_id: u64,
        body: &str,
        anchor: Option<CommentAnchor>,
    ) -> Result<()>;
}
