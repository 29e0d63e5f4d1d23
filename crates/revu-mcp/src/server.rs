//! MCP server state and presentation helpers.

use std::collections::BTreeMap;

use revu_bitbucket::PullRequestHost;
use revu_review::{PrReviewStatus, ReviewEngine};
use serde_json::json;

const DESCRIPTION_PREVIEW_CHARS: usize = 200;

pub struct McpServer<H: PullRequestHost> {
    pub engine: ReviewEngine<H>,
}

impl<H: PullRequestHost> McpServer<H> {
    pub fn new(engine: ReviewEngine<H>) -> Self {
        Self { engine }
    }
}

/// Render PR statuses grouped by repository, repositories in stable order.
pub fn grouped_pr_listing(statuses: &[PrReviewStatus]) -> serde_json::Value {
    let mut by_repo: BTreeMap<&str, Vec<serde_json::Value>> = BTreeMap::new();
    for status in statuses {
        by_repo
            .entry(status.pr.repository.as_str())
            .or_default()
            .push(json!({
                "id": status.pr.id,
                "title": status.pr.title,
                "author": status.pr.author,
                "source_branch": status.pr.source_branch,
                "description": truncate_description(&status.pr.description),
                "reviewed": status.reviewed,
            }));
    }

    let repositories: Vec<serde_json::Value> = by_repo
        .into_iter()
        .map(|(repo, prs)| json!({ "repository": repo, "pull_requests": prs }))
        .collect();

    json!({
        "total": statuses.len(),
        "pending": statuses.iter().filter(|s| !s.reviewed).count(),
        "repositories": repositories,
    })
}

fn truncate_description(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{}...", head.trim_end())
}
