//! Bitbucket Cloud 2.0 REST client

use async_trait::async_trait;
use revu_core::{Error, PullRequestRef, Result};
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::host::{CommentAnchor, PullRequestHost};

const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org";

pub struct BitbucketClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    app_password: String,
    workspace: String,
    repositories: Vec<String>,
}

impl BitbucketClient {
    pub fn new(
        username: impl Into<String>,
        app_password: impl Into<String>,
        workspace: impl Into<String>,
        repositories: Vec<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            username: username.into(),
            app_password: app_password.into(),
            workspace: workspace.into(),
            repositories,
        }
    }

    /// Override the API base URL (tests, Bitbucket-compatible mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn repo_url(&self, repository: &str, tail: &str) -> String {
        format!(
            "{}/2.0/repositories/{}/{}/{}",
            self.base_url, self.workspace, repository, tail
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.app_password))
            .send()
            .await
            .map_err(|e| Error::Host(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Host(format!("{url} returned HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Host(format!("invalid response body: {e}")))
    }

    /// Follow `values`/`next` pagination until exhausted.
    async fn get_paginated<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(url) = next {
            let page: Page<T> = self.get_json(&url).await?;
            items.extend(page.values);
            next = page.next;
        }

        Ok(items)
    }
}

#[async_trait]
impl PullRequestHost for BitbucketClient {
    async fn list_open_prs(&self) -> Result<Vec<PullRequestRef>> {
        let mut prs = Vec::new();
        for repository in &self.repositories {
            let url = format!("{}?state=OPEN", self.repo_url(repository, "pullrequests"));
            let raw: Vec<PrData> = self.get_paginated(&url).await?;
            tracing::debug!(repository, count = raw.len(), "fetched open pull requests");
            prs.extend(raw.into_iter().map(|pr| pr.into_ref(repository)));
        }
        Ok(prs)
    }

    async fn pr_diff(&self, repository: &str, pr_id: u64) -> Result<String> {
        let url = self.repo_url(repository, &format!("pullrequests/{pr_id}/diff"));
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.app_password))
            .send()
            .await
            .map_err(|e| Error::Host(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Host(format!("diff fetch returned HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Host(format!("invalid diff body: {e}")))
    }

    async fn pr_comments(&self, repository: &str, pr_id: u64) -> Result<Vec<String>> {
        let url = self.repo_url(repository, &format!("pullrequests/{pr_id}/comments"));
        let comments: Vec<CommentData> = self.get_paginated(&url).await?;
        Ok(comments
            .into_iter()
            .map(|c| c.content.map(|c| c.raw).unwrap_or_default())
            .collect())
    }

    async fn post_comment(
        &self,
        repository: &str,
        pr_id: u64,
        body: &str,
        anchor: Option<CommentAnchor>,
    ) -> Result<()> {
        let url = self.repo_url(repository, &format!("pullrequests/{pr_id}/comments"));

        let mut payload = serde_json::json!({
            "content": { "raw": body }
        });
        if let Some(anchor) = anchor {
            payload["inline"] = serde_json::json!({
                "path": anchor.file_path,
                "from": anchor.line,
            });
        }

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(&self.app_password))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Host(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            // Body text is for diagnostics only; Bitbucket error payloads do
            // not echo our credentials.
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Host(format!(
                "comment post returned HTTP {status}: {text}"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PrData {
    id: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    state: String,
    author: Option<Author>,
    source: Option<Endpoint>,
    destination: Option<Endpoint>,
    created_on: Option<String>,
    updated_on: Option<String>,
}

impl PrData {
    fn into_ref(self, repository: &str) -> PullRequestRef {
        PullRequestRef {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            author: self
                .author
                .map(|a| a.display_name)
                .unwrap_or_default(),
            state: self.state,
            repository: repository.to_string(),
            source_branch: self.source.and_then(|e| e.branch.map(|b| b.name)),
            destination_branch: self.destination.and_then(|e| e.branch.map(|b| b.name)),
            created_at: parse_timestamp(self.created_on.as_deref()),
            updated_at: parse_timestamp(self.updated_on.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Author {
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    branch: Option<Branch>,
}

#[derive(Debug, Deserialize)]
struct Branch {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    content: Option<CommentContent>,
}

#[derive(Debug, Deserialize)]
struct CommentContent {
    #[serde(default)]
    raw: String,
}

fn parse_timestamp(value: Option<&str>) -> Option<OffsetDateTime> {
    value.and_then(|v| OffsetDateTime::parse(v, &Rfc3339).ok())
}
