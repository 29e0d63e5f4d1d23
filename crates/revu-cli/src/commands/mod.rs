pub mod mcp;
pub mod prs;
pub mod sanitize;

use anyhow::Result;
use revu_bitbucket::BitbucketClient;
use revu_config::Config;
use revu_review::ReviewEngine;

/// Build the review engine from configuration.
pub fn build_engine(config: &Config) -> Result<ReviewEngine<BitbucketClient>> {
    if config.bitbucket.username.is_empty() || config.bitbucket.app_password.is_empty() {
        anyhow::bail!(
            "Bitbucket credentials missing; set BITBUCKET_USERNAME and BITBUCKET_APP_PASSWORD"
        );
    }
    if config.bitbucket.repositories.is_empty() {
        anyhow::bail!("No repositories configured; set BITBUCKET_REPOSITORIES");
    }

    let client = BitbucketClient::new(
        config.bitbucket.username.clone(),
        config.bitbucket.app_password.clone(),
        config.bitbucket.workspace.clone(),
        config.bitbucket.repositories.clone(),
    );
    Ok(ReviewEngine::new(client).with_max_comments(config.review.max_comments_per_pr))
}
