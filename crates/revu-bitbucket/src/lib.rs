//! Bitbucket Cloud collaborator
//!
//! The review core talks to Bitbucket only through the [`PullRequestHost`]
//! trait; the `reqwest`-backed [`BitbucketClient`] is the production
//! implementation. Workflow tests substitute a mock host.

pub mod client;
pub mod host;

pub use client::BitbucketClient;
pub use host::{CommentAnchor, PullRequestHost};
