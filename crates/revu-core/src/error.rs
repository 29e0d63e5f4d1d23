use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no pull request matched '{0}'")]
    NotFound(String),

    #[error("pull request #{0} already has an AI review")]
    AlreadyReviewed(u64),

    #[error("posting requires an explicit confirmation")]
    NotConfirmed,

    #[error("malformed diff: {0}")]
    MalformedDiff(String),

    #[error("Bitbucket error: {0}")]
    Host(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
