//! Resolved operation intents
//!
//! The natural-language layer (out of scope here) collapses the many user
//! phrasings into this small enum before the workflow ever sees a request,
//! so the state machine stays free of string-matching concerns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// List open pull requests across all configured repositories.
    List,
    /// Review every open PR and post automatically, skipping reviewed ones.
    ReviewAllAuto,
    /// Review one PR and post automatically.
    ReviewOneAuto { identifier: String },
    /// Review one PR, preview the comments, and wait for confirmation.
    ReviewOneConfirm { identifier: String },
}
