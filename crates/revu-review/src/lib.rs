//! Review orchestration
//!
//! This crate contains:
//! - PR matching (exact id, "all", ranked substring)
//! - Duplicate-review detection via the `[AI - Review]` marker
//! - AI feedback parsing into structured comments
//! - The classify/confirm/post workflow state machine
//! - The [`ReviewEngine`] that wires everything over a [`revu_bitbucket::PullRequestHost`]

pub mod engine;
pub mod feedback;
pub mod matcher;
pub mod platform;
pub mod tracker;
pub mod workflow;

pub use engine::{
    AutoReviewOutcome, IntentDispatch, PrReviewStatus, ResolveOutcome, ReviewEngine, ReviewPackage,
};
pub use feedback::FeedbackParser;
pub use matcher::match_prs;
pub use platform::Platform;
pub use tracker::already_reviewed;
pub use workflow::{AbortReason, Workflow, WorkflowState, classify};
