//! Core domain models for revu
//!
//! This crate contains:
//! - Domain models (PullRequestRef, ReviewComment, DiffLine, ReviewDecision)
//! - The `[AI - Review]` marker and comment formatting
//! - Error taxonomy shared across the workspace

pub mod error;
pub mod intent;
pub mod model;

pub use error::{Error, Result};
pub use intent::Intent;
pub use model::{
    AI_REVIEW_MARKER, ChangeKind, DiffLine, PostOutcome, PostReport, PostStatus, PullRequestRef,
    ReviewComment, ReviewDecision, ReviewMode, Severity, SkipReason, SkippedComment,
};
