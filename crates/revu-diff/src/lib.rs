//! Unified diff analysis
//!
//! Segments a raw diff into per-file, per-line change records with new-file
//! line numbers, sanitizing every line before it is recorded. Also provides
//! the anchor index used to validate comment line anchors and a small
//! pattern-based issue scan over changed lines.

pub mod analyzer;
pub mod anchors;
pub mod issues;

pub use analyzer::{AnalyzedDiff, DiffAnalyzer};
pub use anchors::AnchorIndex;
pub use issues::{IssueRule, IssueScan};
