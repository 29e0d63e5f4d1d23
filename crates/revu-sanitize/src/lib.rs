//! Credential redaction for diff text
//!
//! Everything that leaves this process toward an AI model goes through
//! [`Sanitizer::sanitize`] first. The registry is an explicit value rather
//! than ambient state so tests can run with custom pattern sets.

pub mod pattern;
pub mod sanitizer;

pub use pattern::{CredentialPattern, PatternRegistry, REDACTED, Redaction};
pub use sanitizer::{LineSanitizer, RedactionMatch, RedactionReport, Sanitized, Sanitizer};
