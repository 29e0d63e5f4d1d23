//! Credential pattern registry
//!
//! Patterns are applied in registration order; where two patterns could
//! match overlapping spans, the earlier one wins because it rewrites the
//! text before later patterns run (see [`crate::Sanitizer`]).

use regex::Regex;

/// Token substituted for every matched secret span.
pub const REDACTED: &str = "[REDACTED]";

/// How much of a match gets replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redaction {
    /// Replace the whole match.
    Full,
    /// Replace only the `secret` named capture group, preserving the
    /// structural context around it (e.g. a connection string's host/port).
    KeepContext,
}

/// One credential-detection rule.
#[derive(Debug, Clone)]
pub struct CredentialPattern {
    pub id: String,
    pub description: String,
    pub regex: Regex,
    pub redaction: Redaction,
}

impl CredentialPattern {
    /// Compile a rule from a user-supplied pattern string.
    ///
    /// `KeepContext` rules must define a `secret` named group; rules without
    /// one fall back to replacing the whole match.
    pub fn try_new(
        id: impl Into<String>,
        description: impl Into<String>,
        pattern: &str,
        redaction: Redaction,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            id: id.into(),
            description: description.into(),
            regex: Regex::new(pattern)?,
            redaction,
        })
    }

    fn builtin(id: &str, description: &str, pattern: &str, redaction: Redaction) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            regex: Regex::new(pattern).unwrap(),
            redaction,
        }
    }
}

/// Ordered, immutable set of credential patterns.
///
/// Constructed once at startup and passed explicitly into the sanitizer so
/// tests can swap in custom sets.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<CredentialPattern>,
}

impl PatternRegistry {
    pub fn new(patterns: Vec<CredentialPattern>) -> Self {
        Self { patterns }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CredentialPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Built-in rules, most specific first.
    pub fn builtin() -> Self {
        use Redaction::{Full, KeepContext};

        let patterns = vec![
            CredentialPattern::builtin(
                "private-key-block",
                "PEM-style private key block",
                r"(?s)-----BEGIN [A-Z ]*PRIVATE KEY-----.*?-----END [A-Z ]*PRIVATE KEY-----",
                Full,
            ),
            CredentialPattern::builtin(
                "private-key-header",
                "PEM private key header (truncated block)",
                r"-----BEGIN [A-Z ]*PRIVATE KEY-----",
                Full,
            ),
            CredentialPattern::builtin(
                "jwt",
                "JWT-shaped three-segment token",
                r"\beyJ[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]{4,}",
                Full,
            ),
            CredentialPattern::builtin(
                "aws-access-key-id",
                "AWS access key id",
                r"\bAKIA[0-9A-Z]{16}\b",
                Full,
            ),
            CredentialPattern::builtin(
                "stripe-key",
                "Stripe secret/publishable key",
                r"\b[sp]k_(?:live|test)_[A-Za-z0-9]{16,64}\b",
                Full,
            ),
            CredentialPattern::builtin(
                "openai-key",
                "OpenAI API key",
                r"\bsk-(?:proj-)?[A-Za-z0-9]{20,64}\b",
                Full,
            ),
            CredentialPattern::builtin(
                "github-token",
                "GitHub personal/app token",
                r"\bgh[pousr]_[A-Za-z0-9]{36,255}\b",
                Full,
            ),
            CredentialPattern::builtin(
                "slack-token",
                "Slack bot/user token",
                r"\bxox[bpas]-[A-Za-z0-9-]{10,}",
                Full,
            ),
            CredentialPattern::builtin(
                "connection-string",
                "Database URL with embedded password",
                r"\b(?:postgres(?:ql)?|mysql|mongodb(?:\+srv)?|redis|amqps?)://[^:/\s@]+:(?P<secret>[^@\s]+)@",
                KeepContext,
            ),
            CredentialPattern::builtin(
                "bearer-token",
                "Authorization bearer token",
                r"(?i)\bbearer\s+(?P<secret>[A-Za-z0-9._=-]{20,})",
                KeepContext,
            ),
            CredentialPattern::builtin(
                "secret-assignment",
                "Quoted assignment to a secret-named variable",
                r#"(?i)\b[\w.-]*(?:secret|password|passwd|pwd|token|api[_-]?key|auth|key)[\w.-]*\s*[:=]\s*["'](?P<secret>[^"']+)["']"#,
                KeepContext,
            ),
            CredentialPattern::builtin(
                "env-secret-assignment",
                "Unquoted env-style assignment to a secret-named variable",
                r#"\b[A-Z][A-Z0-9_]*(?:SECRET|PASSWORD|TOKEN|KEY|AUTH)[A-Z0-9_]*\s*=\s*(?P<secret>[^\s"']+)"#,
                KeepContext,
            ),
            CredentialPattern::builtin(
                "hex-secret",
                "Long hex string in assignment context",
                r#"[:=]\s*["']?(?P<secret>[a-fA-F0-9]{32,})["']?"#,
                KeepContext,
            ),
            CredentialPattern::builtin(
                "base64-secret",
                "Long base64 string in assignment context",
                r#"[:=]\s*["'](?P<secret>[A-Za-z0-9+/]{24,}={0,2})["']"#,
                KeepContext,
            ),
        ];

        Self { patterns }
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_patterns_compile() {
        let registry = PatternRegistry::builtin();
        assert!(registry.len() >= 10);
    }

    #[test]
    fn test_keep_context_patterns_have_secret_group() {
        let registry = PatternRegistry::builtin();
        for pattern in registry.iter() {
            if pattern.redaction == Redaction::KeepContext {
                assert!(
                    pattern
                        .regex
                        .capture_names()
                        .any(|n| n == Some("secret")),
                    "{} lacks a secret group",
                    pattern.id
                );
            }
        }
    }

    #[test]
    fn test_try_new_rejects_bad_pattern() {
        let result = CredentialPattern::try_new("bad", "unclosed group", "(", Redaction::Full);
        assert!(result.is_err());
    }

    #[test]
    fn test_pattern_ids_unique() {
        let registry = PatternRegistry::builtin();
        let mut ids: Vec<&str> = registry.iter().map(|p| p.id.as_str()).collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }
}
