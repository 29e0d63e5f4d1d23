//! Pattern-based issue detection over changed lines
//!
//! A cheap pre-pass that flags obvious problems in added lines before the
//! AI collaborator ever sees the diff. Findings become regular
//! [`ReviewComment`]s and go through the same classification as AI feedback.

use regex::Regex;
use revu_core::{ChangeKind, DiffLine, ReviewComment, Severity};

/// One heuristic rule applied to added lines.
pub struct IssueRule {
    pub id: &'static str,
    pub regex: Regex,
    pub severity: Severity,
    pub message: &'static str,
}

pub struct IssueScan {
    rules: Vec<IssueRule>,
}

impl IssueScan {
    pub fn new(rules: Vec<IssueRule>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        let rules = vec![
            IssueRule {
                id: "todo-marker",
                regex: Regex::new(r"(?i)(?://|#)\s*(?:TODO|FIXME)\b").unwrap(),
                severity: Severity::P2,
                message: "Leftover TODO/FIXME marker",
            },
            IssueRule {
                id: "debug-print",
                regex: Regex::new(r"\b(?:println!|dbg!|print\(|NSLog\(|console\.log\()").unwrap(),
                severity: Severity::P2,
                message: "Debug print statement; use the project logger instead",
            },
            IssueRule {
                id: "force-unwrap",
                regex: Regex::new(r"(?:\.unwrap\(\)|\bas!\s|\w!\.)").unwrap(),
                severity: Severity::P1,
                message: "Force unwrap can crash on the failure path",
            },
        ];
        Self { rules }
    }

    /// Scan added lines; first matching rule per line wins.
    pub fn scan(&self, lines: &[DiffLine]) -> Vec<ReviewComment> {
        let mut findings = Vec::new();
        for line in lines {
            if line.kind != ChangeKind::Added {
                continue;
            }
            let Some(n) = line.new_line else { continue };
            for rule in &self.rules {
                if rule.regex.is_match(&line.text) {
                    findings.push(ReviewComment::inline(
                        line.file_path.clone(),
                        n,
                        rule.severity,
                        rule.message,
                    ));
                    break;
                }
            }
        }
        findings
    }
}

impl Default for IssueScan {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added(path: &str, n: u32, text: &str) -> DiffLine {
        DiffLine {
            file_path: path.to_string(),
            new_line: Some(n),
            kind: ChangeKind::Added,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_scan_flags_todo_and_print() {
        let lines = vec![
            added("a.rs", 1, "// TODO: handle errors"),
            added("a.rs", 2, "println!(\"debug\");"),
            added("a.rs", 3, "let x = 1;"),
        ];
        let findings = IssueScan::builtin().scan(&lines);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line_number, Some(1));
        assert_eq!(findings[0].severity, Severity::P2);
    }

    #[test]
    fn test_scan_ignores_context_and_removed() {
        let lines = vec![DiffLine {
            file_path: "a.rs".to_string(),
            new_line: Some(1),
            kind: ChangeKind::Context,
            text: "// TODO old".to_string(),
        }];
        assert!(IssueScan::builtin().scan(&lines).is_empty());
    }

    #[test]
    fn test_force_unwrap_is_p1() {
        let findings = IssueScan::builtin().scan(&[added("a.rs", 9, "val.unwrap();")]);
        assert_eq!(findings[0].severity, Severity::P1);
    }
}
