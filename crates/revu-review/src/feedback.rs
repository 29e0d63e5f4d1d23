//! AI feedback parsing
//!
//! Recognized structured form: a feedback block starts with a severity
//! marker line, optionally prefixed with a file/line reference:
//!
//! ```text
//! src/login.rs:42: P0: credentials compared without constant-time equality
//! additional explanation lines belong to the same block
//!
//! P2: consider renaming this module
//! ```
//!
//! Blocks without a file/line reference become summary-level comments, which
//! classification later withholds from inline posting.

use regex::Regex;
use revu_core::{ReviewComment, Severity};

pub struct FeedbackParser {
    located: Regex,
    marker: Regex,
}

impl FeedbackParser {
    pub fn new() -> Self {
        Self {
            located: Regex::new(
                r"^\s*(?P<file>[\w][\w ./+-]*):(?P<line>\d+):?\s*\**(?P<sev>P[012])\**:\s*(?P<msg>.+)$",
            )
            .unwrap(),
            marker: Regex::new(r"^\s*\**(?P<sev>P[012])\**:\s*(?P<msg>.+)$").unwrap(),
        }
    }

    pub fn parse(&self, feedback: &str) -> Vec<ReviewComment> {
        let mut comments: Vec<ReviewComment> = Vec::new();
        let mut current: Option<ReviewComment> = None;

        for raw_line in feedback.lines() {
            let line = raw_line.trim_end();

            if line.trim().is_empty() {
                // Blank line terminates the current block.
                if let Some(c) = current.take() {
                    comments.push(c);
                }
                continue;
            }

            if let Some(caps) = self.located.captures(line) {
                if let Some(c) = current.take() {
                    comments.push(c);
                }
                let severity = parse_severity(&caps["sev"]);
                let number = caps["line"].parse::<u32>().unwrap_or(0);
                current = Some(ReviewComment::inline(
                    caps["file"].trim(),
                    number,
                    severity,
                    caps["msg"].trim(),
                ));
            } else if let Some(caps) = self.marker.captures(line) {
                if let Some(c) = current.take() {
                    comments.push(c);
                }
                let severity = parse_severity(&caps["sev"]);
                current = Some(ReviewComment::summary(severity, caps["msg"].trim()));
            } else if let Some(c) = current.as_mut() {
                // Continuation line of the open block.
                c.body.push(' ');
                c.body.push_str(line.trim());
            }
            // Prose before the first marker is ignored.
        }

        if let Some(c) = current {
            comments.push(c);
        }
        comments
    }
}

impl Default for FeedbackParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_severity(s: &str) -> Severity {
    match s {
        "P0" => Severity::P0,
        "P1" => Severity::P1,
        _ => Severity::P2,
    }
}
