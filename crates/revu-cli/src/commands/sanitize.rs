use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use revu_sanitize::{PatternRegistry, Sanitizer};

pub fn handle(file: Option<PathBuf>) -> Result<()> {
    let input = match &file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let sanitizer = Sanitizer::new(PatternRegistry::builtin());
    let sanitized = sanitizer.sanitize(&input);

    print!("{}", sanitized.text);

    // Counts only; the matched content never leaves the sanitizer.
    if sanitized.report.total() > 0 {
        eprintln!();
        eprintln!("Redactions:");
        for (pattern_id, count) in sanitized.report.counts_by_pattern() {
            eprintln!("  {}: {}", pattern_id, count);
        }
    } else {
        eprintln!();
        eprintln!("No credentials detected.");
    }
    Ok(())
}
