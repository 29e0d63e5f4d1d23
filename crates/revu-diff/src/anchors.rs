//! Comment anchor validation
//!
//! Bitbucket rejects inline comments anchored to removed lines, so the
//! workflow checks every (file, line) pair against the analyzed diff before
//! a comment is allowed through.

use std::collections::{HashMap, HashSet};

use revu_core::{ChangeKind, DiffLine};

/// Set of (file, new-revision line) positions a comment may anchor to.
#[derive(Debug, Clone, Default)]
pub struct AnchorIndex {
    positions: HashMap<String, HashSet<u32>>,
}

impl AnchorIndex {
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        let mut positions: HashMap<String, HashSet<u32>> = HashMap::new();
        for line in lines {
            if line.kind == ChangeKind::Removed {
                continue;
            }
            if let Some(n) = line.new_line {
                positions.entry(line.file_path.clone()).or_default().insert(n);
            }
        }
        Self { positions }
    }

    pub fn is_anchorable(&self, file_path: &str, line: u32) -> bool {
        self.positions
            .get(file_path)
            .is_some_and(|lines| lines.contains(&line))
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
