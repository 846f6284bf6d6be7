//! Line-level diff of two structs, for display.
//!
//! Both structs are rendered as pretty-printed JSON and compared line by
//! line with the `similar` crate (Myers diff algorithm), grouped into hunks
//! with context lines.

use gramps_types::Value;
use similar::{ChangeTag, TextDiff};

use crate::error::{DiffError, DiffResult};

/// Context lines kept around each change.
const CONTEXT_LINES: usize = 3;

/// The result of diffing the rendered text of two structs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructTextDiff {
    pub hunks: Vec<DiffHunk>,
}

impl StructTextDiff {
    /// Returns `true` if both structs render identically.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn additions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    pub fn deletions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }

    fn lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.hunks.iter().flat_map(|h| &h.lines)
    }
}

/// A contiguous region of changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffHunk {
    /// Line number in the old rendering where this hunk starts (1-based).
    pub old_start: usize,
    /// Line number in the new rendering where this hunk starts (1-based).
    pub new_start: usize,
    pub lines: Vec<DiffLine>,
}

/// A single line in a diff hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

/// Render a struct the way [`diff_struct_text`] compares it.
pub fn render(value: &Value) -> DiffResult<String> {
    serde_json::to_string_pretty(&value.to_json())
        .map_err(|e| DiffError::Serialization(e.to_string()))
}

/// Compute a line diff between the pretty JSON of two structs.
pub fn diff_struct_text(old: &Value, new: &Value) -> DiffResult<StructTextDiff> {
    let old_text = render(old)?;
    let new_text = render(new)?;
    if old_text == new_text {
        return Ok(StructTextDiff { hunks: Vec::new() });
    }

    let text_diff = TextDiff::from_lines(&old_text, &new_text);
    let hunks = text_diff
        .grouped_ops(CONTEXT_LINES)
        .iter()
        .filter_map(|group| {
            let first = group.first()?;
            let lines = group
                .iter()
                .flat_map(|op| text_diff.iter_changes(op))
                .map(|change| {
                    let text = change.value().trim_end_matches('\n').to_string();
                    match change.tag() {
                        ChangeTag::Equal => DiffLine::Context(text),
                        ChangeTag::Delete => DiffLine::Removed(text),
                        ChangeTag::Insert => DiffLine::Added(text),
                    }
                })
                .collect();
            Some(DiffHunk {
                old_start: first.old_range().start + 1,
                new_start: first.new_range().start + 1,
                lines,
            })
        })
        .collect();

    Ok(StructTextDiff { hunks })
}
