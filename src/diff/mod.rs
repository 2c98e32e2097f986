//! Line-level diff between two documents, laid out for a side-by-side view.

mod lcs;
mod rows;
mod stats;

use serde::Serialize;

pub use lcs::{DiffOp, LARGE_TABLE_CELLS, LcsTable, diff_ops};
pub use rows::{DiffRow, RowKind, change_blocks, content_lines, paired_changes, project_rows};
pub use stats::{DiffStats, DocumentStats, char_changes};

/// Everything the review view needs for one original/revised pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDiff {
    pub operations: Vec<DiffOp>,
    pub original_rows: Vec<DiffRow>,
    pub revised_rows: Vec<DiffRow>,
    pub stats: DiffStats,
}

impl LineDiff {
    pub fn is_identical(&self) -> bool {
        self.stats.changed_lines == 0
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Split a document into lines on `\n`, dropping a `\r` before each break.
///
/// The empty document has no lines; a trailing newline leaves a final empty
/// line.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

pub fn compute_line_diff(original: &str, revised: &str) -> LineDiff {
    diff_lines(&split_lines(original), &split_lines(revised))
}

pub fn diff_lines<A: AsRef<str>, B: AsRef<str>>(original: &[A], revised: &[B]) -> LineDiff {
    tracing::debug!(
        "Diffing {} original lines against {} revised lines",
        original.len(),
        revised.len()
    );
    let operations = diff_ops(original, revised);
    let (original_rows, revised_rows) = project_rows(original, revised, &operations);
    let stats = DiffStats::compute(original, revised, &operations);

    LineDiff {
        operations,
        original_rows,
        revised_rows,
        stats,
    }
}
