use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::lcs::DiffOp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Unchanged,
    Added,
    Removed,
    /// Placeholder opposite an added or removed line
    Empty,
}

/// One cell of the side-by-side view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    #[serde(rename = "type")]
    pub kind: RowKind,
    pub content: String,
    /// 1-based line number in this side's document; `None` for placeholders
    #[serde(rename = "lineNumber")]
    pub line_number: Option<usize>,
}

impl DiffRow {
    fn line(kind: RowKind, content: &str, index: usize) -> Self {
        Self {
            kind,
            content: content.to_string(),
            line_number: Some(index + 1),
        }
    }

    pub fn empty() -> Self {
        Self {
            kind: RowKind::Empty,
            content: String::new(),
            line_number: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == RowKind::Empty
    }
}

/// Lay the edit script out as two aligned columns. Row `k` of either column
/// belongs to `ops[k]`.
pub fn project_rows<A: AsRef<str>, B: AsRef<str>>(
    original: &[A],
    revised: &[B],
    ops: &[DiffOp],
) -> (Vec<DiffRow>, Vec<DiffRow>) {
    let mut left = Vec::with_capacity(ops.len());
    let mut right = Vec::with_capacity(ops.len());

    for op in ops {
        match *op {
            DiffOp::Unchanged {
                original: i,
                revised: j,
            } => {
                left.push(DiffRow::line(RowKind::Unchanged, original[i].as_ref(), i));
                right.push(DiffRow::line(RowKind::Unchanged, revised[j].as_ref(), j));
            }
            DiffOp::Removed { original: i } => {
                left.push(DiffRow::line(RowKind::Removed, original[i].as_ref(), i));
                right.push(DiffRow::empty());
            }
            DiffOp::Added { revised: j } => {
                left.push(DiffRow::empty());
                right.push(DiffRow::line(RowKind::Added, revised[j].as_ref(), j));
            }
        }
    }

    (left, right)
}

/// The lines of one column with the placeholders filtered out
pub fn content_lines(rows: &[DiffRow]) -> Vec<&str> {
    rows.iter()
        .filter(|row| !row.is_placeholder())
        .map(|row| row.content.as_str())
        .collect()
}

/// Maximal runs of consecutive added/removed operations, as index ranges
/// into `ops`
pub fn change_blocks(ops: &[DiffOp]) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut start = None;

    for (index, op) in ops.iter().enumerate() {
        match (op.is_change(), start) {
            (true, None) => start = Some(index),
            (false, Some(begin)) => {
                blocks.push(begin..index);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        blocks.push(begin..ops.len());
    }

    blocks
}

/// Removed and added rows matched up by their order inside each change block.
/// Each pair is `(removed row, added row)`, used to highlight edits within a
/// line.
pub fn paired_changes(ops: &[DiffOp]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for block in change_blocks(ops) {
        let removed = block
            .clone()
            .filter(|&k| matches!(ops[k], DiffOp::Removed { .. }));
        let added = block.filter(|&k| matches!(ops[k], DiffOp::Added { .. }));
        pairs.extend(removed.zip(added));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::lcs::diff_ops;

    fn project(a: &[&str], b: &[&str]) -> (Vec<DiffRow>, Vec<DiffRow>) {
        project_rows(a, b, &diff_ops(a, b))
    }

    #[test]
    fn columns_have_equal_length() {
        let (left, right) = project(&["a", "b", "c"], &["b", "x", "y", "c", "z"]);
        assert_eq!(left.len(), right.len());
    }

    #[test]
    fn swap_rows() {
        let (left, right) = project(&["a", "b"], &["b", "a"]);
        assert_eq!(
            left,
            vec![
                DiffRow::line(RowKind::Removed, "a", 0),
                DiffRow::line(RowKind::Unchanged, "b", 1),
                DiffRow::empty(),
            ]
        );
        assert_eq!(
            right,
            vec![
                DiffRow::empty(),
                DiffRow::line(RowKind::Unchanged, "b", 0),
                DiffRow::line(RowKind::Added, "a", 1),
            ]
        );
    }

    #[test]
    fn each_position_is_consistent() {
        let (left, right) = project(&["one", "two", "three", "four"], &["zero", "one", "three", "4"]);
        for (l, r) in left.iter().zip(&right) {
            match (l.kind, r.kind) {
                (RowKind::Unchanged, RowKind::Unchanged) => assert_eq!(l.content, r.content),
                (RowKind::Removed, RowKind::Empty) | (RowKind::Empty, RowKind::Added) => {}
                other => panic!("inconsistent row pair {other:?}"),
            }
        }
    }

    #[test]
    fn placeholders_are_filtered() {
        let (left, right) = project(&["a", "b"], &["b", "a"]);
        assert_eq!(content_lines(&left), vec!["a", "b"]);
        assert_eq!(content_lines(&right), vec!["b", "a"]);
    }

    #[test]
    fn row_wire_shape() {
        let json = serde_json::to_value(DiffRow::line(RowKind::Added, "x", 0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "added", "content": "x", "lineNumber": 1})
        );
        let json = serde_json::to_value(DiffRow::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "empty", "content": "", "lineNumber": null})
        );
    }

    #[test]
    fn blocks_and_pairs() {
        let ops = diff_ops(&["a", "b", "c", "d"], &["a", "B", "c", "D", "E"]);
        assert_eq!(change_blocks(&ops), vec![1..3, 4..7]);
        assert_eq!(paired_changes(&ops), vec![(1, 2), (4, 5)]);
    }

    #[test]
    fn no_changes_no_blocks() {
        let ops = diff_ops(&["a"], &["a"]);
        assert!(change_blocks(&ops).is_empty());
        assert!(paired_changes(&ops).is_empty());
    }
}
