use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use super::lcs::DiffOp;
use super::rows::change_blocks;

/// Size of one document, counted over its split lines
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub lines: usize,
    /// Characters including the newlines between lines
    pub characters: usize,
    pub words: usize,
}

impl DocumentStats {
    pub fn of_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut stats = Self {
            lines: lines.len(),
            characters: lines.len().saturating_sub(1),
            words: 0,
        };
        for line in lines {
            let line = line.as_ref();
            stats.characters += line.chars().count();
            stats.words += line.split_whitespace().count();
        }
        stats
    }

    pub fn of(text: &str) -> Self {
        Self::of_lines(&super::split_lines(text))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub original: DocumentStats,
    pub revised: DocumentStats,
    pub added_lines: usize,
    pub removed_lines: usize,
    /// `added_lines + removed_lines`
    pub changed_lines: usize,
    /// Characters inserted inside change blocks, compared char by char
    pub added_chars: usize,
    pub removed_chars: usize,
}

impl DiffStats {
    pub fn compute<A: AsRef<str>, B: AsRef<str>>(original: &[A], revised: &[B], ops: &[DiffOp]) -> Self {
        let mut stats = Self {
            original: DocumentStats::of_lines(original),
            revised: DocumentStats::of_lines(revised),
            ..Self::default()
        };

        for op in ops {
            match op {
                DiffOp::Added { .. } => stats.added_lines += 1,
                DiffOp::Removed { .. } => stats.removed_lines += 1,
                DiffOp::Unchanged { .. } => {}
            }
        }
        stats.changed_lines = stats.added_lines + stats.removed_lines;

        for block in change_blocks(ops) {
            let mut removed = String::new();
            let mut added = String::new();
            for op in &ops[block] {
                match *op {
                    DiffOp::Removed { original: i } => removed.push_str(original[i].as_ref()),
                    DiffOp::Added { revised: j } => added.push_str(revised[j].as_ref()),
                    DiffOp::Unchanged { .. } => {}
                }
            }
            let (inserted, deleted) = char_changes(&removed, &added);
            stats.added_chars += inserted;
            stats.removed_chars += deleted;
        }

        stats
    }
}

/// Characters inserted and deleted going from `old` to `new`
pub fn char_changes(old: &str, new: &str) -> (usize, usize) {
    let mut inserted = 0;
    let mut deleted = 0;
    let diff = TextDiff::from_chars(old, new);
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => inserted += change.value().chars().count(),
            ChangeTag::Delete => deleted += change.value().chars().count(),
            ChangeTag::Equal => {}
        }
    }
    (inserted, deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::lcs::diff_ops;

    #[test]
    fn document_counts() {
        let stats = DocumentStats::of("hello world\nsecond line here\n");
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.words, 5);
        assert_eq!(stats.characters, "hello world\nsecond line here\n".len());
    }

    #[test]
    fn empty_document() {
        assert_eq!(DocumentStats::of(""), DocumentStats::default());
    }

    #[test]
    fn char_counting_english() {
        assert_eq!(char_changes("hello cat", "hello dog"), (3, 3));
    }

    #[test]
    fn char_counting_chinese() {
        assert_eq!(char_changes("我爱你", "我不爱你"), (1, 0));
    }

    #[test]
    fn line_and_char_counts() {
        let a = ["one", "two", "three"];
        let b = ["one", "TWO", "three", "four"];
        let stats = DiffStats::compute(&a, &b, &diff_ops(&a, &b));
        assert_eq!(stats.added_lines, 2);
        assert_eq!(stats.removed_lines, 1);
        assert_eq!(stats.changed_lines, 3);
        assert_eq!(stats.original.lines, 3);
        assert_eq!(stats.revised.lines, 4);
        // "two" -> "TWO" is three deletions and three insertions; "four" is a block of its own
        assert_eq!(stats.removed_chars, 3);
        assert_eq!(stats.added_chars, 7);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(DiffStats::default()).unwrap();
        assert!(json.get("changedLines").is_some());
        assert!(json.get("addedChars").is_some());
    }
}
