use serde::Serialize;

/// Above this many table cells the diff still runs, but memory use is worth a
/// log line
pub const LARGE_TABLE_CELLS: usize = 4_000_000;

/// One step of the edit script turning the original into the revision.
/// Indices are 0-based positions in the respective line sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffOp {
    Unchanged { original: usize, revised: usize },
    Added { revised: usize },
    Removed { original: usize },
}

impl DiffOp {
    pub fn is_change(&self) -> bool {
        !matches!(self, DiffOp::Unchanged { .. })
    }
}

/// Longest-common-subsequence lengths for every pair of prefixes, stored
/// row-major in a single allocation
pub struct LcsTable {
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    pub fn build<A: AsRef<str>, B: AsRef<str>>(original: &[A], revised: &[B]) -> Self {
        let rows = original.len() + 1;
        let cols = revised.len() + 1;
        let size = rows.saturating_mul(cols);
        if size > LARGE_TABLE_CELLS {
            tracing::warn!(
                "Large diff table: {} x {} lines ({} cells)",
                original.len(),
                revised.len(),
                size
            );
        }

        let mut cells = vec![0u32; size];
        for i in 1..rows {
            let line = original[i - 1].as_ref();
            for j in 1..cols {
                cells[i * cols + j] = if line == revised[j - 1].as_ref() {
                    cells[(i - 1) * cols + j - 1] + 1
                } else {
                    cells[(i - 1) * cols + j].max(cells[i * cols + j - 1])
                };
            }
        }

        Self { cols, cells }
    }

    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }

    /// Length of the longest common subsequence of the full inputs
    pub fn lcs_len(&self) -> usize {
        self.cells.last().copied().unwrap_or(0) as usize
    }
}

/// Edit script from `original` to `revised`, in document order.
///
/// When dropping a line from either side scores the same, the revised line is
/// emitted as `Added` first. Backtracking runs from the end, so after
/// reversal removals come out ahead of the additions they tie with. Other
/// minimal scripts exist; this order is kept stable for output compatibility.
pub fn diff_ops<A: AsRef<str>, B: AsRef<str>>(original: &[A], revised: &[B]) -> Vec<DiffOp> {
    let table = LcsTable::build(original, revised);
    let mut ops = Vec::with_capacity(original.len() + revised.len() - table.lcs_len());

    let (mut i, mut j) = (original.len(), revised.len());
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && original[i - 1].as_ref() == revised[j - 1].as_ref() {
            ops.push(DiffOp::Unchanged {
                original: i - 1,
                revised: j - 1,
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table.get(i, j - 1) >= table.get(i - 1, j)) {
            ops.push(DiffOp::Added { revised: j - 1 });
            j -= 1;
        } else {
            ops.push(DiffOp::Removed { original: i - 1 });
            i -= 1;
        }
    }

    ops.reverse();
    ops
}
