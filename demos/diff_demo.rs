//! Prints a side-by-side line diff and the rendered HTML of both versions
//!
//! Run with: cargo run --example diff_demo [ORIGINAL REVISED]

use reddown::diff::{RowKind, compute_line_diff};
use reddown::markdown::{Dialect, MarkdownProcessor};

const ORIGINAL: &str = "# Release notes\n\nThe parser handles _underline_.\nBold uses __two__ underscores.\n";
const REVISED: &str = "# Release notes\n\nThe parser handles _underline_ spans.\nBold uses __two__ underscores.\nTables are supported.\n";

fn marker(kind: RowKind) -> char {
    match kind {
        RowKind::Unchanged => ' ',
        RowKind::Added => '+',
        RowKind::Removed => '-',
        RowKind::Empty => ' ',
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (original, revised) = match args.as_slice() {
        [a, b] => (std::fs::read_to_string(a)?, std::fs::read_to_string(b)?),
        _ => (ORIGINAL.to_string(), REVISED.to_string()),
    };

    let diff = compute_line_diff(&original, &revised);
    for (left, right) in diff.original_rows.iter().zip(&diff.revised_rows) {
        let number = |n: Option<usize>| n.map_or(String::from("    "), |n| format!("{n:>4}"));
        println!(
            "{} {}{:<40} | {} {}{}",
            number(left.line_number),
            marker(left.kind),
            left.content,
            number(right.line_number),
            marker(right.kind),
            right.content,
        );
    }

    let stats = &diff.stats;
    println!(
        "\n+{} / -{} lines, +{} / -{} chars",
        stats.added_lines, stats.removed_lines, stats.added_chars, stats.removed_chars
    );

    let processor = MarkdownProcessor::new(Dialect::Extended);
    println!("\n--- revised, rendered ---\n{}", processor.render(&revised));
    Ok(())
}
