//! The surface an inline rule sees of the parser that hosts it.
//!
//! Rules are written against [`InlineHost`] rather than the concrete parser
//! state, so a rule can be driven by any cursor over a text buffer that can
//! append tokens.

use super::token::Token;

/// A maximal run of one repeated marker character, with CommonMark flanking flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterRun {
    pub marker: char,
    pub length: usize,
    pub can_open: bool,
    pub can_close: bool,
}

impl DelimiterRun {
    fn empty(marker: char) -> Self {
        Self {
            marker,
            length: 0,
            can_open: false,
            can_close: false,
        }
    }
}

pub trait InlineHost {
    /// The inline buffer being tokenized
    fn src(&self) -> &str;

    /// Cursor, as a byte offset into `src`
    fn pos(&self) -> usize;

    /// End of the inline buffer (exclusive)
    fn pos_max(&self) -> usize;

    /// Append a token, flushing any pending plain text first
    fn emit_token(&mut self, token: Token);

    /// Move the cursor forward by `n` bytes
    fn advance(&mut self, n: usize);

    fn peek(&self, pos: usize) -> Option<char> {
        if pos >= self.pos_max() {
            return None;
        }
        self.src().get(pos..)?.chars().next()
    }

    fn prev_char(&self, pos: usize) -> Option<char> {
        self.src().get(..pos)?.chars().next_back()
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        self.src().get(start..end).unwrap_or("")
    }

    fn scan_delimiter_run(&self, pos: usize, forward: bool) -> DelimiterRun {
        scan_delimiter_run(self.src(), pos, self.pos_max(), forward)
    }
}

/// Measure the delimiter run at `pos`.
///
/// Going `forward`, the run starts at `pos` and extends right; otherwise it
/// ends at `pos` (inclusive) and extends left. Flanking is judged on the
/// characters surrounding the whole run, with the buffer edges counting as
/// whitespace. Underscores may not open or close inside a word.
pub fn scan_delimiter_run(src: &str, pos: usize, pos_max: usize, forward: bool) -> DelimiterRun {
    let pos_max = pos_max.min(src.len());
    let Some(marker) = src.get(pos..pos_max).and_then(|rest| rest.chars().next()) else {
        return DelimiterRun::empty('\0');
    };
    let width = marker.len_utf8();

    let (start, length) = if forward {
        let length = src[pos..pos_max]
            .chars()
            .take_while(|&c| c == marker)
            .count();
        (pos, length)
    } else {
        let length = src[..pos + width]
            .chars()
            .rev()
            .take_while(|&c| c == marker)
            .count();
        (pos + width - length * width, length)
    };
    let end = start + length * width;

    let last = src[..start].chars().next_back().unwrap_or(' ');
    let next = src[end..pos_max].chars().next().unwrap_or(' ');

    let last_is_space = last.is_whitespace();
    let next_is_space = next.is_whitespace();
    let last_is_punct = is_punctuation(last);
    let next_is_punct = is_punctuation(next);

    let left_flanking =
        !next_is_space && (!next_is_punct || last_is_space || last_is_punct);
    let right_flanking =
        !last_is_space && (!last_is_punct || next_is_space || next_is_punct);

    let can_split_word = marker != '_';
    DelimiterRun {
        marker,
        length,
        can_open: left_flanking && (can_split_word || !right_flanking || last_is_punct),
        can_close: right_flanking && (can_split_word || !left_flanking || next_is_punct),
    }
}

pub fn is_punctuation(c: char) -> bool {
    !c.is_whitespace() && !c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_run_counts_repeated_markers() {
        let run = scan_delimiter_run("__bold__", 0, 8, true);
        assert_eq!(run.length, 2);
        assert!(run.can_open);
        assert!(!run.can_close);
    }

    #[test]
    fn backward_run_ends_at_position() {
        let run = scan_delimiter_run("__bold__", 7, 8, false);
        assert_eq!(run.marker, '_');
        assert_eq!(run.length, 2);
        assert!(run.can_close);
        assert!(!run.can_open);
    }

    #[test]
    fn underscore_inside_word_neither_opens_nor_closes() {
        let run = scan_delimiter_run("snake_case", 5, 10, true);
        assert_eq!(run.length, 1);
        assert!(!run.can_open);
        assert!(!run.can_close);
    }

    #[test]
    fn star_inside_word_can_do_both() {
        let run = scan_delimiter_run("a*b", 1, 3, true);
        assert!(run.can_open);
        assert!(run.can_close);
    }

    #[test]
    fn position_past_end_is_empty_run() {
        let run = scan_delimiter_run("abc", 3, 3, true);
        assert_eq!(run.length, 0);
    }
}
