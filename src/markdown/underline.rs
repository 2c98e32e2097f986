//! Redmine underline: `_text_` renders as `<u>text</u>`.
//!
//! The rule sits in front of native emphasis so it gets first refusal on
//! every single underscore. Double underscores are never claimed, so bold
//! keeps working. The text between the delimiters is emitted as-is; markup
//! inside an underline span is not interpreted.

use super::host::InlineHost;
use super::inline::{InlineRule, InlineState};
use super::token::Token;

pub const UNDERLINE_TAG: &str = "u";
const MARKER: char = '_';

pub struct UnderlineRule;

impl UnderlineRule {
    /// Length of the underline span starting at `pos`, if there is one.
    ///
    /// Never emits tokens or moves the cursor.
    pub fn match_at<H: InlineHost + ?Sized>(host: &H, pos: usize) -> Option<usize> {
        if host.peek(pos) != Some(MARKER) {
            return None;
        }
        if pos + 1 >= host.pos_max() || host.peek(pos + 1) == Some(MARKER) {
            return None;
        }
        if host.scan_delimiter_run(pos, false).length != 1 {
            return None;
        }
        if host.prev_char(pos).is_some_and(char::is_alphanumeric) {
            return None;
        }

        let mut cursor = pos + 1;
        while let Some(c) = host.peek(cursor) {
            if c == MARKER && Self::is_closer(host, cursor) {
                return Some(cursor + 1 - pos);
            }
            cursor += c.len_utf8();
        }
        None
    }

    /// Emit the open/text/close triple for a span of `len` bytes at `pos`
    /// and move the cursor past the closing underscore.
    pub fn emit<H: InlineHost + ?Sized>(host: &mut H, pos: usize, len: usize) {
        let content = host.slice(pos + 1, pos + len - 1).to_string();
        let markup = MARKER.to_string();

        host.emit_token(Token::open(UNDERLINE_TAG, markup.clone()));
        host.emit_token(Token::text(content));
        host.emit_token(Token::close(UNDERLINE_TAG, markup));
        host.advance((pos + len).saturating_sub(host.pos()));
    }

    fn is_closer<H: InlineHost + ?Sized>(host: &H, pos: usize) -> bool {
        let single = host.scan_delimiter_run(pos, true).length == 1
            && host.scan_delimiter_run(pos, false).length == 1;
        single
            && !Self::is_escaped(host, pos)
            && !host
                .peek(pos + MARKER.len_utf8())
                .is_some_and(char::is_alphanumeric)
    }

    fn is_escaped<H: InlineHost + ?Sized>(host: &H, pos: usize) -> bool {
        let backslashes = host
            .slice(0, pos)
            .chars()
            .rev()
            .take_while(|&c| c == '\\')
            .count();
        backslashes % 2 == 1
    }
}

impl InlineRule for UnderlineRule {
    fn name(&self) -> &'static str {
        "underline"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        Self::match_at(state, pos)
    }

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize) {
        Self::emit(state, pos, len);
    }
}
