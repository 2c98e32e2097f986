//! Built-in inline rules of the standard chain

use super::host::InlineHost;
use super::inline::{InlineRule, InlineState};
use super::token::{Token, TokenKind};

/// Characters that may start some other inline construct
fn is_terminator(c: char) -> bool {
    matches!(
        c,
        '\n' | '!'
            | '#'
            | '$'
            | '%'
            | '&'
            | '*'
            | '+'
            | '-'
            | ':'
            | '<'
            | '='
            | '>'
            | '@'
            | '['
            | '\\'
            | ']'
            | '^'
            | '_'
            | '`'
            | '{'
            | '}'
            | '~'
    )
}

/// Leading spaces of the line that starts at `pos`
fn leading_spaces(state: &InlineState<'_>, pos: usize) -> usize {
    state.src()[pos..state.pos_max()]
        .bytes()
        .take_while(|&b| b == b' ' || b == b'\t')
        .count()
}

pub struct TextRule;

impl InlineRule for TextRule {
    fn name(&self) -> &'static str {
        "text"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        let len: usize = state.src()[pos..state.pos_max()]
            .chars()
            .take_while(|&c| !is_terminator(c))
            .map(char::len_utf8)
            .sum();
        (len > 0).then_some(len)
    }

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize) {
        state.push_source(pos, pos + len);
        state.advance(len);
    }
}

pub struct NewlineRule;

impl InlineRule for NewlineRule {
    fn name(&self) -> &'static str {
        "newline"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        if state.peek(pos) != Some('\n') {
            return None;
        }
        Some(1 + leading_spaces(state, pos + 1))
    }

    fn commit(&self, state: &mut InlineState<'_>, _pos: usize, len: usize) {
        let pending = state.pending_mut();
        let trimmed = pending.trim_end_matches(' ').len();
        let trailing = pending.len() - trimmed;
        pending.truncate(trimmed);

        let kind = if trailing >= 2 {
            TokenKind::HardBreak
        } else {
            TokenKind::SoftBreak
        };
        state.emit_token(Token::new(kind, "br", 0));
        state.advance(len);
    }
}

pub struct EscapeRule;

impl EscapeRule {
    fn escaped(state: &InlineState<'_>, pos: usize) -> Option<char> {
        if state.peek(pos) != Some('\\') {
            return None;
        }
        state.peek(pos + 1)
    }
}

impl InlineRule for EscapeRule {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        match Self::escaped(state, pos)? {
            '\n' => Some(2 + leading_spaces(state, pos + 2)),
            c if c.is_ascii_punctuation() => Some(2),
            _ => Some(1),
        }
    }

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize) {
        match Self::escaped(state, pos) {
            Some('\n') => state.emit_token(Token::new(TokenKind::HardBreak, "br", 0)),
            Some(c) if c.is_ascii_punctuation() => state.push_pending(c.encode_utf8(&mut [0; 4])),
            _ => state.push_pending("\\"),
        }
        state.advance(len);
    }
}

pub struct BackticksRule;

impl BackticksRule {
    /// Opening run length and, when a closing run of the same length exists,
    /// the byte offset where it starts
    fn scan(state: &InlineState<'_>, pos: usize) -> Option<(usize, Option<usize>)> {
        if state.peek(pos) != Some('`') {
            return None;
        }
        let src = state.src();
        let max = state.pos_max();
        let open = src[pos..max].bytes().take_while(|&b| b == b'`').count();

        let mut cursor = pos + open;
        while let Some(found) = src[cursor..max].find('`') {
            let start = cursor + found;
            let run = src[start..max].bytes().take_while(|&b| b == b'`').count();
            if run == open {
                return Some((open, Some(start)));
            }
            cursor = start + run;
        }
        Some((open, None))
    }
}

impl InlineRule for BackticksRule {
    fn name(&self) -> &'static str {
        "backticks"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        match Self::scan(state, pos)? {
            (open, Some(close)) => Some(close + open - pos),
            (open, None) => Some(open),
        }
    }

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize) {
        let Some((open, close)) = Self::scan(state, pos) else {
            return;
        };
        let markup = &state.src()[pos..pos + open];
        match close {
            Some(close) => {
                let raw = state.src()[pos + open..close].replace('\n', " ");
                let content = if raw.len() > 2
                    && raw.starts_with(' ')
                    && raw.ends_with(' ')
                    && !raw.trim().is_empty()
                {
                    raw[1..raw.len() - 1].to_string()
                } else {
                    raw
                };
                let token = Token::code(content, markup);
                state.emit_token(token);
            }
            None => {
                let markup = markup.to_string();
                state.push_pending(&markup);
            }
        }
        state.advance(len);
    }
}

/// `[label](destination "title")`
pub struct LinkRule;

struct LinkMatch {
    label_end: usize,
    href: String,
    title: Option<String>,
    end: usize,
}

impl LinkRule {
    fn label_end(state: &InlineState<'_>, start: usize) -> Option<usize> {
        let mut level = 1;
        let mut pos = start + 1;
        while pos < state.pos_max() {
            match state.peek(pos)? {
                ']' => {
                    level -= 1;
                    if level == 0 {
                        return Some(pos);
                    }
                    pos += 1;
                }
                '[' => {
                    level += 1;
                    pos += 1;
                }
                _ => pos = state.parser().skip_token(state, pos),
            }
        }
        None
    }

    fn skip_spaces(src: &str, mut pos: usize, max: usize) -> usize {
        while pos < max && matches!(src.as_bytes()[pos], b' ' | b'\t' | b'\n') {
            pos += 1;
        }
        pos
    }

    fn destination(src: &str, pos: usize, max: usize) -> Option<(String, usize)> {
        let bytes = src.as_bytes();
        if pos < max && bytes[pos] == b'<' {
            let close = src[pos + 1..max].find(['>', '\n', '<'])? + pos + 1;
            if bytes[close] != b'>' {
                return None;
            }
            return Some((unescape(&src[pos + 1..close]), close + 1));
        }

        let mut level = 0usize;
        let mut end = pos;
        while end < max {
            match bytes[end] {
                b'\\' if end + 1 < max => end += 2,
                b'(' => {
                    level += 1;
                    end += 1;
                }
                b')' if level == 0 => break,
                b')' => {
                    level -= 1;
                    end += 1;
                }
                b if b.is_ascii_whitespace() || b.is_ascii_control() => break,
                _ => end += 1,
            }
        }
        if end == pos || level != 0 {
            return None;
        }
        Some((unescape(&src[pos..end]), end))
    }

    fn title(src: &str, pos: usize, max: usize) -> Option<(String, usize)> {
        let closer = match *src.as_bytes().get(pos)? {
            b'"' => '"',
            b'\'' => '\'',
            b'(' => ')',
            _ => return None,
        };
        let close = src[pos + 1..max].find(closer)? + pos + 1;
        Some((unescape(&src[pos + 1..close]), close + 1))
    }

    fn scan(state: &InlineState<'_>, pos: usize) -> Option<LinkMatch> {
        if state.in_link() || state.peek(pos) != Some('[') {
            return None;
        }
        let src = state.src();
        let max = state.pos_max();
        let label_end = Self::label_end(state, pos)?;
        if state.peek(label_end + 1) != Some('(') {
            return None;
        }

        let mut cursor = Self::skip_spaces(src, label_end + 2, max);
        let (href, after_dest) = if state.peek(cursor) == Some(')') {
            (String::new(), cursor)
        } else {
            Self::destination(src, cursor, max)?
        };
        cursor = Self::skip_spaces(src, after_dest, max);

        let mut title = None;
        if cursor > after_dest
            && let Some((text, after_title)) = Self::title(src, cursor, max)
        {
            title = Some(text);
            cursor = Self::skip_spaces(src, after_title, max);
        }

        if state.peek(cursor) != Some(')') {
            return None;
        }
        Some(LinkMatch {
            label_end,
            href,
            title,
            end: cursor + 1,
        })
    }
}

impl InlineRule for LinkRule {
    fn name(&self) -> &'static str {
        "link"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        Self::scan(state, pos).map(|link| link.end - pos)
    }

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize) {
        let Some(link) = Self::scan(state, pos) else {
            return;
        };
        let mut open = Token::open("a", "").with_attr("href", link.href);
        if let Some(title) = link.title {
            open = open.with_attr("title", title);
        }

        let label = &state.src()[pos + 1..link.label_end];
        let children = state
            .parser()
            .parse_nested(label, state.depth() + 1, true);

        state.emit_token(open);
        for child in children {
            state.emit_token(child);
        }
        state.emit_token(Token::close("a", ""));
        state.advance(len);
    }
}

/// `<scheme:address>`
pub struct AutolinkRule;

impl AutolinkRule {
    fn scan(state: &InlineState<'_>, pos: usize) -> Option<usize> {
        if state.peek(pos) != Some('<') {
            return None;
        }
        let rest = &state.src()[pos + 1..state.pos_max()];
        let close = rest.find('>')?;
        let url = &rest[..close];

        let (scheme, address) = url.split_once(':')?;
        let valid_scheme = (2..=32).contains(&scheme.len())
            && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'));
        let valid_address = !address
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '<');
        (valid_scheme && valid_address).then_some(close + 2)
    }
}

impl InlineRule for AutolinkRule {
    fn name(&self) -> &'static str {
        "autolink"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        if state.in_link() {
            return None;
        }
        Self::scan(state, pos)
    }

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize) {
        let url = state.src()[pos + 1..pos + len - 1].to_string();
        state.emit_token(Token::open("a", "autolink").with_attr("href", url.clone()));
        state.emit_token(Token::text(url));
        state.emit_token(Token::close("a", "autolink"));
        state.advance(len);
    }
}

/// Drop backslashes in front of ASCII punctuation
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && next.is_ascii_punctuation()
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::markdown::inline::InlineParser;
    use crate::markdown::token::{Token, TokenKind};

    fn parse(src: &str) -> Vec<Token> {
        InlineParser::new().parse(src)
    }

    #[test]
    fn escaped_punctuation_is_literal() {
        assert_eq!(parse(r"\*not emphasis\*"), vec![Token::text("*not emphasis*")]);
    }

    #[test]
    fn backslash_before_letter_is_kept() {
        assert_eq!(parse(r"a\b"), vec![Token::text(r"a\b")]);
    }

    #[test]
    fn unclosed_backticks_are_text() {
        assert_eq!(parse("``a`"), vec![Token::text("``a`")]);
    }

    #[test]
    fn code_span_strips_one_padding_space() {
        assert_eq!(parse("`` `x` ``"), vec![Token::code("`x`", "``")]);
    }

    #[test]
    fn soft_break_drops_leading_indent() {
        let tokens = parse("one\n   two");
        assert_eq!(tokens[1].kind, TokenKind::SoftBreak);
        assert_eq!(tokens[2], Token::text("two"));
    }

    #[test]
    fn link_with_title() {
        let tokens = parse(r#"[docs](https://example.com "Docs")"#);
        assert_eq!(tokens[0].attr("href"), Some("https://example.com"));
        assert_eq!(tokens[0].attr("title"), Some("Docs"));
        assert_eq!(tokens[1], Token::text("docs"));
    }

    #[test]
    fn bracket_without_destination_is_text() {
        assert_eq!(parse("[not a link]"), vec![Token::text("[not a link]")]);
    }

    #[test]
    fn autolink_wraps_url() {
        let tokens = parse("<https://redmine.org>");
        assert_eq!(tokens[0].attr("href"), Some("https://redmine.org"));
        assert_eq!(tokens[1], Token::text("https://redmine.org"));
    }

    #[test]
    fn angle_bracket_text_is_not_autolink() {
        assert_eq!(parse("a < b > c"), vec![Token::text("a < b > c")]);
    }
}
