//! `~~strikethrough~~`, rendered as `<s>`.
//!
//! Each `~~` of a run becomes a text token plus a [`Delimiter`] with length 0,
//! so the pairing in [`emphasis::balance_pairs`] never applies the rule of
//! three to it. A leftover single `~` stays plain text.
//!
//! [`emphasis::balance_pairs`]: super::emphasis::balance_pairs

use super::emphasis::Delimiter;
use super::host::InlineHost;
use super::inline::{InlineRule, InlineState};
use super::token::Token;

pub const STRIKETHROUGH_TAG: &str = "s";

const MARKER: char = '~';

pub struct StrikethroughRule;

impl InlineRule for StrikethroughRule {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        if state.peek(pos)? != MARKER {
            return None;
        }
        let run = state.scan_delimiter_run(pos, true);
        (run.length >= 2).then_some(run.length)
    }

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize) {
        let run = state.scan_delimiter_run(pos, true);
        let mut pairs = run.length;
        if pairs % 2 == 1 {
            state.emit_token(Token::text("~"));
            pairs -= 1;
        }
        for _ in 0..pairs / 2 {
            state.emit_token(Token::text("~~"));
            let token = state.tokens.len() - 1;
            state.delimiters.push(Delimiter {
                marker: MARKER,
                length: 0,
                token,
                end: None,
                open: run.can_open,
                close: run.can_close,
            });
        }
        state.advance(len);
    }
}

/// Rewrite paired `~~` tokens into `s` open and close tokens
pub fn post_process(tokens: &mut [Token], delimiters: &[Delimiter]) {
    for start in delimiters.iter().filter(|d| d.marker == MARKER) {
        let Some(end) = start.end.and_then(|idx| delimiters.get(idx)) else {
            continue;
        };
        tokens[start.token] = Token::open(STRIKETHROUGH_TAG, "~~");
        tokens[end.token] = Token::close(STRIKETHROUGH_TAG, "~~");
    }
}

#[cfg(test)]
mod tests {
    use crate::markdown::inline::InlineParser;
    use crate::markdown::token::{Token, TokenKind};

    fn parse(src: &str) -> Vec<Token> {
        InlineParser::new().parse(src)
    }

    #[test]
    fn pair_becomes_s() {
        assert_eq!(
            parse("~~gone~~"),
            vec![Token::open("s", "~~"), Token::text("gone"), Token::close("s", "~~")]
        );
    }

    #[test]
    fn single_tilde_is_text() {
        assert_eq!(parse("~a~"), vec![Token::text("~a~")]);
    }

    #[test]
    fn unclosed_run_is_text() {
        assert_eq!(parse("~~open"), vec![Token::text("~~open")]);
    }

    #[test]
    fn odd_run_keeps_one_tilde() {
        let tokens = parse("~~~x~~");
        assert_eq!(tokens[0], Token::text("~"));
        assert_eq!(tokens[1].tag, "s");
        assert_eq!(tokens[2], Token::text("x"));
        assert_eq!(tokens[3].kind, TokenKind::Close);
    }

    #[test]
    fn nests_with_emphasis() {
        let tags: Vec<_> = parse("~~a **b**~~")
            .iter()
            .filter(|t| t.kind != TokenKind::Text)
            .map(|t| (t.kind, t.tag))
            .collect();
        assert_eq!(
            tags,
            vec![
                (TokenKind::Open, "s"),
                (TokenKind::Open, "strong"),
                (TokenKind::Close, "strong"),
                (TokenKind::Close, "s"),
            ]
        );
    }

    #[test]
    fn spaced_markers_do_not_pair() {
        assert_eq!(parse("a ~~ b ~~ c"), vec![Token::text("a ~~ b ~~ c")]);
    }

    #[test]
    fn code_span_keeps_tildes() {
        assert_eq!(parse("`~~x~~`"), vec![Token::code("~~x~~", "`")]);
    }
}
