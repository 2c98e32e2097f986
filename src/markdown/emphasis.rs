//! Native `*`/`_` emphasis: delimiter collection, pairing and conversion.
//!
//! While tokenizing, every marker character becomes its own text token plus a
//! [`Delimiter`] record. Once the buffer is consumed, openers and closers are
//! paired (with the "rule of three" for mixed runs) and the paired text tokens
//! are rewritten into `em`/`strong` open and close tokens.

use super::host::InlineHost;
use super::inline::{InlineRule, InlineState};
use super::token::Token;

#[derive(Debug, Clone)]
pub struct Delimiter {
    pub marker: char,
    /// Length of the whole run this marker belongs to
    pub length: usize,
    /// Index of the marker's text token
    pub token: usize,
    /// Index of the matching closer, set on openers only
    pub end: Option<usize>,
    pub open: bool,
    pub close: bool,
}

pub struct EmphasisRule;

impl InlineRule for EmphasisRule {
    fn name(&self) -> &'static str {
        "emphasis"
    }

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize> {
        match state.peek(pos)? {
            '_' | '*' => Some(state.scan_delimiter_run(pos, true).length),
            _ => None,
        }
    }

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize) {
        let run = state.scan_delimiter_run(pos, true);
        let mut marker = [0u8; 4];
        let marker_str: &str = run.marker.encode_utf8(&mut marker);

        for _ in 0..run.length {
            state.emit_token(Token::text(marker_str));
            let token = state.tokens.len() - 1;
            state.delimiters.push(Delimiter {
                marker: run.marker,
                length: run.length,
                token,
                end: None,
                open: run.can_open,
                close: run.can_close,
            });
        }
        state.advance(len);
    }
}

/// Link each closer to the nearest compatible opener.
///
/// `jumps` lets the backwards search skip over ranges that are already
/// paired, so a closer never matches across an inner pair.
pub fn balance_pairs(delimiters: &mut [Delimiter]) {
    let mut jumps = vec![0usize; delimiters.len()];
    let mut header = 0usize;
    let mut last_token: Option<usize> = None;

    for closer_idx in 0..delimiters.len() {
        let closer_token = delimiters[closer_idx].token;
        // markers of one run have adjacent tokens
        let same_run = delimiters[header].marker == delimiters[closer_idx].marker
            && last_token.is_some_and(|t| t + 1 == closer_token);
        if !same_run {
            header = closer_idx;
        }
        last_token = Some(closer_token);

        if !delimiters[closer_idx].close {
            continue;
        }

        let mut opener_idx = header as isize - jumps[header] as isize - 1;
        while opener_idx >= 0 {
            let idx = opener_idx as usize;
            let opener = &delimiters[idx];
            let closer = &delimiters[closer_idx];

            if opener.marker == closer.marker && opener.open && opener.end.is_none() {
                let odd_match = (opener.close || closer.open)
                    && (opener.length + closer.length) % 3 == 0
                    && (opener.length % 3 != 0 || closer.length % 3 != 0);

                if !odd_match {
                    let last_jump = if idx > 0 && !delimiters[idx - 1].open {
                        jumps[idx - 1] + 1
                    } else {
                        0
                    };
                    jumps[closer_idx] = closer_idx - idx + last_jump;
                    jumps[idx] = last_jump;
                    delimiters[closer_idx].open = false;
                    delimiters[idx].end = Some(closer_idx);
                    delimiters[idx].close = false;
                    // the next marker starts a fresh run
                    last_token = None;
                    break;
                }
            }
            opener_idx -= jumps[idx] as isize + 1;
        }
    }
}

/// Rewrite paired marker tokens into `em`/`strong` open and close tokens.
///
/// Two adjacent pairs nested directly inside each other collapse into one
/// `strong`; the outer pair's markers are blanked and later dropped.
pub fn post_process(tokens: &mut [Token], delimiters: &[Delimiter]) {
    let mut i = delimiters.len();
    while i > 0 {
        i -= 1;
        let start = &delimiters[i];
        if start.marker != '_' && start.marker != '*' {
            continue;
        }
        let Some(end_idx) = start.end else {
            continue;
        };
        let end = &delimiters[end_idx];

        let is_strong = i > 0
            && delimiters[i - 1].end == Some(end_idx + 1)
            && delimiters[i - 1].marker == start.marker
            && delimiters[i - 1].token + 1 == start.token
            && delimiters[end_idx + 1].token == end.token + 1;

        let (tag, markup) = if is_strong {
            ("strong", start.marker.to_string().repeat(2))
        } else {
            ("em", start.marker.to_string())
        };

        tokens[start.token] = Token::open(tag, markup.clone());
        tokens[end.token] = Token::close(tag, markup);

        if is_strong {
            tokens[delimiters[i - 1].token].content.clear();
            tokens[delimiters[end_idx + 1].token].content.clear();
            i -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::markdown::inline::InlineParser;
    use crate::markdown::token::{Token, TokenKind};

    fn tags(src: &str) -> Vec<(TokenKind, &'static str)> {
        InlineParser::new()
            .parse(src)
            .iter()
            .filter(|t| t.kind != TokenKind::Text)
            .map(|t| (t.kind, t.tag))
            .collect()
    }

    #[test]
    fn nested_em_inside_strong() {
        assert_eq!(
            tags("**a *b* c**"),
            vec![
                (TokenKind::Open, "strong"),
                (TokenKind::Open, "em"),
                (TokenKind::Close, "em"),
                (TokenKind::Close, "strong"),
            ]
        );
    }

    #[test]
    fn triple_star_is_em_and_strong() {
        let tokens = InlineParser::new().parse("***x***");
        let opens: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Open)
            .map(|t| t.tag)
            .collect();
        assert_eq!(opens, vec!["em", "strong"]);
        assert!(tokens.contains(&Token::text("x")));
    }

    #[test]
    fn pairs_do_not_cross() {
        let tokens = InlineParser::new().parse("*a _b* c_");
        assert_eq!(tokens[0].tag, "em");
        assert_eq!(tokens[1], Token::text("a _b"));
        assert_eq!(tokens[2].kind, TokenKind::Close);
        assert_eq!(tokens[3], Token::text(" c_"));
    }

    #[test]
    fn different_markers_do_not_pair() {
        assert!(tags("*a_").is_empty());
    }
}
