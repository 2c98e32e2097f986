//! Turns bare URLs and e-mail addresses in text tokens into links.
//!
//! Runs on the finished token stream of a buffer. Text already inside a link
//! is left alone, and code spans are never text tokens, so neither is touched.

use super::token::{Token, TokenKind};
use linkify::{LinkFinder, LinkKind};

/// Markup set on the link tokens this pass creates
pub const LINKIFY_MARKUP: &str = "linkify";

/// Target for a link found by the finder, or `None` when the match is not
/// something a reader would take for a link
fn href_for(kind: &LinkKind, text: &str) -> Option<String> {
    match kind {
        LinkKind::Email => Some(format!("mailto:{text}")),
        LinkKind::Url if text.contains("://") || text.starts_with("mailto:") => {
            Some(text.to_string())
        }
        LinkKind::Url if text.starts_with("www.") => Some(format!("http://{text}")),
        _ => None,
    }
}

/// Split `text` into plain text and link tokens
fn split_text(finder: &LinkFinder, text: &str, out: &mut Vec<Token>) {
    let mut last = 0;
    for link in finder.links(text) {
        let Some(href) = href_for(link.kind(), link.as_str()) else {
            continue;
        };
        if link.start() > last {
            out.push(Token::text(&text[last..link.start()]));
        }
        out.push(Token::open("a", LINKIFY_MARKUP).with_attr("href", href));
        out.push(Token::text(link.as_str()));
        out.push(Token::close("a", LINKIFY_MARKUP));
        last = link.end();
    }
    if last < text.len() {
        out.push(Token::text(&text[last..]));
    }
}

pub fn linkify(tokens: Vec<Token>) -> Vec<Token> {
    let mut finder = LinkFinder::new();
    finder
        .url_must_have_scheme(false)
        .kinds(&[LinkKind::Url, LinkKind::Email]);

    let mut out = Vec::with_capacity(tokens.len());
    let mut link_depth = 0usize;
    for token in tokens {
        match (token.kind, token.tag) {
            (TokenKind::Open, "a") => link_depth += 1,
            (TokenKind::Close, "a") => link_depth = link_depth.saturating_sub(1),
            (TokenKind::Text, _) if link_depth == 0 => {
                split_text(&finder, &token.content, &mut out);
                continue;
            }
            _ => {}
        }
        out.push(token);
    }
    out
}
