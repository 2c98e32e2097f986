use super::bare_links;
use super::emphasis::{self, Delimiter, EmphasisRule};
use super::host::InlineHost;
use super::rules::{AutolinkRule, BackticksRule, EscapeRule, LinkRule, NewlineRule, TextRule};
use super::strikethrough::{self, StrikethroughRule};
use super::token::{Token, TokenKind};

/// Links inside link labels are parsed recursively; this bounds the depth
const MAX_NESTING: usize = 20;

/// One entry of the inline rule chain.
///
/// `try_match` is the look-ahead half: it reports how many bytes the rule
/// would consume at `pos` without touching the state. `commit` emits the
/// tokens for a match of `len` bytes previously reported at `pos`, and leaves
/// the cursor just past it.
pub trait InlineRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_match(&self, state: &InlineState<'_>, pos: usize) -> Option<usize>;

    fn commit(&self, state: &mut InlineState<'_>, pos: usize, len: usize);
}

/// Tokenizer state for a single inline buffer
pub struct InlineState<'a> {
    src: &'a str,
    pos: usize,
    pos_max: usize,
    pending: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) delimiters: Vec<Delimiter>,
    parser: &'a InlineParser,
    depth: usize,
    in_link: bool,
}

impl<'a> InlineState<'a> {
    fn new(src: &'a str, parser: &'a InlineParser, depth: usize, in_link: bool) -> Self {
        Self {
            src,
            pos: 0,
            pos_max: src.len(),
            pending: String::new(),
            tokens: Vec::new(),
            delimiters: Vec::new(),
            parser,
            depth,
            in_link,
        }
    }

    /// Queue plain text; it becomes a text token on the next emit
    pub fn push_pending(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    /// Queue a slice of the source buffer as plain text
    pub fn push_source(&mut self, start: usize, end: usize) {
        let src = self.src;
        self.pending.push_str(&src[start..end]);
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub(crate) fn pending_mut(&mut self) -> &mut String {
        &mut self.pending
    }

    pub fn parser(&self) -> &'a InlineParser {
        self.parser
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn in_link(&self) -> bool {
        self.in_link
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.tokens.push(Token::text(text));
        }
    }
}

impl InlineHost for InlineState<'_> {
    fn src(&self) -> &str {
        self.src
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn pos_max(&self) -> usize {
        self.pos_max
    }

    fn emit_token(&mut self, token: Token) {
        self.flush_pending();
        self.tokens.push(token);
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.pos_max);
    }
}

/// An ordered chain of inline rules
pub struct InlineParser {
    rules: Vec<Box<dyn InlineRule>>,
}

impl Default for InlineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineParser {
    /// The standard rule chain, without dialect extensions
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(TextRule),
                Box::new(NewlineRule),
                Box::new(EscapeRule),
                Box::new(BackticksRule),
                Box::new(StrikethroughRule),
                Box::new(EmphasisRule),
                Box::new(LinkRule),
                Box::new(AutolinkRule),
            ],
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Register `rule` immediately before the rule named `anchor`.
    ///
    /// Returns false and appends the rule at the end when `anchor` is unknown.
    pub fn insert_before(&mut self, anchor: &str, rule: Box<dyn InlineRule>) -> bool {
        match self.rules.iter().position(|r| r.name() == anchor) {
            Some(index) => {
                self.rules.insert(index, rule);
                true
            }
            None => {
                tracing::warn!("Inline rule '{}' not found, appending '{}'", anchor, rule.name());
                self.rules.push(rule);
                false
            }
        }
    }

    /// Tokenize one inline buffer
    pub fn parse(&self, src: &str) -> Vec<Token> {
        self.parse_nested(src, 0, false)
    }

    pub(crate) fn parse_nested(&self, src: &str, depth: usize, in_link: bool) -> Vec<Token> {
        let mut state = InlineState::new(src, self, depth, in_link);

        while state.pos < state.pos_max {
            let pos = state.pos;
            let matched = if depth > MAX_NESTING {
                None
            } else {
                self.rules
                    .iter()
                    .find_map(|rule| rule.try_match(&state, pos).map(|len| (rule, len)))
            };

            match matched {
                Some((rule, len)) if len > 0 => {
                    rule.commit(&mut state, pos, len);
                    if state.pos <= pos {
                        state.pos = (pos + len).min(state.pos_max);
                    }
                }
                _ => {
                    let ch = state.peek(pos).unwrap_or(' ');
                    state.pending.push(ch);
                    state.pos += ch.len_utf8();
                }
            }
        }
        state.flush_pending();

        emphasis::balance_pairs(&mut state.delimiters);
        strikethrough::post_process(&mut state.tokens, &state.delimiters);
        emphasis::post_process(&mut state.tokens, &state.delimiters);
        let tokens = join_text_fragments(state.tokens);
        if in_link {
            tokens
        } else {
            bare_links::linkify(tokens)
        }
    }

    /// Position just past whatever token starts at `pos`, judged in look-ahead
    /// mode. Used to step over code spans and escapes while scanning labels.
    pub fn skip_token(&self, state: &InlineState<'_>, pos: usize) -> usize {
        let len = self
            .rules
            .iter()
            .filter(|rule| rule.name() != "link")
            .find_map(|rule| rule.try_match(state, pos))
            .filter(|&len| len > 0)
            .unwrap_or_else(|| state.peek(pos).map_or(1, char::len_utf8));
        pos + len
    }
}

/// Merge adjacent text tokens and drop empty ones left behind by emphasis
fn join_text_fragments(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind == TokenKind::Text {
            if token.content.is_empty() {
                continue;
            }
            if let Some(last) = out.last_mut()
                && last.kind == TokenKind::Text
            {
                last.content.push_str(&token.content);
                continue;
            }
        }
        out.push(token);
    }
    out
}
