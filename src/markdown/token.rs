/// What an inline token stands for in the rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Text,
    Code,
    SoftBreak,
    HardBreak,
}

/// A flat inline token, as produced by the inline rule chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub tag: &'static str,
    pub nesting: i8,
    pub markup: String,
    pub content: String,
    pub attrs: Vec<(String, String)>,
}

impl Token {
    pub fn new(kind: TokenKind, tag: &'static str, nesting: i8) -> Self {
        Self {
            kind,
            tag,
            nesting,
            markup: String::new(),
            content: String::new(),
            attrs: Vec::new(),
        }
    }

    pub fn open(tag: &'static str, markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            ..Self::new(TokenKind::Open, tag, 1)
        }
    }

    pub fn close(tag: &'static str, markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            ..Self::new(TokenKind::Close, tag, -1)
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(TokenKind::Text, "", 0)
        }
    }

    pub fn code(content: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            markup: markup.into(),
            ..Self::new(TokenKind::Code, "code", 0)
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Collect the plain text of a token run, ignoring markup
pub fn plain_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.kind {
            TokenKind::Text | TokenKind::Code => out.push_str(&token.content),
            TokenKind::SoftBreak | TokenKind::HardBreak => out.push('\n'),
            TokenKind::Open | TokenKind::Close => {}
        }
    }
    out
}
