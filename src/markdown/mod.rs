//! Markdown to HTML, with an optional Redmine extension to the inline syntax.

pub mod bare_links;
pub mod block;
pub mod emphasis;
pub mod host;
pub mod inline;
pub mod render;
pub mod rules;
pub mod strikethrough;
pub mod token;
pub mod underline;

use serde::{Deserialize, Serialize};

pub use block::{Alignment, Block, List, ListItem, Table};
pub use host::{DelimiterRun, InlineHost};
pub use inline::{InlineParser, InlineRule, InlineState};
pub use render::RenderOptions;
pub use strikethrough::STRIKETHROUGH_TAG;
pub use token::{Token, TokenKind, plain_text};
pub use underline::{UNDERLINE_TAG, UnderlineRule};

/// Which inline syntax the processor accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// CommonMark-style inline syntax plus `_underline_`
    #[default]
    #[serde(alias = "redmine")]
    Extended,
    Standard,
}

impl Dialect {
    pub fn label(&self) -> &'static str {
        match self {
            Dialect::Extended => "Redmine",
            Dialect::Standard => "Standard",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Dialect::Extended => Dialect::Standard,
            Dialect::Standard => Dialect::Extended,
        }
    }
}

/// Parser plus renderer configured for one dialect
pub struct MarkdownProcessor {
    dialect: Dialect,
    inline: InlineParser,
    options: RenderOptions,
}

impl MarkdownProcessor {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_options(dialect, RenderOptions::default())
    }

    pub fn with_options(dialect: Dialect, options: RenderOptions) -> Self {
        let mut inline = InlineParser::new();
        if dialect == Dialect::Extended {
            // must run before emphasis, which would otherwise claim every `_`
            inline.insert_before("emphasis", Box::new(UnderlineRule));
        }
        tracing::debug!("Markdown processor ready: {:?}", inline.rule_names());
        Self {
            dialect,
            inline,
            options,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn inline_parser(&self) -> &InlineParser {
        &self.inline
    }

    pub fn parse(&self, src: &str) -> Vec<Block> {
        block::parse(src, &self.inline)
    }

    pub fn parse_inline(&self, src: &str) -> Vec<Token> {
        self.inline.parse(src)
    }

    pub fn render(&self, src: &str) -> String {
        render::render_blocks(&self.parse(src), self.options)
    }

    pub fn render_inline(&self, src: &str) -> String {
        render::render_inline(&self.parse_inline(src), self.options)
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
