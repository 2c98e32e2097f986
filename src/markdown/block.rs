//! Block structure.
//!
//! pulldown-cmark finds the blocks. The inline content of every leaf block is
//! cut back out of the source as raw text and tokenized by our own inline
//! rule chain, so dialect rules see the same characters the author typed.

use super::inline::InlineParser;
use super::token::Token;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::ops::Range;

/// Column alignment of a pipe table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(alignment: pulldown_cmark::Alignment) -> Self {
        match alignment {
            pulldown_cmark::Alignment::None => Alignment::None,
            pulldown_cmark::Alignment::Left => Alignment::Left,
            pulldown_cmark::Alignment::Center => Alignment::Center,
            pulldown_cmark::Alignment::Right => Alignment::Right,
        }
    }
}

impl From<Alignment> for pulldown_cmark::Alignment {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::None => pulldown_cmark::Alignment::None,
            Alignment::Left => pulldown_cmark::Alignment::Left,
            Alignment::Center => pulldown_cmark::Alignment::Center,
            Alignment::Right => pulldown_cmark::Alignment::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub start: u64,
    /// Tight lists render their paragraphs without `<p>`
    pub tight: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub alignments: Vec<Alignment>,
    pub header: Vec<Vec<Token>>,
    pub rows: Vec<Vec<Vec<Token>>>,
}

/// Block-level elements
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, content: Vec<Token> },
    Paragraph { content: Vec<Token> },
    CodeBlock { info: Option<String>, content: String },
    Rule,
    Quote(Vec<Block>),
    List(List),
    Table(Table),
}

pub(crate) fn level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

pub(crate) fn heading_level(level: u8) -> HeadingLevel {
    match level {
        0 | 1 => HeadingLevel::H1,
        2 => HeadingLevel::H2,
        3 => HeadingLevel::H3,
        4 => HeadingLevel::H4,
        5 => HeadingLevel::H5,
        _ => HeadingLevel::H6,
    }
}

/// Parse a whole document into blocks, tokenizing inline content with `inline`
pub fn parse(src: &str, inline: &InlineParser) -> Vec<Block> {
    let events = Parser::new_ext(src, Options::ENABLE_TABLES)
        .into_offset_iter()
        .collect();
    let mut walker = BlockWalker {
        src,
        events,
        index: 0,
        quotes: 0,
        inline,
    };
    walker.blocks().0
}

struct BlockWalker<'a> {
    src: &'a str,
    events: Vec<(Event<'a>, Range<usize>)>,
    index: usize,
    /// Blockquotes around the cursor; their `>` markers are cut from inline text
    quotes: usize,
    inline: &'a InlineParser,
}

impl BlockWalker<'_> {
    /// Blocks up to the end of the enclosing container. The flag is set when
    /// pulldown-cmark wrapped a paragraph explicitly, which marks a list item
    /// as loose.
    fn blocks(&mut self) -> (Vec<Block>, bool) {
        let mut out = Vec::new();
        let mut explicit_paragraph = false;

        while let Some((event, _)) = self.events.get(self.index) {
            match event {
                Event::End(_) if !is_inline(event) => {
                    self.index += 1;
                    break;
                }
                event if is_inline(event) => {
                    let content = self.inline_run();
                    out.push(Block::Paragraph { content });
                }
                Event::Start(Tag::Paragraph) => {
                    explicit_paragraph = true;
                    self.index += 1;
                    let content = self.leaf();
                    out.push(Block::Paragraph { content });
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    let level = level_number(*level);
                    self.index += 1;
                    let content = self.leaf();
                    out.push(Block::Heading { level, content });
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let info = match kind {
                        CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                            Some(info.trim().to_string())
                        }
                        _ => None,
                    };
                    self.index += 1;
                    let mut content = self.literal();
                    if !content.is_empty() && !content.ends_with('\n') {
                        content.push('\n');
                    }
                    out.push(Block::CodeBlock { info, content });
                }
                Event::Start(Tag::HtmlBlock) => {
                    // raw HTML is shown as text, never passed through
                    self.index += 1;
                    let raw = self.literal();
                    let content = self.inline.parse(raw.trim_end());
                    out.push(Block::Paragraph { content });
                }
                Event::Start(Tag::BlockQuote(_)) => {
                    self.index += 1;
                    self.quotes += 1;
                    let (inner, _) = self.blocks();
                    self.quotes -= 1;
                    out.push(Block::Quote(inner));
                }
                Event::Start(Tag::List(first)) => {
                    let first = *first;
                    self.index += 1;
                    out.push(Block::List(self.list(first)));
                }
                Event::Start(Tag::Table(alignments)) => {
                    let alignments = alignments.iter().cloned().map(Alignment::from).collect();
                    self.index += 1;
                    out.push(Block::Table(self.table(alignments)));
                }
                Event::Rule => {
                    self.index += 1;
                    out.push(Block::Rule);
                }
                Event::Start(_) => {
                    // containers we do not model keep their content
                    self.index += 1;
                    let (inner, _) = self.blocks();
                    out.extend(inner);
                }
                _ => self.index += 1,
            }
        }

        (out, explicit_paragraph)
    }

    fn list(&mut self, first: Option<u64>) -> List {
        let mut items = Vec::new();
        let mut loose = false;

        while let Some((event, _)) = self.events.get(self.index) {
            match event {
                Event::Start(Tag::Item) => {
                    self.index += 1;
                    let (blocks, explicit) = self.blocks();
                    loose |= explicit;
                    items.push(ListItem { blocks });
                }
                Event::End(_) => {
                    self.index += 1;
                    break;
                }
                _ => self.index += 1,
            }
        }

        List {
            ordered: first.is_some(),
            start: first.unwrap_or(1),
            tight: !loose,
            items,
        }
    }

    fn table(&mut self, alignments: Vec<Alignment>) -> Table {
        let mut header = Vec::new();
        let mut rows = Vec::new();
        let mut row: Vec<Vec<Token>> = Vec::new();

        while let Some((event, _)) = self.events.get(self.index) {
            match event {
                Event::Start(Tag::TableCell) => {
                    self.index += 1;
                    let cell = self.leaf();
                    row.push(cell);
                }
                Event::End(TagEnd::TableHead) => {
                    self.index += 1;
                    header = std::mem::take(&mut row);
                }
                Event::End(TagEnd::TableRow) => {
                    self.index += 1;
                    rows.push(std::mem::take(&mut row));
                }
                Event::End(TagEnd::Table) => {
                    self.index += 1;
                    break;
                }
                _ => self.index += 1,
            }
        }

        for row in &mut rows {
            row.resize_with(header.len(), Vec::new);
        }
        Table {
            alignments,
            header,
            rows,
        }
    }

    /// Inline content of an explicit leaf block, consuming its end event
    fn leaf(&mut self) -> Vec<Token> {
        let content = self.inline_run();
        if let Some((Event::End(_), _)) = self.events.get(self.index) {
            self.index += 1;
        }
        content
    }

    /// Tokenize the run of inline events at the cursor from its raw source
    fn inline_run(&mut self) -> Vec<Token> {
        let mut span: Option<Range<usize>> = None;
        while let Some((event, range)) = self.events.get(self.index) {
            if !is_inline(event) {
                break;
            }
            span = Some(match span {
                Some(span) => span.start.min(range.start)..span.end.max(range.end),
                None => range.clone(),
            });
            self.index += 1;
        }

        let Some(span) = span else {
            return Vec::new();
        };
        let mut begin = span.start;
        // an escaping backslash is not part of the text event that follows it
        if begin > 0
            && self.src.as_bytes().get(begin - 1) == Some(&b'\\')
            && self
                .src
                .get(begin..)
                .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_punctuation()))
        {
            begin -= 1;
        }

        let raw = self.src.get(begin..span.end).unwrap_or("");
        let text = strip_container_prefixes(raw, self.quotes);
        self.inline.parse(text.trim_end())
    }

    /// Concatenated text of a code or HTML block, consuming its end event
    fn literal(&mut self) -> String {
        let mut text = String::new();
        while let Some((event, _)) = self.events.get(self.index) {
            self.index += 1;
            match event {
                Event::Text(chunk) | Event::Html(chunk) => text.push_str(chunk),
                Event::End(_) => break,
                _ => {}
            }
        }
        text
    }
}

fn is_inline(event: &Event<'_>) -> bool {
    match event {
        Event::Text(_) | Event::Code(_) | Event::InlineHtml(_) | Event::SoftBreak | Event::HardBreak => {
            true
        }
        Event::Start(tag) => matches!(
            tag,
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
        ),
        Event::End(tag) => matches!(
            tag,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
        ),
        _ => false,
    }
}

/// Drop the indentation and `>` markers that continuation lines of a leaf
/// block carry inside lists and quotes
fn strip_container_prefixes(raw: &str, quotes: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    for (index, line) in raw.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if index == 0 {
            out.push_str(line);
            continue;
        }
        out.push('\n');
        let mut rest = line.trim_start_matches([' ', '\t']);
        for _ in 0..quotes {
            match rest.strip_prefix('>') {
                Some(after) => rest = after.trim_start_matches([' ', '\t']),
                None => break,
            }
        }
        out.push_str(rest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::token::{TokenKind, plain_text};

    fn blocks(src: &str) -> Vec<Block> {
        parse(src, &InlineParser::new())
    }

    fn paragraph_text(block: &Block) -> String {
        match block {
            Block::Paragraph { content } => plain_text(content),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn headings_and_paragraphs() {
        let parsed = blocks("# Title\n\nSome text\nmore text\n\n## Sub ##");
        assert_eq!(parsed.len(), 3);
        match &parsed[0] {
            Block::Heading { level, content } => {
                assert_eq!(*level, 1);
                assert_eq!(plain_text(content), "Title");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(paragraph_text(&parsed[1]), "Some text\nmore text");
        match &parsed[2] {
            Block::Heading { level, content } => {
                assert_eq!(*level, 2);
                assert_eq!(plain_text(content), "Sub");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hash_without_space_is_text() {
        assert!(matches!(blocks("#hashtag")[0], Block::Paragraph { .. }));
    }

    #[test]
    fn setext_heading() {
        match &blocks("Title\n=====")[0] {
            Block::Heading { level, content } => {
                assert_eq!(*level, 1);
                assert_eq!(plain_text(content), "Title");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fenced_code_keeps_content() {
        let parsed = blocks("```javascript\nfunction hello() {\n    return 1;\n}\n```\nafter");
        assert_eq!(
            parsed[0],
            Block::CodeBlock {
                info: Some("javascript".to_string()),
                content: "function hello() {\n    return 1;\n}\n".to_string(),
            }
        );
        assert!(matches!(parsed[1], Block::Paragraph { .. }));
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let parsed = blocks("~~~\na\nb");
        assert_eq!(
            parsed,
            vec![Block::CodeBlock {
                info: None,
                content: "a\nb\n".to_string()
            }]
        );
    }

    #[test]
    fn thematic_break_variants() {
        assert_eq!(blocks("---"), vec![Block::Rule]);
        assert_eq!(blocks("* * *"), vec![Block::Rule]);
        assert_eq!(blocks("___"), vec![Block::Rule]);
    }

    #[test]
    fn nested_list() {
        let parsed = blocks("1. First item\n2. Second item\n   - Nested item\n   - Another nested item");
        let Block::List(list) = &parsed[0] else {
            panic!("expected list");
        };
        assert!(list.ordered);
        assert!(list.tight);
        assert_eq!(list.items.len(), 2);
        assert_eq!(paragraph_text(&list.items[1].blocks[0]), "Second item");
        let Block::List(nested) = &list.items[1].blocks[1] else {
            panic!("expected nested list");
        };
        assert!(!nested.ordered);
        assert_eq!(nested.items.len(), 2);
    }

    #[test]
    fn ordered_list_keeps_start() {
        let Block::List(list) = &blocks("3. c\n4. d")[0] else {
            panic!("expected list");
        };
        assert_eq!(list.start, 3);
    }

    #[test]
    fn blank_line_between_items_makes_loose_list() {
        let Block::List(list) = &blocks("- a\n\n- b")[0] else {
            panic!("expected list");
        };
        assert!(!list.tight);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn different_bullet_starts_new_list() {
        let parsed = blocks("- a\n+ b");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn quote_with_lazy_continuation() {
        let parsed = blocks("> quoted\nlazy\n\nout");
        let Block::Quote(inner) = &parsed[0] else {
            panic!("expected quote");
        };
        assert_eq!(paragraph_text(&inner[0]), "quoted\nlazy");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn quote_markers_are_cut_from_continuation_lines() {
        let parsed = blocks("> one\n> two\n>\n> > deep\n> > er");
        let Block::Quote(inner) = &parsed[0] else {
            panic!("expected quote");
        };
        assert_eq!(paragraph_text(&inner[0]), "one\ntwo");
        let Block::Quote(nested) = &inner[1] else {
            panic!("expected nested quote");
        };
        assert_eq!(paragraph_text(&nested[0]), "deep\ner");
    }

    #[test]
    fn list_item_continuation_is_unindented() {
        let Block::List(list) = &blocks("- first\n  line\n- second")[0] else {
            panic!("expected list");
        };
        assert_eq!(paragraph_text(&list.items[0].blocks[0]), "first\nline");
    }

    #[test]
    fn leading_escape_survives_in_tight_item() {
        let Block::List(list) = &blocks(r"- \*not em*")[0] else {
            panic!("expected list");
        };
        let Block::Paragraph { content } = &list.items[0].blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(content.iter().all(|t| t.kind == TokenKind::Text));
        assert_eq!(plain_text(content), "*not em*");
    }

    #[test]
    fn pipe_table() {
        let parsed = blocks("| Header 1 | Header 2 |\n|:---------|---------:|\n| Cell 1   | Cell 2   |\n| Cell 3 |");
        let Block::Table(table) = &parsed[0] else {
            panic!("expected table");
        };
        assert_eq!(table.alignments, vec![Alignment::Left, Alignment::Right]);
        assert_eq!(plain_text(&table.header[1]), "Header 2");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(plain_text(&table.rows[0][0]), "Cell 1");
        assert_eq!(table.rows[1].len(), 2);
        assert!(table.rows[1][1].is_empty());
    }

    #[test]
    fn pipe_without_delimiter_row_is_paragraph() {
        assert!(matches!(blocks("a | b\nc | d")[0], Block::Paragraph { .. }));
    }

    #[test]
    fn escaped_pipe_stays_in_cell() {
        let Block::Table(table) = &blocks("| a \\| b | c |\n|---|---|")[0] else {
            panic!("expected table");
        };
        assert_eq!(plain_text(&table.header[0]), "a | b");
        assert_eq!(plain_text(&table.header[1]), "c");
    }

    #[test]
    fn indented_code_block() {
        assert_eq!(
            blocks("    let x = 1;\n\n    x + 1\nafter")[0],
            Block::CodeBlock {
                info: None,
                content: "let x = 1;\n\nx + 1\n".to_string()
            }
        );
    }

    #[test]
    fn tab_indent_makes_code_block() {
        assert_eq!(
            blocks("\tcode")[0],
            Block::CodeBlock {
                info: None,
                content: "code\n".to_string()
            }
        );
    }

    #[test]
    fn html_block_becomes_text() {
        let parsed = blocks("<div>\nhi\n</div>");
        assert!(paragraph_text(&parsed[0]).starts_with("<div>"));
    }

    #[test]
    fn crlf_lines_are_normalized() {
        assert_eq!(paragraph_text(&blocks("a\r\nb\r\n")[0]), "a\nb");
    }

    #[test]
    fn prefix_stripping_keeps_first_line() {
        assert_eq!(strip_container_prefixes("a  \n  > b\n c", 1), "a  \nb\nc");
        assert_eq!(strip_container_prefixes("x\n> > y", 1), "x\n> y");
    }

    #[test]
    fn heading_levels_round_trip() {
        for level in 1..=6 {
            assert_eq!(level_number(heading_level(level)), level);
        }
    }
}
