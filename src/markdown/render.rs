//! HTML output. Blocks and inline tokens are turned back into pulldown-cmark
//! events and written by its HTML writer. Tags the writer has no event for,
//! such as `u` and `s`, go out as inline HTML.

use super::block::{Block, List, Table, heading_level};
use super::token::{Token, TokenKind};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, LinkType, Tag, html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render soft line breaks as `<br />`
    pub breaks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { breaks: true }
    }
}

pub fn render_inline(tokens: &[Token], options: RenderOptions) -> String {
    let mut events = Vec::new();
    push_inline(tokens, options, &mut events);
    write_html(events)
}

pub fn render_blocks(blocks: &[Block], options: RenderOptions) -> String {
    let mut events = Vec::new();
    for block in blocks {
        push_block(block, options, false, &mut events);
    }
    write_html(events)
}

fn write_html(events: Vec<Event<'_>>) -> String {
    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

/// Start `tag`, let `body` fill it, then close it
fn wrap<'a>(tag: Tag<'a>, out: &mut Vec<Event<'a>>, body: impl FnOnce(&mut Vec<Event<'a>>)) {
    let end = tag.to_end();
    out.push(Event::Start(tag));
    body(out);
    out.push(Event::End(end));
}

fn open_tag(token: &Token) -> Option<Tag<'_>> {
    match token.tag {
        "em" => Some(Tag::Emphasis),
        "strong" => Some(Tag::Strong),
        "a" => Some(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: token.attr("href").unwrap_or_default().into(),
            title: token.attr("title").unwrap_or_default().into(),
            id: CowStr::Borrowed(""),
        }),
        _ => None,
    }
}

fn push_inline<'a>(tokens: &'a [Token], options: RenderOptions, out: &mut Vec<Event<'a>>) {
    for token in tokens {
        let event = match token.kind {
            TokenKind::Text => Event::Text(token.content.as_str().into()),
            TokenKind::Code => Event::Code(token.content.as_str().into()),
            TokenKind::HardBreak => Event::HardBreak,
            TokenKind::SoftBreak if options.breaks => Event::HardBreak,
            TokenKind::SoftBreak => Event::SoftBreak,
            TokenKind::Open => match open_tag(token) {
                Some(tag) => Event::Start(tag),
                None => Event::InlineHtml(format!("<{}>", token.tag).into()),
            },
            TokenKind::Close => match open_tag(token) {
                Some(tag) => Event::End(tag.to_end()),
                None => Event::InlineHtml(format!("</{}>", token.tag).into()),
            },
        };
        out.push(event);
    }
}

fn push_block<'a>(block: &'a Block, options: RenderOptions, tight: bool, out: &mut Vec<Event<'a>>) {
    match block {
        Block::Heading { level, content } => {
            let tag = Tag::Heading {
                level: heading_level(*level),
                id: None,
                classes: Vec::new(),
                attrs: Vec::new(),
            };
            wrap(tag, out, |out| push_inline(content, options, out));
        }
        Block::Paragraph { content } if tight => push_inline(content, options, out),
        Block::Paragraph { content } => {
            wrap(Tag::Paragraph, out, |out| push_inline(content, options, out));
        }
        Block::CodeBlock { info, content } => {
            let kind = match info {
                Some(info) => CodeBlockKind::Fenced(info.as_str().into()),
                None => CodeBlockKind::Indented,
            };
            wrap(Tag::CodeBlock(kind), out, |out| {
                out.push(Event::Text(content.as_str().into()));
            });
        }
        Block::Rule => out.push(Event::Rule),
        Block::Quote(inner) => wrap(Tag::BlockQuote(None), out, |out| {
            for block in inner {
                push_block(block, options, false, out);
            }
        }),
        Block::List(list) => push_list(list, options, out),
        Block::Table(table) => push_table(table, options, out),
    }
}

fn push_list<'a>(list: &'a List, options: RenderOptions, out: &mut Vec<Event<'a>>) {
    let first = list.ordered.then_some(list.start);
    wrap(Tag::List(first), out, |out| {
        for item in &list.items {
            wrap(Tag::Item, out, |out| {
                for block in &item.blocks {
                    push_block(block, options, list.tight, out);
                }
            });
        }
    });
}

fn push_table<'a>(table: &'a Table, options: RenderOptions, out: &mut Vec<Event<'a>>) {
    let alignments = table.alignments.iter().map(|&a| a.into()).collect();
    wrap(Tag::Table(alignments), out, |out| {
        wrap(Tag::TableHead, out, |out| {
            for cell in &table.header {
                wrap(Tag::TableCell, out, |out| push_inline(cell, options, out));
            }
        });
        for row in &table.rows {
            wrap(Tag::TableRow, out, |out| {
                for cell in row {
                    wrap(Tag::TableCell, out, |out| push_inline(cell, options, out));
                }
            });
        }
    });
}
