//! Live preview: the parsed document drawn with egui widgets, or the rendered
//! HTML as source text.

use crate::markdown::render::render_blocks;
use crate::markdown::{
    Alignment, Block, Dialect, List, MarkdownProcessor, RenderOptions, STRIKETHROUGH_TAG, Table,
    Token, TokenKind, UNDERLINE_TAG,
};
use egui::text::LayoutJob;
use egui::{Color32, FontId, RichText, Stroke, TextFormat, Ui, Visuals};

/// Colors and sizes the preview draws with
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub text: Color32,
    pub strong: Color32,
    pub weak: Color32,
    pub link: Color32,
    pub code_bg: Color32,
    pub font_size: f32,
}

impl Palette {
    pub fn from_visuals(visuals: &Visuals, font_size: f32) -> Self {
        Self {
            text: visuals.text_color(),
            strong: visuals.strong_text_color(),
            weak: visuals.weak_text_color(),
            link: visuals.hyperlink_color,
            code_bg: visuals.code_bg_color,
            font_size,
        }
    }

    fn heading(&self, level: u8) -> (Self, f32) {
        let scale = match level {
            1 => 1.8,
            2 => 1.5,
            3 => 1.25,
            _ => 1.1,
        };
        (
            Self {
                text: self.strong,
                ..self.clone()
            },
            self.font_size * scale,
        )
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: Color32::GRAY,
            strong: Color32::WHITE,
            weak: Color32::DARK_GRAY,
            link: Color32::LIGHT_BLUE,
            code_bg: Color32::from_gray(40),
            font_size: 14.0,
        }
    }
}

#[derive(Default)]
struct InlineStyle {
    strong: usize,
    em: usize,
    underline: usize,
    strike: usize,
    link: usize,
}

impl InlineStyle {
    fn enter(&mut self, tag: &str, delta: isize) {
        let counter = match tag {
            "strong" => &mut self.strong,
            "em" => &mut self.em,
            UNDERLINE_TAG => &mut self.underline,
            STRIKETHROUGH_TAG => &mut self.strike,
            "a" => &mut self.link,
            _ => return,
        };
        *counter = counter.saturating_add_signed(delta);
    }

    fn format(&self, palette: &Palette, size: f32) -> TextFormat {
        let color = if self.link > 0 {
            palette.link
        } else if self.strong > 0 {
            palette.strong
        } else {
            palette.text
        };
        let underline = if self.underline > 0 || self.link > 0 {
            Stroke::new(1.0, color)
        } else {
            Stroke::NONE
        };
        let strikethrough = if self.strike > 0 {
            Stroke::new(1.0, color)
        } else {
            Stroke::NONE
        };
        TextFormat {
            font_id: FontId::proportional(size),
            color,
            italics: self.em > 0,
            underline,
            strikethrough,
            ..Default::default()
        }
    }
}

/// Lay out a run of inline tokens as one wrapped text job
pub fn inline_job(tokens: &[Token], palette: &Palette, size: f32, breaks: bool) -> LayoutJob {
    let mut job = LayoutJob::default();
    let mut style = InlineStyle::default();

    for token in tokens {
        match token.kind {
            TokenKind::Open => style.enter(token.tag, 1),
            TokenKind::Close => style.enter(token.tag, -1),
            TokenKind::Text => job.append(&token.content, 0.0, style.format(palette, size)),
            TokenKind::Code => {
                let format = TextFormat {
                    font_id: FontId::monospace(size * 0.95),
                    background: palette.code_bg,
                    ..style.format(palette, size)
                };
                job.append(&token.content, 0.0, format);
            }
            TokenKind::HardBreak => job.append("\n", 0.0, style.format(palette, size)),
            TokenKind::SoftBreak => {
                let text = if breaks { "\n" } else { " " };
                job.append(text, 0.0, style.format(palette, size));
            }
        }
    }

    job
}

#[derive(Default)]
pub struct Preview {
    source: String,
    key: Option<(Dialect, RenderOptions)>,
    blocks: Vec<Block>,
    html: String,
}

impl Preview {
    /// Re-parse only when the text or the processor settings changed
    pub fn refresh(&mut self, processor: &MarkdownProcessor, content: &str) {
        let key = (processor.dialect(), processor.options());
        if self.key == Some(key) && self.source == content {
            return;
        }
        self.blocks = processor.parse(content);
        self.html = render_blocks(&self.blocks, processor.options());
        self.source = content.to_string();
        self.key = Some(key);
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn show(&self, ui: &mut Ui, font_size: f32, show_html: bool) {
        if show_html {
            ui.add(egui::Label::new(RichText::new(&self.html).monospace().size(font_size)).wrap());
            return;
        }
        let palette = Palette::from_visuals(ui.visuals(), font_size);
        let breaks = self.key.is_none_or(|(_, options)| options.breaks);
        show_blocks(ui, &self.blocks, &palette, breaks);
    }
}

fn show_blocks(ui: &mut Ui, blocks: &[Block], palette: &Palette, breaks: bool) {
    for (index, block) in blocks.iter().enumerate() {
        ui.push_id(index, |ui| show_block(ui, block, palette, breaks));
    }
}

fn show_block(ui: &mut Ui, block: &Block, palette: &Palette, breaks: bool) {
    match block {
        Block::Heading { level, content } => {
            let (heading, size) = palette.heading(*level);
            ui.add(egui::Label::new(inline_job(content, &heading, size, breaks)).wrap());
        }
        Block::Paragraph { content } => {
            ui.add(egui::Label::new(inline_job(content, palette, palette.font_size, breaks)).wrap());
        }
        Block::CodeBlock { content, .. } => {
            egui::Frame::default()
                .fill(palette.code_bg)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.add(
                        egui::Label::new(
                            RichText::new(content.trim_end_matches('\n'))
                                .monospace()
                                .size(palette.font_size * 0.95),
                        )
                        .wrap(),
                    );
                });
        }
        Block::Rule => {
            ui.separator();
        }
        Block::Quote(inner) => {
            let quoted = Palette {
                text: palette.weak,
                ..palette.clone()
            };
            ui.horizontal_top(|ui| {
                ui.label(RichText::new("▌").color(palette.weak));
                ui.vertical(|ui| show_blocks(ui, inner, &quoted, breaks));
            });
        }
        Block::List(list) => show_list(ui, list, palette, breaks),
        Block::Table(table) => show_table(ui, table, palette, breaks),
    }
}

fn show_list(ui: &mut Ui, list: &List, palette: &Palette, breaks: bool) {
    for (index, item) in list.items.iter().enumerate() {
        let marker = if list.ordered {
            format!("{}.", list.start + index as u64)
        } else {
            "•".to_string()
        };
        ui.push_id(index, |ui| {
            ui.horizontal_top(|ui| {
                ui.label(RichText::new(marker).size(palette.font_size).color(palette.text));
                ui.vertical(|ui| show_blocks(ui, &item.blocks, palette, breaks));
            });
        });
    }
}

fn show_table(ui: &mut Ui, table: &Table, palette: &Palette, breaks: bool) {
    let header = Palette {
        text: palette.strong,
        ..palette.clone()
    };
    let cell = |ui: &mut Ui, tokens: &[Token], palette: &Palette, column: usize| {
        let mut job = inline_job(tokens, palette, palette.font_size, breaks);
        job.halign = match table.alignments.get(column) {
            Some(Alignment::Center) => egui::Align::Center,
            Some(Alignment::Right) => egui::Align::Max,
            _ => egui::Align::Min,
        };
        ui.add(egui::Label::new(job));
    };

    egui::Grid::new("markdown_table")
        .striped(true)
        .spacing(egui::vec2(16.0, 6.0))
        .show(ui, |ui| {
            for (column, tokens) in table.header.iter().enumerate() {
                cell(ui, tokens, &header, column);
            }
            ui.end_row();
            for row in &table.rows {
                for (column, tokens) in row.iter().enumerate() {
                    cell(ui, tokens, palette, column);
                }
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(src: &str) -> LayoutJob {
        let tokens = MarkdownProcessor::new(Dialect::Extended).parse_inline(src);
        inline_job(&tokens, &Palette::default(), 14.0, true)
    }

    #[test]
    fn underline_gets_a_stroke() {
        let job = job("a _b_ c");
        assert_eq!(job.text, "a b c");
        assert_eq!(job.sections.len(), 3);
        assert_eq!(job.sections[0].format.underline, Stroke::NONE);
        assert!(job.sections[1].format.underline.width > 0.0);
        assert_eq!(job.sections[2].format.underline, Stroke::NONE);
    }

    #[test]
    fn strikethrough_gets_a_stroke() {
        let job = job("a ~~b~~ c");
        assert_eq!(job.text, "a b c");
        assert_eq!(job.sections[0].format.strikethrough, Stroke::NONE);
        assert!(job.sections[1].format.strikethrough.width > 0.0);
        assert_eq!(job.sections[1].format.underline, Stroke::NONE);
        assert_eq!(job.sections[2].format.strikethrough, Stroke::NONE);
    }

    #[test]
    fn bare_url_is_drawn_as_link() {
        let palette = Palette::default();
        let job = job("at https://redmine.org");
        assert_eq!(job.text, "at https://redmine.org");
        assert_eq!(job.sections[1].format.color, palette.link);
    }

    #[test]
    fn emphasis_and_strong_styles() {
        let palette = Palette::default();
        let job = job("*i* **b**");
        assert!(job.sections[0].format.italics);
        assert!(!job.sections[2].format.italics);
        assert_eq!(job.sections[2].format.color, palette.strong);
    }

    #[test]
    fn code_is_monospace() {
        let job = job("run `cargo`");
        let code = &job.sections[1];
        assert_eq!(code.format.font_id.family, egui::FontFamily::Monospace);
        assert_eq!(code.format.background, Palette::default().code_bg);
    }

    #[test]
    fn soft_break_depends_on_option() {
        let tokens = MarkdownProcessor::default().parse_inline("a\nb");
        assert_eq!(inline_job(&tokens, &Palette::default(), 14.0, true).text, "a\nb");
        assert_eq!(inline_job(&tokens, &Palette::default(), 14.0, false).text, "a b");
    }

    #[test]
    fn refresh_is_cached_per_dialect() {
        let mut preview = Preview::default();
        preview.refresh(&MarkdownProcessor::new(Dialect::Extended), "_x_");
        assert_eq!(preview.html(), "<p><u>x</u></p>\n");

        preview.refresh(&MarkdownProcessor::new(Dialect::Standard), "_x_");
        assert_eq!(preview.html(), "<p><em>x</em></p>\n");
    }
}
