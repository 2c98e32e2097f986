//! Side-by-side review of a revision against the editor content, in its own
//! viewport.

use crate::constant::{REVIEW_WINDOW_HEIGHT, REVIEW_WINDOW_WIDTH};
use crate::diff::{DiffRow, RowKind, paired_changes};
use crate::messages::Review;
use egui::{Color32, Context, FontId, RichText, ScrollArea, TextFormat, Ui, Vec2, text::LayoutJob};
use similar::{ChangeTag, TextDiff};
use std::collections::HashMap;

// Color constants for better maintainability
const REMOVED_LINE_BG: Color32 = Color32::from_rgb(255, 230, 230);
const ADDED_LINE_BG: Color32 = Color32::from_rgb(230, 255, 230);
const REMOVED_WORD_BG: Color32 = Color32::from_rgb(255, 170, 170);
const ADDED_WORD_BG: Color32 = Color32::from_rgb(170, 255, 170);
const REMOVED_TEXT_COLOR: Color32 = Color32::from_rgb(150, 0, 0);
const ADDED_TEXT_COLOR: Color32 = Color32::from_rgb(0, 100, 0);
const LINE_TEXT_COLOR: Color32 = Color32::from_gray(40);
const LINE_HEIGHT: f32 = 22.0;

#[derive(Debug)]
pub enum ReviewAction {
    /// Replace the editor content with this revision
    Apply(String),
    /// Closed before the revision arrived
    Cancel,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Original,
    Revised,
}

pub struct ReviewWindow {
    open: bool,
    /// Set while the worker is diffing; holds what is being loaded
    loading: Option<String>,
    review: Option<Review>,
    /// Row index to the row it is paired with on the other side
    partners: HashMap<usize, usize>,
    error: Option<String>,
    viewport_id: egui::ViewportId,
    pending_action: Option<ReviewAction>,
}

impl Default for ReviewWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewWindow {
    pub fn new() -> Self {
        Self {
            open: false,
            loading: None,
            review: None,
            partners: HashMap::new(),
            error: None,
            viewport_id: egui::ViewportId::from_hash_of("review_window"),
            pending_action: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the window in its loading state
    pub fn open_loading(&mut self, what: String) {
        self.open = true;
        self.loading = Some(what);
        self.review = None;
        self.partners.clear();
        self.error = None;
    }

    pub fn set_review(&mut self, review: Review) {
        self.open = true;
        self.partners = partner_map(&review);
        self.review = Some(review);
        self.loading = None;
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.open = true;
        self.loading = None;
        self.error = Some(error);
    }

    pub fn close(&mut self) {
        if self.loading.is_some() {
            self.pending_action = Some(ReviewAction::Cancel);
        }
        self.open = false;
        self.loading = None;
        self.review = None;
        self.partners.clear();
    }

    pub fn take_pending_action(&mut self) -> Option<ReviewAction> {
        self.pending_action.take()
    }

    pub fn show(&mut self, ctx: &Context) {
        if !self.open {
            return;
        }

        ctx.show_viewport_immediate(
            self.viewport_id,
            egui::ViewportBuilder::default()
                .with_title("Review changes")
                .with_inner_size([REVIEW_WINDOW_WIDTH, REVIEW_WINDOW_HEIGHT])
                .with_resizable(true),
            |ctx, _class| {
                egui::TopBottomPanel::top("review_title_bar").show(ctx, |ui| {
                    self.show_title_bar(ui);
                });

                egui::CentralPanel::default().show(ctx, |ui| {
                    self.show_content(ui);
                });

                if ctx.input(|i| i.viewport().close_requested()) {
                    self.close();
                }
            },
        );
    }

    fn show_title_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                ui.label("📝 Review");
                if let Some(review) = &self.review {
                    ui.label(RichText::new(review.source.label()).small().weak());
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 8.0;

                if ui.button("Discard").on_hover_text("Keep the editor as it is").clicked() {
                    self.close();
                }

                let can_apply = self.review.as_ref().is_some_and(|r| !r.diff.is_identical());
                if ui
                    .add_enabled(can_apply, egui::Button::new("Apply"))
                    .on_hover_text("Replace the editor content with this revision")
                    .clicked()
                    && let Some(review) = self.review.take()
                {
                    self.pending_action = Some(ReviewAction::Apply(review.revised));
                    self.close();
                }
            });
        });
    }

    fn show_content(&mut self, ui: &mut Ui) {
        if let Some(what) = &self.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Comparing with {what}…"));
            });
            return;
        }
        if let Some(error) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, error);
            return;
        }
        let Some(review) = &self.review else {
            return;
        };

        let stats = &review.diff.stats;
        ui.label(
            RichText::new(format!(
                "{} → {} lines · +{} / -{} lines · +{} / -{} chars",
                stats.original.lines,
                stats.revised.lines,
                stats.added_lines,
                stats.removed_lines,
                stats.added_chars,
                stats.removed_chars,
            ))
            .small(),
        );
        ui.separator();

        if review.diff.is_identical() {
            ui.label("No differences.");
            return;
        }

        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            render_diff_view(ui, &review.diff.original_rows, &review.diff.revised_rows, &self.partners);
        });
    }
}

fn partner_map(review: &Review) -> HashMap<usize, usize> {
    let mut partners = HashMap::new();
    for (removed, added) in paired_changes(&review.diff.operations) {
        partners.insert(removed, added);
        partners.insert(added, removed);
    }
    partners
}

/// Render both columns; paired changed lines get character-level highlights
fn render_diff_view(
    ui: &mut Ui,
    original: &[DiffRow],
    revised: &[DiffRow],
    partners: &HashMap<usize, usize>,
) {
    ui.style_mut().spacing.item_spacing.y = 1.0;

    // Subtract a little padding to prevent horizontal scrollbar jitter
    let col_w = (ui.available_width() / 2.0 - 15.0).max(100.0);

    egui::Grid::new("review_grid")
        .num_columns(2)
        .min_col_width(0.0)
        .spacing(Vec2::new(0.0, 0.0))
        .show(ui, |ui| {
            for (index, (left, right)) in original.iter().zip(revised).enumerate() {
                let partner = partners.get(&index).copied();
                let left_partner = partner.map(|p| revised[p].content.as_str());
                let right_partner = partner.map(|p| original[p].content.as_str());

                render_cell(ui, left, left_partner, Side::Original, col_w);
                render_cell(ui, right, right_partner, Side::Revised, col_w);
                ui.end_row();
            }
        });
}

fn line_format(font_id: &FontId, color: Color32) -> TextFormat {
    TextFormat {
        font_id: font_id.clone(),
        color,
        line_height: Some(LINE_HEIGHT),
        ..Default::default()
    }
}

/// One cell of the grid; `partner` is the paired line on the other side
fn render_cell(ui: &mut Ui, row: &DiffRow, partner: Option<&str>, side: Side, width: f32) {
    let font_id = FontId::monospace(13.0);

    let line_bg = match row.kind {
        RowKind::Removed => REMOVED_LINE_BG,
        RowKind::Added => ADDED_LINE_BG,
        RowKind::Unchanged | RowKind::Empty => Color32::TRANSPARENT,
    };

    egui::Frame::default()
        .fill(line_bg)
        .inner_margin(4.0)
        .show(ui, |ui| {
            ui.set_min_width(width - 8.0);

            if row.is_placeholder() {
                ui.label("");
                return;
            }

            let base_color = match row.kind {
                RowKind::Unchanged => ui.visuals().text_color(),
                _ => LINE_TEXT_COLOR,
            };
            let mut job = LayoutJob::default();

            let number = row.line_number.map_or(String::new(), |n| format!("{n:>4} "));
            job.append(&number, 0.0, line_format(&font_id, base_color.gamma_multiply(0.5)));
            let prefix = match row.kind {
                RowKind::Removed => "- ",
                RowKind::Added => "+ ",
                _ => "  ",
            };
            job.append(prefix, 0.0, line_format(&font_id, base_color.gamma_multiply(0.5)));

            match partner {
                Some(other) if row.kind != RowKind::Unchanged => {
                    append_highlighted(&mut job, row, other, side, &font_id, base_color);
                }
                _ => job.append(&row.content, 0.0, line_format(&font_id, base_color)),
            }

            job.wrap.max_width = width - 8.0;
            ui.add(egui::Label::new(job).wrap());
        });
}

/// Character-level diff against the partner line (better for CJK than words)
fn append_highlighted(
    job: &mut LayoutJob,
    row: &DiffRow,
    other: &str,
    side: Side,
    font_id: &FontId,
    base_color: Color32,
) {
    let (old, new) = match side {
        Side::Original => (row.content.as_str(), other),
        Side::Revised => (other, row.content.as_str()),
    };
    let diff = TextDiff::from_chars(old, new);

    for change in diff.iter_all_changes() {
        let text = change.value();
        match (change.tag(), side) {
            (ChangeTag::Equal, _) => job.append(text, 0.0, line_format(font_id, base_color)),
            (ChangeTag::Delete, Side::Original) => job.append(
                text,
                0.0,
                TextFormat {
                    background: REMOVED_WORD_BG,
                    ..line_format(font_id, REMOVED_TEXT_COLOR)
                },
            ),
            (ChangeTag::Insert, Side::Revised) => job.append(
                text,
                0.0,
                TextFormat {
                    background: ADDED_WORD_BG,
                    ..line_format(font_id, ADDED_TEXT_COLOR)
                },
            ),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_line_diff;
    use crate::messages::RevisionSource;
    use std::path::PathBuf;

    fn review(original: &str, revised: &str) -> Review {
        Review {
            source: RevisionSource::File(PathBuf::from("rev.md")),
            revised: revised.to_string(),
            diff: compute_line_diff(original, revised),
        }
    }

    #[test]
    fn partners_point_both_ways() {
        let partners = partner_map(&review("a\nold\nc", "a\nnew\nc"));
        assert_eq!(partners.get(&1), Some(&2));
        assert_eq!(partners.get(&2), Some(&1));
        assert_eq!(partners.len(), 2);
    }

    #[test]
    fn highlight_keeps_only_own_side() {
        let row = DiffRow {
            kind: RowKind::Removed,
            content: "hello cat".to_string(),
            line_number: Some(1),
        };
        let font = FontId::monospace(13.0);

        let mut job = LayoutJob::default();
        append_highlighted(&mut job, &row, "hello dog", Side::Original, &font, Color32::BLACK);
        assert_eq!(job.text, "hello cat");

        let row = DiffRow {
            kind: RowKind::Added,
            content: "hello dog".to_string(),
            line_number: Some(1),
        };
        let mut job = LayoutJob::default();
        append_highlighted(&mut job, &row, "hello cat", Side::Revised, &font, Color32::BLACK);
        assert_eq!(job.text, "hello dog");
        assert!(job.sections.iter().any(|s| s.format.background == ADDED_WORD_BG));
    }

    #[test]
    fn apply_hands_over_the_revision() {
        let mut window = ReviewWindow::new();
        window.open_loading("rev.md".to_string());
        assert!(window.is_open());
        window.set_review(review("a", "b"));
        window.pending_action = window.review.take().map(|r| ReviewAction::Apply(r.revised));
        match window.take_pending_action() {
            Some(ReviewAction::Apply(text)) => assert_eq!(text, "b"),
            _ => panic!("expected an apply action"),
        }
        assert!(window.take_pending_action().is_none());
    }

    #[test]
    fn closing_while_loading_cancels() {
        let mut window = ReviewWindow::new();
        window.open_loading("rev.md".to_string());
        window.close();
        assert!(!window.is_open());
        assert!(matches!(window.take_pending_action(), Some(ReviewAction::Cancel)));

        window.set_review(review("a", "a"));
        window.close();
        assert!(window.take_pending_action().is_none());
    }
}
