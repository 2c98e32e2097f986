use crate::config::Theme;
use crate::diff::DocumentStats;
use crate::markdown::Dialect;
use egui::{Align, Layout, Ui};
use std::path::PathBuf;

pub enum TitleBarAction {
    Open,
    OpenFile(PathBuf),
    Save,
    SaveAs,
    Copy,
    Clear,
    ToggleDialect,
    ToggleTheme,
    ToggleHtml,
    ReviewFile,
    ReviewSaved,
}

pub struct TitleBar;

pub struct TitleBarState<'a> {
    pub title: &'a str,
    pub dirty: bool,
    pub stats: DocumentStats,
    pub dialect: Dialect,
    pub theme: Theme,
    pub show_html: bool,
    pub has_saved_copy: bool,
    pub recent_files: &'a [PathBuf],
    pub status: Option<&'a str>,
}

impl TitleBar {
    pub fn show(ui: &mut Ui, state: TitleBarState<'_>) -> Option<TitleBarAction> {
        let TitleBarState {
            title,
            dirty,
            stats,
            dialect,
            theme,
            show_html,
            has_saved_copy,
            recent_files,
            status,
        } = state;

        let mut action = None;
        let title_bar_rect = ui.available_rect_before_wrap();

        // Dragging logic - registered BEFORE widgets so they can steal input
        let interact = ui.interact(
            title_bar_rect,
            ui.id().with("title_bar_drag"),
            egui::Sense::click_and_drag(),
        );
        if interact.double_clicked() {
            let is_fullscreen = ui.input(|i| i.viewport().fullscreen.unwrap_or(false));
            ui.ctx()
                .send_viewport_cmd(egui::ViewportCommand::Fullscreen(!is_fullscreen));
        }

        ui.horizontal(|ui| {
            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                let marker = if dirty { " •" } else { "" };
                ui.label(format!("{title}{marker}"));
                ui.add_space(16.0);

                ui.menu_button("📂", |ui| {
                    for path in recent_files {
                        let file_name = path
                            .file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("Unknown");
                        let path_str = path.to_string_lossy();
                        if ui
                            .button(file_name)
                            .on_hover_text(path_str.as_ref())
                            .clicked()
                        {
                            action = Some(TitleBarAction::OpenFile(path.clone()));
                            ui.close();
                        }
                    }
                    if !recent_files.is_empty() {
                        ui.separator();
                    }
                    if ui.button("Open File...").clicked() {
                        action = Some(TitleBarAction::Open);
                        ui.close();
                    }
                })
                .response
                .on_hover_text("Open");

                ui.menu_button("💾", |ui| {
                    if ui.button("Save").clicked() {
                        action = Some(TitleBarAction::Save);
                        ui.close();
                    }
                    if ui.button("Save As...").clicked() {
                        action = Some(TitleBarAction::SaveAs);
                        ui.close();
                    }
                })
                .response
                .on_hover_text("Save");

                if ui.button("📋").on_hover_text("Copy to clipboard").clicked() {
                    action = Some(TitleBarAction::Copy);
                }
                if ui.button("🗑").on_hover_text("Clear").clicked() {
                    action = Some(TitleBarAction::Clear);
                }

                ui.menu_button("Review", |ui| {
                    if ui
                        .add_enabled(has_saved_copy, egui::Button::new("Against saved copy"))
                        .on_disabled_hover_text("No file opened")
                        .clicked()
                    {
                        action = Some(TitleBarAction::ReviewSaved);
                        ui.close();
                    }
                    if ui.button("Against file...").clicked() {
                        action = Some(TitleBarAction::ReviewFile);
                        ui.close();
                    }
                });
            });

            // View toggles and stats
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 8.0;

                if ui
                    .button(theme.icon())
                    .on_hover_text("Toggle theme")
                    .clicked()
                {
                    action = Some(TitleBarAction::ToggleTheme);
                }
                if ui
                    .selectable_label(show_html, "</>")
                    .on_hover_text("Show rendered HTML")
                    .clicked()
                {
                    action = Some(TitleBarAction::ToggleHtml);
                }
                if ui
                    .button(dialect.label())
                    .on_hover_text("Switch Markdown dialect")
                    .clicked()
                {
                    action = Some(TitleBarAction::ToggleDialect);
                }

                ui.add_space(16.0);
                ui.label(
                    egui::RichText::new(format!(
                        "{} words | {} chars | {} lines",
                        stats.words, stats.characters, stats.lines
                    ))
                    .small(),
                );
                if let Some(status) = status {
                    ui.label(egui::RichText::new(status).small().weak());
                }
            });
        });

        action
    }
}
