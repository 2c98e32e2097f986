use crate::config::{Config, Settings};
use crate::constant::{DEFAULT_WINDOW_WIDTH, DRAFT_INTERVAL_SECS, MARKDOWN_EXTENSIONS};
use crate::diff::DocumentStats;
use crate::document::Document;
use crate::markdown::{MarkdownProcessor, RenderOptions};
use crate::messages::{ResponseMessage, RevisionSource};
use crate::saver::{self, SaverMessage, spawn_saver};
use crate::style::configure_style;
use crate::ui::editor::Editor;
use crate::ui::preview::Preview;
use crate::ui::review::{ReviewAction, ReviewWindow};
use crate::ui::title_bar::{TitleBar, TitleBarAction, TitleBarState};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub struct ReddownApp {
    config: Config,
    document: Document,
    editor: Editor,
    preview: Preview,
    processor: MarkdownProcessor,
    review: ReviewWindow,
    saver_sender: Sender<SaverMessage>,
    response_receiver: Receiver<ResponseMessage>,
    reviews: ReviewRequests,
    /// Revision files chosen in the picker thread
    picked_sender: Sender<PathBuf>,
    picked_receiver: Receiver<PathBuf>,
    show_html: bool,
    confirm_clear: bool,
    status: Option<String>,
    data_dir: PathBuf,
    draft_pending: bool,
    last_draft: Instant,
}

impl ReddownApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_file: Option<PathBuf>) -> Self {
        let config = Config::default();
        configure_style(&cc.egui_ctx, config.settings.theme);

        let data_dir = Config::data_dir();
        let repaint_ctx = cc.egui_ctx.clone();
        let (saver_sender, response_receiver) =
            spawn_saver(data_dir.clone(), move || repaint_ctx.request_repaint());
        let document = match saver::load_draft(&data_dir) {
            Some(draft) => Document::unsaved(draft),
            None => Document::welcome(),
        };

        let (picked_sender, picked_receiver) = mpsc::channel();
        let mut app = Self {
            editor: Editor::new(config.settings.font_size),
            processor: processor_for(&config.settings),
            config,
            document,
            preview: Preview::default(),
            review: ReviewWindow::new(),
            saver_sender,
            response_receiver,
            reviews: ReviewRequests::default(),
            picked_sender,
            picked_receiver,
            show_html: false,
            confirm_clear: false,
            status: None,
            data_dir,
            draft_pending: false,
            last_draft: Instant::now(),
        };

        if let Some(path) = initial_file {
            app.send(SaverMessage::Open(path));
        }
        app
    }

    fn send(&mut self, message: SaverMessage) {
        if let Err(e) = self.saver_sender.send(message) {
            error!("Failed to reach the background worker: {}", e);
            self.status = Some("Background worker stopped".to_string());
        }
    }

    fn handle_responses(&mut self) {
        while let Ok(response) = self.response_receiver.try_recv() {
            match response {
                ResponseMessage::FileLoaded(Ok((path, content))) => {
                    self.document = Document::from_file(path.clone(), content);
                    self.status = Some(format!("Opened {}", self.document.file_name()));
                    self.config.add_recent_file(path);
                }
                ResponseMessage::FileSaved(Ok((path, content))) => {
                    self.document.mark_saved(path.clone(), content);
                    self.status = Some(format!(
                        "Saved {} at {}",
                        self.document.file_name(),
                        chrono::Local::now().format("%H:%M")
                    ));
                    self.config.add_recent_file(path);
                }
                ResponseMessage::FileLoaded(Err(e)) | ResponseMessage::FileSaved(Err(e)) => {
                    error!("{}", e);
                    self.status = Some(e);
                }
                ResponseMessage::ReviewReady { id, result } => {
                    if !self.reviews.settle(id) {
                        debug!("Discarding stale review {}", id);
                        continue;
                    }
                    match result {
                        Ok(review) => self.review.set_review(review),
                        Err(e) => {
                            error!("{}", e);
                            self.review.set_error(e);
                        }
                    }
                }
            }
        }

        while let Ok(path) = self.picked_receiver.try_recv() {
            self.start_review(RevisionSource::File(path));
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: TitleBarAction) {
        match action {
            TitleBarAction::Open => {
                let sender = self.saver_sender.clone();
                std::thread::spawn(move || {
                    if let Some(path) = file_dialog("Open").pick_file()
                        && let Err(e) = sender.send(SaverMessage::Open(path))
                    {
                        error!("Failed to send open message: {}", e);
                    }
                });
            }
            TitleBarAction::OpenFile(path) => self.send(SaverMessage::Open(path)),
            TitleBarAction::Save => match self.document.path() {
                Some(path) => {
                    let message = SaverMessage::Save {
                        path: path.to_path_buf(),
                        content: self.document.content.clone(),
                    };
                    self.send(message);
                }
                None => self.save_as(),
            },
            TitleBarAction::SaveAs => self.save_as(),
            TitleBarAction::Copy => {
                ctx.copy_text(self.document.content.clone());
                self.status = Some("Content copied to clipboard!".to_string());
            }
            TitleBarAction::Clear => self.confirm_clear = true,
            TitleBarAction::ToggleDialect => {
                let markdown = &mut self.config.settings.markdown;
                markdown.dialect = markdown.dialect.toggled();
                info!("Switched to {} dialect", markdown.dialect.label());
                self.processor = processor_for(&self.config.settings);
                self.config.save_in_background();
            }
            TitleBarAction::ToggleTheme => {
                let theme = self.config.settings.theme.toggled();
                self.config.settings.theme = theme;
                configure_style(ctx, theme);
                self.config.save_in_background();
            }
            TitleBarAction::ToggleHtml => self.show_html = !self.show_html,
            TitleBarAction::ReviewSaved => {
                if let Some(path) = self.document.path() {
                    let source = RevisionSource::SavedCopy(path.to_path_buf());
                    self.start_review(source);
                }
            }
            TitleBarAction::ReviewFile => {
                let sender = self.picked_sender.clone();
                let ctx = ctx.clone();
                std::thread::spawn(move || {
                    if let Some(path) = file_dialog("Review against").pick_file() {
                        if let Err(e) = sender.send(path) {
                            error!("Failed to send picked revision: {}", e);
                        }
                        ctx.request_repaint();
                    }
                });
            }
        }
    }

    /// Show the loading window and ask the worker for the diff
    fn start_review(&mut self, source: RevisionSource) {
        self.review.open_loading(source.label());
        let id = self.reviews.begin();
        let original = self.document.content.clone();
        self.send(SaverMessage::Review {
            id,
            original,
            source,
        });
    }

    fn save_as(&mut self) {
        let sender = self.saver_sender.clone();
        let content = self.document.content.clone();
        let file_name = self.document.file_name();
        std::thread::spawn(move || {
            if let Some(path) = file_dialog("Save As").set_file_name(file_name).save_file()
                && let Err(e) = sender.send(SaverMessage::Save { path, content })
            {
                error!("Failed to send save message: {}", e);
            }
        });
    }

    fn show_clear_dialog(&mut self, ctx: &egui::Context) {
        if !self.confirm_clear {
            return;
        }
        egui::Window::new("Clear editor")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Are you sure you want to clear the editor?");
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        self.document.clear();
                        self.draft_pending = false;
                        self.send(SaverMessage::ClearDraft);
                        self.confirm_clear = false;
                    }
                    if ui.button("Cancel").clicked() {
                        self.confirm_clear = false;
                    }
                });
            });
    }

    /// Write the draft at most once per interval while typing
    fn flush_draft(&mut self, ctx: &egui::Context) {
        if !self.draft_pending {
            return;
        }
        let interval = Duration::from_secs(DRAFT_INTERVAL_SECS);
        let elapsed = self.last_draft.elapsed();
        if elapsed >= interval {
            self.send(SaverMessage::StoreDraft(self.document.content.clone()));
            self.draft_pending = false;
            self.last_draft = Instant::now();
        } else {
            ctx.request_repaint_after(interval - elapsed);
        }
    }
}

/// Ids of review requests sent to the worker. Only the latest one is wanted.
#[derive(Debug, Default)]
struct ReviewRequests {
    next_id: u64,
    pending: Option<u64>,
}

impl ReviewRequests {
    fn begin(&mut self) -> u64 {
        self.next_id += 1;
        self.pending = Some(self.next_id);
        self.next_id
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether the answer for `id` is still wanted; clears the pending id if so
    fn settle(&mut self, id: u64) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

fn processor_for(settings: &Settings) -> MarkdownProcessor {
    MarkdownProcessor::with_options(
        settings.markdown.dialect,
        RenderOptions {
            breaks: settings.markdown.breaks,
        },
    )
}

fn file_dialog(title: &str) -> rfd::FileDialog {
    let dialog = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Markdown", MARKDOWN_EXTENSIONS);
    match Config::documents_dir() {
        Some(dir) => dialog.set_directory(dir),
        None => dialog,
    }
}

impl eframe::App for ReddownApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_responses();

        let shortcut = ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
                Some(TitleBarAction::Save)
            } else if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                Some(TitleBarAction::Open)
            } else {
                None
            }
        });
        if let Some(action) = shortcut {
            self.handle_action(ctx, action);
        }

        // Title Bar
        let title = self.document.file_name();
        let stats = DocumentStats::of(&self.document.content);
        let action = egui::TopBottomPanel::top("title_bar_panel")
            .show(ctx, |ui| {
                TitleBar::show(
                    ui,
                    TitleBarState {
                        title: &title,
                        dirty: self.document.is_dirty(),
                        stats,
                        dialect: self.processor.dialect(),
                        theme: self.config.settings.theme,
                        show_html: self.show_html,
                        has_saved_copy: self.document.path().is_some(),
                        recent_files: &self.config.settings.recent_files,
                        status: self.status.as_deref(),
                    },
                )
            })
            .inner;
        if let Some(action) = action {
            self.handle_action(ctx, action);
        }

        // Editor
        egui::SidePanel::left("editor_panel")
            .resizable(true)
            .default_width(DEFAULT_WINDOW_WIDTH / 2.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("editor_scroll")
                    .show(ui, |ui| {
                        if self.editor.show(ui, &mut self.document.content) {
                            self.draft_pending = true;
                        }
                    });
            });

        // Preview
        self.preview.refresh(&self.processor, &self.document.content);
        let font_size = self.config.settings.font_size;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("preview_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.preview.show(ui, font_size, self.show_html);
                });
        });

        self.show_clear_dialog(ctx);

        self.review.show(ctx);
        match self.review.take_pending_action() {
            Some(ReviewAction::Apply(revised)) => {
                self.document.content = revised;
                self.draft_pending = true;
                self.status = Some("Applied revision".to_string());
            }
            Some(ReviewAction::Cancel) => self.reviews.cancel(),
            None => {}
        }
        self.flush_draft(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let content = &self.document.content;
        if content.trim().is_empty() {
            saver::clear_draft(&self.data_dir);
        } else if let Err(e) = saver::store_draft(&self.data_dir, content) {
            error!("Failed to store draft on exit: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_pending_before_a_request() {
        let mut reviews = ReviewRequests::default();
        assert_eq!(reviews.pending, None);
        assert!(!reviews.settle(0));
        assert!(!reviews.settle(1));
    }

    #[test]
    fn answer_settles_once() {
        let mut reviews = ReviewRequests::default();
        let id = reviews.begin();
        assert!(reviews.settle(id));
        assert!(!reviews.settle(id));
        assert_eq!(reviews.pending, None);
    }

    #[test]
    fn newer_request_makes_older_answer_stale() {
        let mut reviews = ReviewRequests::default();
        let first = reviews.begin();
        let second = reviews.begin();
        assert_ne!(first, second);
        assert!(!reviews.settle(first));
        assert!(reviews.settle(second));
    }

    #[test]
    fn cancelled_request_is_dropped() {
        let mut reviews = ReviewRequests::default();
        let id = reviews.begin();
        reviews.cancel();
        assert!(!reviews.settle(id));
    }
}
