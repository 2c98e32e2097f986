use egui::{FontId, Ui};

pub struct Editor {
    font_size: f32,
}

impl Editor {
    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }

    /// Returns true when the text changed this frame
    pub fn show(&mut self, ui: &mut Ui, content: &mut String) -> bool {
        ui.add(
            egui::TextEdit::multiline(content)
                .code_editor()
                .font(FontId::monospace(self.font_size))
                .frame(false)
                .lock_focus(true)
                .desired_width(f32::INFINITY)
                .desired_rows(30),
        )
        .changed()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(14.0)
    }
}
