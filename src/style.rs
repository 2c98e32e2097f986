use crate::config::Theme;
use egui::{Color32, Context, Stroke, Style, Visuals};

pub fn configure_style(ctx: &Context, theme: Theme) {
    let mut style = Style::default();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(15);

    ctx.set_style(style);
    ctx.set_visuals(visuals(theme));
}

fn visuals(theme: Theme) -> Visuals {
    let mut visuals = match theme {
        Theme::Dark => Visuals::dark(),
        Theme::Light => Visuals::light(),
    };
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;

    // Minimalist colors
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(0.0, Color32::TRANSPARENT);
    visuals.widgets.inactive.bg_fill = Color32::TRANSPARENT;

    match theme {
        Theme::Dark => {
            visuals.widgets.hovered.bg_fill = Color32::from_gray(50);
            visuals.widgets.active.bg_fill = Color32::from_gray(60);
            visuals.selection.bg_fill = Color32::from_rgb(40, 70, 120);
        }
        Theme::Light => {
            visuals.widgets.hovered.bg_fill = Color32::from_gray(240);
            visuals.widgets.active.bg_fill = Color32::from_gray(230);
            visuals.selection.bg_fill = Color32::from_rgb(200, 220, 255);
            visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(100, 100, 100));
        }
    }

    visuals
}
