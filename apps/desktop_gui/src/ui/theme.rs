//! Palette and visuals for the studio window.

use eframe::egui::{self, Color32};

pub const ACCENT: Color32 = Color32::from_rgb(219, 39, 119);
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(252, 231, 243);
pub const BACKGROUND: Color32 = Color32::from_rgb(253, 242, 248);
pub const SIDEBAR: Color32 = Color32::from_rgb(255, 255, 255);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(107, 114, 128);
pub const ERROR_FILL: Color32 = Color32::from_rgb(254, 226, 226);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(153, 27, 27);

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = SIDEBAR;
    visuals.hyperlink_color = ACCENT;
    visuals.selection.bg_fill = ACCENT;
    visuals.selection.stroke = egui::Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.hovered.weak_bg_fill = ACCENT_SOFT;
    ctx.set_visuals(visuals);
}
