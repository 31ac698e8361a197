//! Stateless panel renderers. Each one reads the session and reports what the
//! user clicked; the app applies the resulting actions after the frame.

use eframe::egui::{self, RichText};
use session::SessionState;
use shared::AgeCategory;

use crate::controller::events::human_readable_bytes;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    PickPhoto,
    SelectAge(AgeCategory),
    Generate,
    Clear,
    Download,
    DismissError,
}

/// Generate waits for a pending photo so the attempt uses the photo the user just picked.
pub fn generate_enabled(session: &SessionState, upload_in_progress: bool) -> bool {
    session.can_generate() && !upload_in_progress
}

pub struct SidebarView<'a> {
    pub session: &'a SessionState,
    pub source_texture: Option<&'a egui::TextureHandle>,
    pub upload_in_progress: bool,
    pub max_upload_bytes: u64,
}

pub fn sidebar(ui: &mut egui::Ui, view: &SidebarView<'_>, actions: &mut Vec<UiAction>) {
    let session = view.session;

    ui.add_space(12.0);
    ui.heading(RichText::new("Character Studio").color(theme::ACCENT).strong());
    ui.label(RichText::new("Turn a photo into a 3D character").color(theme::MUTED_TEXT));
    ui.add_space(16.0);

    ui.label(RichText::new("1. Upload a photo").strong());
    egui::Frame::NONE
        .fill(theme::ACCENT_SOFT)
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_min_height(180.0);
            ui.vertical_centered(|ui| match view.source_texture {
                Some(texture) => {
                    ui.add(egui::Image::new(texture).max_size(egui::vec2(260.0, 180.0)));
                }
                None => {
                    ui.add_space(60.0);
                    ui.label(RichText::new("No photo yet").color(theme::MUTED_TEXT));
                }
            });
        });
    ui.add_space(6.0);
    let pick_enabled = !session.is_busy() && !view.upload_in_progress;
    let pick_label = if view.upload_in_progress {
        "Reading photo..."
    } else if session.source().is_some() {
        "Choose another photo"
    } else {
        "Choose photo"
    };
    if ui
        .add_enabled(pick_enabled, egui::Button::new(pick_label).min_size(egui::vec2(260.0, 28.0)))
        .clicked()
    {
        actions.push(UiAction::PickPhoto);
    }
    ui.small(
        RichText::new(format!(
            "PNG, JPEG, WebP, GIF or BMP up to {}",
            human_readable_bytes(view.max_upload_bytes)
        ))
        .color(theme::MUTED_TEXT),
    );

    ui.add_space(16.0);
    ui.label(RichText::new("2. Pick an age group").strong());
    let mut selected = session.age();
    ui.horizontal_wrapped(|ui| {
        for age in AgeCategory::ALL {
            ui.selectable_value(&mut selected, age, age.label());
        }
    });
    if selected != session.age() {
        actions.push(UiAction::SelectAge(selected));
    }

    ui.add_space(16.0);
    let generate_label = if session.is_busy() {
        "Generating..."
    } else {
        "Generate character"
    };
    let generate = egui::Button::new(RichText::new(generate_label).strong().color(egui::Color32::WHITE))
        .fill(theme::ACCENT)
        .min_size(egui::vec2(260.0, 36.0));
    if ui
        .add_enabled(generate_enabled(session, view.upload_in_progress), generate)
        .clicked()
    {
        actions.push(UiAction::Generate);
    }
}

pub struct PreviewView<'a> {
    pub session: &'a SessionState,
    pub result_texture: Option<&'a egui::TextureHandle>,
}

pub fn preview(ui: &mut egui::Ui, view: &PreviewView<'_>, actions: &mut Vec<UiAction>) {
    let session = view.session;

    if session.is_busy() {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            ui.spinner();
            ui.add_space(8.0);
            ui.label(format!("Creating your {} character...", session.age().label().to_lowercase()));
            ui.small(RichText::new("This can take a little while").color(theme::MUTED_TEXT));
        });
        return;
    }

    if session.result().is_none() {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading("Welcome");
            ui.label(
                RichText::new("Upload a photo, choose an age group and press Generate.")
                    .color(theme::MUTED_TEXT),
            );
        });
        return;
    }

    ui.horizontal(|ui| {
        if ui.button("Clear").clicked() {
            actions.push(UiAction::Clear);
        }
        if ui.button("Download JPEG").clicked() {
            actions.push(UiAction::Download);
        }
    });
    ui.separator();
    ui.vertical_centered(|ui| match view.result_texture {
        Some(texture) => {
            ui.add(egui::Image::new(texture).max_size(ui.available_size()));
        }
        None => {
            ui.label(RichText::new("The generated image cannot be previewed").color(theme::MUTED_TEXT));
        }
    });
}

pub fn error_banner(ctx: &egui::Context, session: &SessionState, actions: &mut Vec<UiAction>) {
    let Some(error) = session.error() else {
        return;
    };
    egui::TopBottomPanel::top("error_banner")
        .frame(
            egui::Frame::NONE
                .fill(theme::ERROR_FILL)
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(error.user_message()).color(theme::ERROR_TEXT));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Dismiss").clicked() {
                        actions.push(UiAction::DismissError);
                    }
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use session::{reduce, SessionEvent};
    use shared::ImagePayload;

    #[test]
    fn generate_waits_for_source_and_pending_upload() {
        let empty = SessionState::default();
        assert!(!generate_enabled(&empty, false));

        let ready = reduce(
            empty,
            SessionEvent::SourceLoaded(ImagePayload::from_bytes("image/png", vec![1])),
        );
        assert!(generate_enabled(&ready, false));
        assert!(!generate_enabled(&ready, true));

        let busy = reduce(ready, SessionEvent::GenerationRequested);
        assert!(!generate_enabled(&busy, false));
    }
}
