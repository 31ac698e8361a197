//! The studio window: owns the session state and applies the reducer on the UI thread.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use session::{reduce, request_generation, SessionEvent, SessionState};
use shared::{ErrorKind, SessionError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::preview::PreviewSlot;
use crate::ui::panels::{self, PreviewView, SidebarView, UiAction};
use crate::ui::theme;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "bmp"];

pub struct CharacterStudioApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session: SessionState,
    status: String,
    upload_in_progress: bool,
    max_upload_bytes: u64,
    source_preview: PreviewSlot,
    result_preview: PreviewSlot,
}

impl CharacterStudioApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        max_upload_bytes: u64,
    ) -> Self {
        theme::apply(&cc.egui_ctx);
        Self {
            cmd_tx,
            ui_rx,
            session: SessionState::default(),
            status: "Starting background worker...".to_string(),
            upload_in_progress: false,
            max_upload_bytes,
            source_preview: PreviewSlot::default(),
            result_preview: PreviewSlot::default(),
        }
    }

    fn apply(&mut self, event: SessionEvent) {
        let state = std::mem::take(&mut self.session);
        self.session = reduce(state, event);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if matches!(event, UiEvent::UploadFinished(_)) {
                self.upload_in_progress = false;
            }
            let effect = event.into_effect();
            self.status = effect.status;
            if let Some(session_event) = effect.session {
                self.apply(session_event);
            }
        }
    }

    fn pick_photo(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Choose a photo")
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        tracing::info!(path = %path.display(), "photo picked");
        let cmd = BackendCommand::LoadUpload { path };
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status).is_ok() {
            self.upload_in_progress = true;
            self.status = "Reading photo...".to_string();
        }
    }

    fn start_generation(&mut self) {
        if !panels::generate_enabled(&self.session, self.upload_in_progress) {
            return;
        }
        let (next, ticket) = request_generation(std::mem::take(&mut self.session));
        self.session = next;
        let Some(ticket) = ticket else {
            return;
        };
        let epoch = ticket.epoch;
        self.status = format!("Generating ({})", ticket.age);
        if dispatch_backend_command(&self.cmd_tx, BackendCommand::Generate(ticket), &mut self.status)
            .is_err()
        {
            self.apply(SessionEvent::GenerationFailed {
                epoch,
                error: SessionError::new(
                    ErrorKind::TransportFailure,
                    "generation request could not be queued",
                ),
            });
        }
    }

    fn save_result(&mut self) {
        let Some(image) = self.session.result().cloned() else {
            return;
        };
        let file_name = session::default_file_name(chrono::Utc::now());
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save character")
            .set_file_name(&file_name)
            .add_filter("JPEG image", &["jpg", "jpeg"]);
        if let Some(dir) = dirs::download_dir() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };
        let cmd = BackendCommand::SaveDownload { image, path };
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status).is_ok() {
            self.status = "Saving...".to_string();
        }
    }

    fn handle(&mut self, action: UiAction) {
        match action {
            UiAction::PickPhoto => self.pick_photo(),
            UiAction::SelectAge(age) => self.apply(SessionEvent::AgeSelected(age)),
            UiAction::Generate => self.start_generation(),
            UiAction::Clear => {
                self.apply(SessionEvent::Cleared);
                self.status = "Cleared".to_string();
            }
            UiAction::Download => self.save_result(),
            UiAction::DismissError => self.apply(SessionEvent::ErrorDismissed),
        }
    }
}

impl eframe::App for CharacterStudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let source_texture = self
            .source_preview
            .sync(ctx, "source-photo", self.session.source());
        let result_texture = self
            .result_preview
            .sync(ctx, "generated-character", self.session.result());

        let mut actions = Vec::new();

        panels::error_banner(ctx, &self.session, &mut actions);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.status);
        });

        egui::SidePanel::left("studio_sidebar")
            .resizable(false)
            .exact_width(300.0)
            .frame(
                egui::Frame::NONE
                    .fill(theme::SIDEBAR)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                panels::sidebar(
                    ui,
                    &SidebarView {
                        session: &self.session,
                        source_texture: source_texture.as_ref(),
                        upload_in_progress: self.upload_in_progress,
                        max_upload_bytes: self.max_upload_bytes,
                    },
                    &mut actions,
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            panels::preview(
                ui,
                &PreviewView {
                    session: &self.session,
                    result_texture: result_texture.as_ref(),
                },
                &mut actions,
            );
        });

        for action in actions {
            self.handle(action);
        }

        if self.session.is_busy() || self.upload_in_progress {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
