mod backend_bridge;
mod controller;
mod preview;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::backend_bridge::runtime::{self, WorkerSettings};
use crate::controller::events::UiEvent;
use crate::ui::app::CharacterStudioApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = WorkerSettings::from_env();
    if settings.gateway.resolve_api_key().is_none() {
        tracing::error!(
            checked = ?settings.gateway.api_key_vars,
            "no API key configured; generation requests will fail until one is set"
        );
    }
    tracing::info!(
        endpoint = %settings.gateway.endpoint,
        model = %settings.gateway.model,
        max_upload_bytes = settings.upload_policy.max_bytes,
        "starting character studio"
    );
    let max_upload_bytes = settings.upload_policy.max_bytes;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Character Studio")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([760.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Character Studio",
        options,
        Box::new(move |cc| {
            Ok(Box::new(CharacterStudioApp::new(
                cc,
                cmd_tx,
                ui_rx,
                max_upload_bytes,
            )))
        }),
    )
}
