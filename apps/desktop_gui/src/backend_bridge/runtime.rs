//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use anyhow::Context as _;
use crossbeam_channel::{Receiver, Sender};
use gateway::{GatewaySettings, GeminiGateway};
use session::UploadPolicy;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Settings the worker reads once at startup.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub gateway: GatewaySettings,
    pub upload_policy: UploadPolicy,
}

impl WorkerSettings {
    pub fn from_env() -> Self {
        Self {
            gateway: GatewaySettings::from_env(),
            upload_policy: UploadPolicy::from_env(),
        }
    }
}

fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("character-studio-worker")
        .build()
        .context("failed to build backend runtime")
}

fn emit(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if let Err(err) = ui_tx.send(event) {
        tracing::warn!("ui event channel closed: {err}");
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: WorkerSettings) {
    thread::spawn(move || {
        let runtime = match build_runtime() {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("{err:#}");
                emit(&ui_tx, UiEvent::WorkerFailed(format!("{err:#}")));
                return;
            }
        };

        runtime.block_on(async move {
            let gateway = Arc::new(GeminiGateway::new(settings.gateway));
            let policy = settings.upload_policy;
            emit(&ui_tx, UiEvent::WorkerReady);

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadUpload { path } => {
                        let ui_tx = ui_tx.clone();
                        tokio::task::spawn_blocking(move || {
                            let outcome = session::read_upload(&path, &policy);
                            emit(&ui_tx, UiEvent::UploadFinished(outcome));
                        });
                    }
                    BackendCommand::Generate(ticket) => {
                        let gateway = Arc::clone(&gateway);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = session::run_generation(gateway.as_ref(), &ticket).await;
                            emit(
                                &ui_tx,
                                UiEvent::GenerationFinished {
                                    epoch: ticket.epoch,
                                    outcome,
                                },
                            );
                        });
                    }
                    BackendCommand::SaveDownload { image, path } => {
                        let ui_tx = ui_tx.clone();
                        tokio::task::spawn_blocking(move || {
                            let outcome = session::save_download(&image, &path);
                            if let Err(err) = &outcome {
                                tracing::warn!(kind = ?err.kind, "download failed: {}", err.detail);
                            }
                            emit(&ui_tx, UiEvent::DownloadFinished(outcome));
                        });
                    }
                }
            }
            tracing::info!("ui command channel closed; backend worker exiting");
        });
    });
}
