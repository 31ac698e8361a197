//! Backend → UI events and their mapping onto session transitions.

use std::path::PathBuf;

use session::SessionEvent;
use shared::{ImagePayload, SessionError};

pub enum UiEvent {
    WorkerReady,
    WorkerFailed(String),
    UploadFinished(Result<ImagePayload, SessionError>),
    GenerationFinished {
        epoch: u64,
        outcome: Result<ImagePayload, SessionError>,
    },
    DownloadFinished(Result<PathBuf, SessionError>),
}

/// What the app does with a backend event: an optional session transition
/// and the new status line.
pub struct EventEffect {
    pub session: Option<SessionEvent>,
    pub status: String,
}

impl UiEvent {
    pub fn into_effect(self) -> EventEffect {
        match self {
            UiEvent::WorkerReady => EventEffect {
                session: None,
                status: "Ready".to_string(),
            },
            UiEvent::WorkerFailed(reason) => EventEffect {
                session: None,
                status: format!("Background worker unavailable: {reason}"),
            },
            UiEvent::UploadFinished(Ok(image)) => EventEffect {
                status: format!(
                    "Loaded {} ({})",
                    image.mime_type(),
                    human_readable_bytes(image.len() as u64)
                ),
                session: Some(SessionEvent::SourceLoaded(image)),
            },
            UiEvent::UploadFinished(Err(err)) => EventEffect {
                status: "Photo not loaded".to_string(),
                session: Some(SessionEvent::UploadRejected(err)),
            },
            UiEvent::GenerationFinished { epoch, outcome } => EventEffect {
                status: match &outcome {
                    Ok(_) => "Character ready".to_string(),
                    Err(_) => "Generation failed".to_string(),
                },
                session: Some(SessionEvent::generation_finished(epoch, outcome)),
            },
            UiEvent::DownloadFinished(Ok(path)) => EventEffect {
                session: None,
                status: format!("Saved {}", path.display()),
            },
            UiEvent::DownloadFinished(Err(err)) => EventEffect {
                session: Some(SessionEvent::DownloadFailed(err)),
                status: "Download failed".to_string(),
            },
        }
    }
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else if value.fract() == 0.0 {
        format!("{value:.0} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
