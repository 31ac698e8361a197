//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use session::GenerationTicket;
use shared::ImagePayload;

pub enum BackendCommand {
    LoadUpload { path: PathBuf },
    Generate(GenerationTicket),
    SaveDownload { image: ImagePayload, path: PathBuf },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadUpload { .. } => "load_upload",
            BackendCommand::Generate(_) => "generate",
            BackendCommand::SaveDownload { .. } => "save_download",
        }
    }
}
