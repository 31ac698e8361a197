//! Drives a [`SessionState`] through uploads, generations and downloads.

use std::path::{Path, PathBuf};

use gateway::GenerationGateway;
use shared::{AgeCategory, ImagePayload, SessionError};
use tracing::{error, info, warn};

use crate::{
    download,
    state::{reduce, request_generation, GenerationTicket, SessionEvent, SessionState},
    upload::{self, UploadPolicy},
};

/// Runs one dispatched attempt. Failures that need operator attention are
/// logged at `error`, the rest at `warn`.
pub async fn run_generation<G>(
    gateway: &G,
    ticket: &GenerationTicket,
) -> Result<ImagePayload, SessionError>
where
    G: GenerationGateway + ?Sized,
{
    info!(epoch = ticket.epoch, age = %ticket.age, "session: generation dispatched");
    let outcome = gateway
        .request_character(&ticket.source, ticket.age)
        .await
        .map_err(SessionError::from);
    if let Err(err) = &outcome {
        if err.kind.is_operator_facing() {
            error!(
                epoch = ticket.epoch,
                "session: generation needs operator attention: {}", err.detail
            );
        } else {
            warn!(
                epoch = ticket.epoch,
                kind = ?err.kind,
                "session: generation failed: {}", err.detail
            );
        }
    }
    outcome
}

pub struct SessionController<G> {
    state: SessionState,
    policy: UploadPolicy,
    gateway: G,
}

impl<G: GenerationGateway> SessionController<G> {
    pub fn new(gateway: G, policy: UploadPolicy) -> Self {
        Self {
            state: SessionState::default(),
            policy,
            gateway,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn apply(&mut self, event: SessionEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    fn apply_upload(&mut self, outcome: Result<ImagePayload, SessionError>) {
        match outcome {
            Ok(image) => {
                info!(
                    mime_type = image.mime_type(),
                    bytes = image.len(),
                    "session: source image loaded"
                );
                self.apply(SessionEvent::SourceLoaded(image));
            }
            Err(err) => {
                warn!(kind = ?err.kind, "session: upload rejected: {}", err.detail);
                self.apply(SessionEvent::UploadRejected(err));
            }
        }
    }

    pub fn upload_file(&mut self, path: &Path) {
        let outcome = upload::read_upload(path, &self.policy);
        self.apply_upload(outcome);
    }

    pub fn upload_bytes(&mut self, file_name: &str, bytes: Vec<u8>) {
        let outcome = upload::decode_upload(file_name, bytes, &self.policy);
        self.apply_upload(outcome);
    }

    pub fn select_age_category(&mut self, age: AgeCategory) {
        self.apply(SessionEvent::AgeSelected(age));
    }

    /// Marks the session busy and hands out the request to run.
    ///
    /// Returns `None` without touching state when there is no source image or
    /// an attempt is already in flight.
    pub fn begin_generation(&mut self) -> Option<GenerationTicket> {
        let (next, ticket) = request_generation(std::mem::take(&mut self.state));
        self.state = next;
        ticket
    }

    pub fn complete_generation(&mut self, epoch: u64, outcome: Result<ImagePayload, SessionError>) {
        self.apply(SessionEvent::generation_finished(epoch, outcome));
    }

    pub async fn generate(&mut self) {
        let Some(ticket) = self.begin_generation() else {
            return;
        };
        let outcome = run_generation(&self.gateway, &ticket).await;
        self.complete_generation(ticket.epoch, outcome);
    }

    pub fn clear(&mut self) {
        self.apply(SessionEvent::Cleared);
    }

    pub fn dismiss_error(&mut self) {
        self.apply(SessionEvent::ErrorDismissed);
    }

    /// Saves the current result; `None` when there is nothing to save or saving failed.
    pub fn download_to(&mut self, path: &Path) -> Option<PathBuf> {
        let result = self.state.result()?;
        match download::save_download(result, path) {
            Ok(saved) => Some(saved),
            Err(err) => {
                warn!(kind = ?err.kind, "session: download failed: {}", err.detail);
                self.apply(SessionEvent::DownloadFailed(err));
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
