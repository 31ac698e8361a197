//! Immutable session state and the reducer that advances it.

use shared::{AgeCategory, ImagePayload, SessionError};
use tracing::{debug, warn};

/// Everything the front-end renders, owned by a single session.
///
/// Only [`reduce`] produces new states. While `busy` is set there is neither a
/// result nor an error; the result shown before the attempt is parked and
/// restored if the attempt fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    source: Option<ImagePayload>,
    result: Option<ImagePayload>,
    age: AgeCategory,
    busy: bool,
    error: Option<SessionError>,
    epoch: u64,
    parked_result: Option<ImagePayload>,
}

impl SessionState {
    pub fn source(&self) -> Option<&ImagePayload> {
        self.source.as_ref()
    }

    pub fn result(&self) -> Option<&ImagePayload> {
        self.result.as_ref()
    }

    pub fn age(&self) -> AgeCategory {
        self.age
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Tag of the most recent generation attempt.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn can_generate(&self) -> bool {
        self.source.is_some() && !self.busy
    }
}

/// A dispatched generation attempt; its epoch tags the eventual outcome.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub epoch: u64,
    pub source: ImagePayload,
    pub age: AgeCategory,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    SourceLoaded(ImagePayload),
    UploadRejected(SessionError),
    AgeSelected(AgeCategory),
    GenerationRequested,
    GenerationSucceeded { epoch: u64, image: ImagePayload },
    GenerationFailed { epoch: u64, error: SessionError },
    Cleared,
    ErrorDismissed,
    DownloadFailed(SessionError),
}

impl SessionEvent {
    pub fn generation_finished(epoch: u64, outcome: Result<ImagePayload, SessionError>) -> Self {
        match outcome {
            Ok(image) => SessionEvent::GenerationSucceeded { epoch, image },
            Err(error) => SessionEvent::GenerationFailed { epoch, error },
        }
    }
}

/// Applies [`SessionEvent::GenerationRequested`] and returns the request to
/// dispatch. When no source is loaded or an attempt is already in flight the
/// state comes back unchanged and there is nothing to dispatch.
pub fn request_generation(state: SessionState) -> (SessionState, Option<GenerationTicket>) {
    if !state.can_generate() {
        return (state, None);
    }
    let next = reduce(state, SessionEvent::GenerationRequested);
    let ticket = next.source.clone().map(|source| GenerationTicket {
        epoch: next.epoch,
        source,
        age: next.age,
    });
    (next, ticket)
}

pub fn reduce(state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        // A new photo supersedes any attempt still in flight.
        SessionEvent::SourceLoaded(image) => SessionState {
            source: Some(image),
            result: None,
            error: None,
            busy: false,
            parked_result: None,
            epoch: if state.busy { state.epoch + 1 } else { state.epoch },
            ..state
        },
        // A rejected photo also supersedes the in-flight attempt; the
        // previously displayed result comes back.
        SessionEvent::UploadRejected(error) => {
            if !state.busy {
                return SessionState {
                    error: Some(error),
                    ..state
                };
            }
            SessionState {
                result: state.parked_result,
                parked_result: None,
                busy: false,
                error: Some(error),
                epoch: state.epoch + 1,
                ..state
            }
        }
        SessionEvent::DownloadFailed(error) => {
            if state.busy {
                warn!(kind = ?error.kind, "session: dropping download error while generation is in flight");
                return state;
            }
            SessionState {
                error: Some(error),
                ..state
            }
        }
        SessionEvent::AgeSelected(age) => SessionState { age, ..state },
        SessionEvent::GenerationRequested => {
            if state.busy || state.source.is_none() {
                return state;
            }
            SessionState {
                busy: true,
                error: None,
                parked_result: state.result,
                result: None,
                epoch: state.epoch + 1,
                ..state
            }
        }
        SessionEvent::GenerationSucceeded { epoch, image } => {
            if !state.busy || epoch != state.epoch {
                debug!(epoch, current = state.epoch, "session: ignoring stale generation result");
                return state;
            }
            SessionState {
                result: Some(image),
                busy: false,
                parked_result: None,
                ..state
            }
        }
        SessionEvent::GenerationFailed { epoch, error } => {
            if !state.busy || epoch != state.epoch {
                debug!(epoch, current = state.epoch, "session: ignoring stale generation failure");
                return state;
            }
            SessionState {
                result: state.parked_result,
                parked_result: None,
                busy: false,
                error: Some(error),
                ..state
            }
        }
        SessionEvent::Cleared => SessionState {
            result: None,
            parked_result: None,
            error: None,
            busy: false,
            epoch: state.epoch + 1,
            ..state
        },
        SessionEvent::ErrorDismissed => SessionState {
            error: None,
            ..state
        },
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
