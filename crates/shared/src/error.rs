use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classes a session can surface to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputTooLarge,
    InputUnreadable,
    CredentialError,
    EmptyResponse,
    NoImageInResponse,
    TransportFailure,
    DownloadEncodingFailure,
}

impl ErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::InputTooLarge => "That photo is too large. Please pick a smaller file.",
            ErrorKind::InputUnreadable => "We couldn't read that photo. Want to try another one?",
            ErrorKind::CredentialError => {
                "The API key seems to be misconfigured. Please check the settings."
            }
            ErrorKind::EmptyResponse
            | ErrorKind::NoImageInResponse
            | ErrorKind::TransportFailure => {
                "Something went wrong while creating your character. Please try again."
            }
            ErrorKind::DownloadEncodingFailure => {
                "Saving failed. Try saving the preview image manually instead."
            }
        }
    }

    /// Configuration problems the operator has to fix, not the end user.
    pub fn is_operator_facing(self) -> bool {
        matches!(self, ErrorKind::CredentialError)
    }
}

/// A failed step of the session, terminal for the current attempt only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {detail}")]
pub struct SessionError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl SessionError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::new(
            ErrorKind::InputTooLarge,
            format!("file too large: {size_bytes} bytes exceeds the {max_bytes} byte limit"),
        )
    }

    pub fn unreadable(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InputUnreadable, detail)
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}
