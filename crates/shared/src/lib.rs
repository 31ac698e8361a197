//! Domain types shared by the gateway, the session controller and the desktop app.

pub mod domain;
pub mod error;
pub mod payload;

pub use domain::AgeCategory;
pub use error::{ErrorKind, SessionError};
pub use payload::{ImagePayload, PayloadError};
