//! Session state for one user: the reducer, upload intake, the generation
//! driver and download export.

pub mod controller;
pub mod download;
pub mod state;
pub mod upload;

pub use controller::{run_generation, SessionController};
pub use download::{default_file_name, encode_for_download, save_download};
pub use state::{reduce, request_generation, GenerationTicket, SessionEvent, SessionState};
pub use upload::{decode_upload, read_upload, UploadPolicy, DEFAULT_MAX_UPLOAD_BYTES};
