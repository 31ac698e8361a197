//! Photo intake: size ceiling and content sniffing.

use std::{fs, path::Path};

use shared::{ImagePayload, SessionError};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn with_max_megabytes(megabytes: u64) -> Self {
        Self {
            max_bytes: megabytes.saturating_mul(BYTES_PER_MEGABYTE),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut policy = Self::default();

        if let Some(v) = lookup("MAX_UPLOAD_MB") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                policy = Self::with_max_megabytes(parsed);
            }
        }
        if let Some(v) = lookup("APP__MAX_UPLOAD_MB") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                policy = Self::with_max_megabytes(parsed);
            }
        }

        policy
    }

    pub fn check_size(&self, size_bytes: u64) -> Result<(), SessionError> {
        if size_bytes > self.max_bytes {
            return Err(SessionError::too_large(size_bytes, self.max_bytes));
        }
        Ok(())
    }
}

/// Reads a picked file into a payload.
///
/// The size is taken from metadata first so oversized files are never read.
pub fn read_upload(path: &Path, policy: &UploadPolicy) -> Result<ImagePayload, SessionError> {
    let metadata = fs::metadata(path).map_err(|err| {
        SessionError::unreadable(format!("failed to read file '{}': {err}", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(SessionError::unreadable(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    policy.check_size(metadata.len())?;

    let bytes = fs::read(path).map_err(|err| {
        SessionError::unreadable(format!("failed to read file '{}': {err}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    decode_upload(file_name, bytes, policy)
}

pub fn decode_upload(
    file_name: &str,
    bytes: Vec<u8>,
    policy: &UploadPolicy,
) -> Result<ImagePayload, SessionError> {
    policy.check_size(bytes.len() as u64)?;
    if bytes.is_empty() {
        return Err(SessionError::unreadable(format!("'{file_name}' is empty")));
    }
    let mime_type = detect_image_mime(file_name, &bytes).ok_or_else(|| {
        SessionError::unreadable(format!("'{file_name}' does not look like an image"))
    })?;
    Ok(ImagePayload::from_bytes(mime_type, bytes))
}

/// Magic bytes first, then the file extension.
fn detect_image_mime(file_name: &str, bytes: &[u8]) -> Option<String> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type().to_string());
    }
    mime_guess::from_path(file_name)
        .first_raw()
        .filter(|mime| mime.starts_with("image/"))
        .map(str::to_string)
}
