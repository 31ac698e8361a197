//! Image payloads and their `data:` URI transport encoding.

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("not a data uri: missing `data:` scheme")]
    MissingScheme,
    #[error("data uri has no `,` separating header and content")]
    MissingSeparator,
    #[error("data uri is not base64 encoded")]
    NotBase64,
    #[error("data uri has an empty mime type")]
    EmptyMimeType,
    #[error("invalid base64 content: {0}")]
    InvalidBase64(String),
}

/// Binary image content together with its MIME type.
///
/// Instances are replaced wholesale; there is no in-place mutation API.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Decodes raw base64 content, as carried by service responses.
    pub fn from_base64(mime_type: impl Into<String>, data: &str) -> Result<Self, PayloadError> {
        let mime_type = mime_type.into();
        if mime_type.trim().is_empty() {
            return Err(PayloadError::EmptyMimeType);
        }
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|err| PayloadError::InvalidBase64(err.to_string()))?;
        Ok(Self { mime_type, bytes })
    }

    pub fn from_data_uri(uri: &str) -> Result<Self, PayloadError> {
        let rest = uri
            .trim()
            .strip_prefix(DATA_SCHEME)
            .ok_or(PayloadError::MissingScheme)?;
        let (header, data) = rest.split_once(',').ok_or(PayloadError::MissingSeparator)?;
        let mime_type = header
            .strip_suffix(BASE64_MARKER)
            .ok_or(PayloadError::NotBase64)?;
        Self::from_base64(mime_type, data)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 of the content without the `data:` header.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "{DATA_SCHEME}{}{BASE64_MARKER},{}",
            self.mime_type,
            self.to_base64()
        )
    }
}

// Payloads can be several megabytes; keep debug output to the header.
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl fmt::Display for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_data_uri())
    }
}

impl FromStr for ImagePayload {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_data_uri(s)
    }
}

#[cfg(test)]
mod tests {
    use super::{ImagePayload, PayloadError};

    #[test]
    fn data_uri_round_trip_preserves_bytes_and_mime() {
        let bytes = vec![0u8, 1, 2, 254, 255, b'x', b'y'];
        let payload = ImagePayload::from_bytes("image/webp", bytes.clone());

        let uri = payload.to_data_uri();
        assert!(uri.starts_with("data:image/webp;base64,"));

        let decoded = ImagePayload::from_data_uri(&uri).expect("decode");
        assert_eq!(decoded.mime_type(), "image/webp");
        assert_eq!(decoded.bytes(), bytes.as_slice());
    }

    #[test]
    fn encodes_known_bytes() {
        let payload = ImagePayload::from_bytes("image/png", b"hello".to_vec());
        assert_eq!(payload.to_data_uri(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(payload.to_string(), payload.to_data_uri());
    }

    #[test]
    fn empty_content_is_allowed() {
        let decoded: ImagePayload = "data:image/gif;base64,".parse().expect("decode");
        assert!(decoded.is_empty());
        assert_eq!(decoded.mime_type(), "image/gif");
    }

    #[test]
    fn rejects_malformed_uris() {
        assert_eq!(
            ImagePayload::from_data_uri("image/png;base64,AAAA"),
            Err(PayloadError::MissingScheme)
        );
        assert_eq!(
            ImagePayload::from_data_uri("data:image/png;base64"),
            Err(PayloadError::MissingSeparator)
        );
        assert_eq!(
            ImagePayload::from_data_uri("data:image/png,AAAA"),
            Err(PayloadError::NotBase64)
        );
        assert_eq!(
            ImagePayload::from_data_uri("data:;base64,AAAA"),
            Err(PayloadError::EmptyMimeType)
        );
        assert!(matches!(
            ImagePayload::from_data_uri("data:image/png;base64,@@@"),
            Err(PayloadError::InvalidBase64(_))
        ));
    }

    #[test]
    fn debug_output_omits_content() {
        let payload = ImagePayload::from_bytes("image/png", vec![7; 4096]);
        let debug = format!("{payload:?}");
        assert!(debug.contains("len: 4096"));
        assert!(!debug.contains("7, 7"));
    }
}
