//! Export of the generated character for saving.
//!
//! Results are always flattened onto white and re-encoded as JPEG at quality
//! 95, whatever format the service returned.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use image::{codecs::jpeg::JpegEncoder, DynamicImage, Rgb, RgbImage};
use shared::{ErrorKind, ImagePayload, SessionError};
use tracing::info;

pub const DOWNLOAD_JPEG_QUALITY: u8 = 95;
pub const DOWNLOAD_MIME_TYPE: &str = "image/jpeg";

pub fn default_file_name(now: DateTime<Utc>) -> String {
    format!("my-3d-character-{}.jpg", now.timestamp_millis())
}

fn encoding_failure(detail: impl Into<String>) -> SessionError {
    SessionError::new(ErrorKind::DownloadEncodingFailure, detail)
}

fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut canvas = RgbImage::from_pixel(rgba.width(), rgba.height(), Rgb([255, 255, 255]));
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u32::from(a);
        let blend = |channel: u8| -> u8 {
            ((u32::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        canvas.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    canvas
}

pub fn encode_for_download(image: &ImagePayload) -> Result<ImagePayload, SessionError> {
    let decoded = image::load_from_memory(image.bytes())
        .map_err(|err| encoding_failure(format!("failed to decode {}: {err}", image.mime_type())))?;
    let canvas = DynamicImage::ImageRgb8(flatten_onto_white(&decoded));

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, DOWNLOAD_JPEG_QUALITY);
    canvas
        .write_with_encoder(encoder)
        .map_err(|err| encoding_failure(format!("failed to encode jpeg: {err}")))?;

    Ok(ImagePayload::from_bytes(DOWNLOAD_MIME_TYPE, bytes))
}

pub fn save_download(image: &ImagePayload, path: &Path) -> Result<PathBuf, SessionError> {
    let encoded = encode_for_download(image)?;
    fs::write(path, encoded.bytes()).map_err(|err| {
        encoding_failure(format!("failed to write '{}': {err}", path.display()))
    })?;
    info!(
        path = %path.display(),
        bytes = encoded.len(),
        "download: saved character"
    );
    Ok(path.to_path_buf())
}
