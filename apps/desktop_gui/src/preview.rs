//! Decoded preview textures for the source photo and the generated character.

use std::hash::{DefaultHasher, Hash, Hasher};

use eframe::egui;
use shared::ImagePayload;

const MAX_PREVIEW_EDGE: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    fn color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.rgba)
    }
}

pub fn decode_preview_image(bytes: &[u8], max_edge: u32) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic.thumbnail(max_edge, max_edge).to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

/// Identity of a payload's MIME type and full content.
fn fingerprint(image: &ImagePayload) -> u64 {
    let mut hasher = DefaultHasher::new();
    image.mime_type().hash(&mut hasher);
    image.bytes().hash(&mut hasher);
    hasher.finish()
}

/// One texture slot, re-uploaded only when the payload behind it changes.
#[derive(Default)]
pub struct PreviewSlot {
    fingerprint: Option<u64>,
    texture: Option<egui::TextureHandle>,
}

impl PreviewSlot {
    pub fn sync(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        image: Option<&ImagePayload>,
    ) -> Option<egui::TextureHandle> {
        let Some(image) = image else {
            self.fingerprint = None;
            self.texture = None;
            return None;
        };

        let current = fingerprint(image);
        if self.fingerprint != Some(current) {
            self.fingerprint = Some(current);
            self.texture = match decode_preview_image(image.bytes(), MAX_PREVIEW_EDGE) {
                Ok(preview) => Some(ctx.load_texture(
                    name,
                    preview.color_image(),
                    egui::TextureOptions::LINEAR,
                )),
                Err(err) => {
                    tracing::warn!(
                        slot = name,
                        mime_type = image.mime_type(),
                        "preview decode failed: {err}"
                    );
                    None
                }
            };
        }
        self.texture.clone()
    }
}
