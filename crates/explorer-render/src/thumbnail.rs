//! Snapshot thumbnails encoded from rendered frames.

use image::{DynamicImage, ImageBuffer, Rgba};
use serde::{Deserialize, Serialize};

use crate::frame::RgbaFrame;

/// A PNG-encoded preview image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// PNG bytes; empty for a placeholder.
    pub png: Vec<u8>,
}

impl Thumbnail {
    /// An empty placeholder, used when the viewer could not render.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Returns whether this is a placeholder without image data.
    pub fn is_placeholder(&self) -> bool {
        self.png.is_empty()
    }

    /// Decodes the PNG back into RGBA pixels.
    pub fn decode(&self) -> Result<RgbaFrame, ThumbnailError> {
        if self.is_placeholder() {
            return Err(ThumbnailError::InvalidImageData);
        }
        let img = image::load_from_memory_with_format(&self.png, image::ImageFormat::Png)?;
        let rgba = img.to_rgba8();
        Ok(RgbaFrame::new(
            rgba.width(),
            rgba.height(),
            crate::frame::PixelFormat::Rgba8,
            rgba.into_raw(),
        ))
    }
}

/// Encodes a frame as a PNG thumbnail.
///
/// Frames larger than `max_edge` on either side are downscaled, keeping
/// aspect ratio. A `max_edge` of 0 keeps the full size.
pub fn encode_thumbnail(frame: RgbaFrame, max_edge: u32) -> Result<Thumbnail, ThumbnailError> {
    if !frame.is_well_formed() {
        return Err(ThumbnailError::InvalidImageData);
    }
    let (width, height) = (frame.width, frame.height);
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, frame.into_rgba())
            .ok_or(ThumbnailError::InvalidImageData)?;

    let mut img = DynamicImage::ImageRgba8(img);
    if max_edge > 0 && (width > max_edge || height > max_edge) {
        img = img.thumbnail(max_edge, max_edge);
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    log::debug!(
        "encoded {}x{} thumbnail from {width}x{height} frame",
        img.width(),
        img.height()
    );

    Ok(Thumbnail {
        width: img.width(),
        height: img.height(),
        png: buffer.into_inner(),
    })
}

/// Error type for thumbnail operations.
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid image data")]
    InvalidImageData,
}
