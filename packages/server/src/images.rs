use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, RgbImage};
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::filename::{sanitize, trailing_url_segment};

/// Largest edge allowed in a stored listing image, in pixels.
pub const MAX_DIMENSION: u32 = 1080;
/// Target upper bound on the encoded image size.
pub const MAX_ENCODED_BYTES: usize = 1_000_000;

const START_QUALITY: u8 = 90;
const QUALITY_STEP: u8 = 10;
const MIN_QUALITY: u8 = 10;

/// Content type of every normalized image.
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Normalize an uploaded image: decode, force 3-channel color, downscale so
/// the larger edge is at most [`MAX_DIMENSION`], and re-encode as JPEG,
/// walking the quality down in steps of 10 until the output fits
/// [`MAX_ENCODED_BYTES`] or the quality floor is reached (best effort).
pub fn normalize(raw: &[u8]) -> Result<Vec<u8>, AppError> {
    let decoded = image::load_from_memory(raw)
        .map_err(|e| AppError::Validation(format!("Unsupported image data: {e}")))?;
    let mut rgb: RgbImage = decoded.to_rgb8();

    let (width, height) = rgb.dimensions();
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        let ratio = (MAX_DIMENSION as f64 / width as f64).min(MAX_DIMENSION as f64 / height as f64);
        let new_width = ((width as f64 * ratio) as u32).max(1);
        let new_height = ((height as f64 * ratio) as u32).max(1);
        rgb = image::imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3);
    }

    let mut quality = START_QUALITY;
    loop {
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
        encoder
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| AppError::Internal(format!("JPEG encode failed: {e}")))?;

        if buf.len() <= MAX_ENCODED_BYTES || quality <= MIN_QUALITY {
            return Ok(buf);
        }
        quality -= QUALITY_STEP;
    }
}

/// Run [`normalize`] off the async runtime; resizing and re-encoding are
/// CPU-bound.
pub async fn normalize_blocking(raw: Vec<u8>) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || normalize(&raw))
        .await
        .map_err(|e| AppError::Internal(format!("Image task failed: {e}")))?
}

/// Storage path for a fresh upload: `images/<user>/<uuid>_<filename>`, with
/// both externally supplied segments sanitized.
pub fn unique_image_path(user_id: &str, original_filename: &str) -> String {
    format!(
        "images/{}/{}_{}",
        sanitize(user_id),
        Uuid::new_v4(),
        sanitize(original_filename)
    )
}

/// Storage path of an already-stored image addressed by filename.
pub fn image_path(user_id: &str, filename: &str) -> String {
    format!("images/{}/{}", sanitize(user_id), sanitize(filename))
}

/// Derive the storage path of a listing image from its public URL, scoped
/// under the owner's namespace.
pub fn image_path_from_url(user_id: &str, image_url: &str) -> Option<String> {
    trailing_url_segment(image_url).map(|filename| image_path(user_id, filename))
}
