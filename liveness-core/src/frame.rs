//! Frame ingestion — turns the wire format (`data:image/jpeg;base64,...`
//! or bare base64) into a decoded, downscaled pixel buffer.
//!
//! Kept as a standalone module so malformed-input tests don't need a real
//! landmark extractor wired up: decode failures are representable on
//! their own, independent of the rest of the pipeline.

use crate::error::InputError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::imageops::FilterType;
use image::RgbImage;

/// Frames are downscaled to this working width to bound per-frame
/// inference cost; aspect ratio is preserved.
pub const WORKING_WIDTH: u32 = 320;

#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub rgb: RgbImage,
}

impl DecodedFrame {
    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }
}

/// Decode one wire-format frame into a downscaled RGB buffer.
///
/// Accepts either a full data URL (`data:image/<fmt>;base64,<payload>`) or
/// a bare base64 payload, matching what browser `canvas.toDataURL()` and a
/// pre-stripped client both might send.
pub fn decode(raw: &str) -> Result<DecodedFrame, InputError> {
    let payload = strip_data_url_prefix(raw);
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| InputError::Malformed(format!("invalid base64: {e}")))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| InputError::Malformed(format!("undecodable image: {e}")))?;

    let resized = if image.width() > WORKING_WIDTH {
        let ratio = WORKING_WIDTH as f32 / image.width() as f32;
        let target_height = (image.height() as f32 * ratio).round().max(1.0) as u32;
        image.resize_exact(WORKING_WIDTH, target_height, FilterType::Triangle)
    } else {
        image
    };

    Ok(DecodedFrame {
        rgb: resized.to_rgb8(),
    })
}

fn strip_data_url_prefix(raw: &str) -> &str {
    match raw.find(',') {
        Some(idx) if raw.starts_with("data:") => &raw[idx + 1..],
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn jpeg_base64(width: u32, height: u32) -> String {
        let img = RgbImage::from_pixel(width, height, image::Rgb([128, 64, 200]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        BASE64.encode(bytes)
    }

    #[test]
    fn decodes_bare_base64_payload() {
        let payload = jpeg_base64(64, 48);
        let frame = decode(&payload).unwrap();
        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 48);
    }

    #[test]
    fn decodes_data_url_payload() {
        let payload = format!("data:image/jpeg;base64,{}", jpeg_base64(64, 48));
        let frame = decode(&payload).unwrap();
        assert_eq!(frame.width(), 64);
    }

    #[test]
    fn downscales_wide_frames_preserving_aspect_ratio() {
        let payload = jpeg_base64(640, 480);
        let frame = decode(&payload).unwrap();
        assert_eq!(frame.width(), WORKING_WIDTH);
        assert_eq!(frame.height(), 240);
    }

    #[test]
    fn rejects_garbage_base64() {
        let err = decode("not valid base64!!").unwrap_err();
        assert!(matches!(err, InputError::Malformed(_)));
    }

    #[test]
    fn rejects_valid_base64_of_non_image_bytes() {
        let payload = BASE64.encode(b"hello world, not a jpeg");
        let err = decode(&payload).unwrap_err();
        assert!(matches!(err, InputError::Malformed(_)));
    }
}
