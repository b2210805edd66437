use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::error::CropError;

/// Encoding used for the cropped faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Map a MIME type such as `image/jpeg` to an encoder.
    pub fn from_mime(mime_type: &str) -> Result<Self, CropError> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            other => Err(CropError::InvalidArgument(format!(
                "Unsupported output type '{}', expected image/jpeg or image/png.",
                other
            ))),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Reject qualities outside `0.0..=1.0` (NaN included).
pub fn validate_quality(quality: f32) -> Result<(), CropError> {
    if (0.0..=1.0).contains(&quality) {
        Ok(())
    } else {
        Err(CropError::InvalidArgument(format!(
            "Quality must be between 0.0 and 1.0, got {}.",
            quality
        )))
    }
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode `image` as `format`. `quality` only affects JPEG.
pub fn encode_image(
    image: &DynamicImage,
    format: OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, CropError> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality))
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(CropError::Encode)?;
        }
        OutputFormat::Png => {
            let rgba = image.to_rgba8();
            PngEncoder::new(&mut buffer)
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(CropError::Encode)?;
        }
    }

    Ok(buffer)
}
