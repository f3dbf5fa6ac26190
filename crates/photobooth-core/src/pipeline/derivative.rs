//! Derivative generation: Lanczos resize followed by low-quality JPEG.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::config::DerivativeConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::Scale;

/// Produces scaled, JPEG re-encoded copies of a decoded image.
///
/// Every derivative is JPEG regardless of the source format, at the
/// configured quality factor.
pub struct DerivativeGenerator {
    config: DerivativeConfig,
}

impl DerivativeGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: DerivativeConfig) -> Self {
        Self { config }
    }

    /// Generate the derivative for one scale and return the JPEG bytes.
    pub fn generate(&self, image: &DynamicImage, scale: Scale) -> PipelineResult<Vec<u8>> {
        let (width, height) = image.dimensions();
        let (target_w, target_h) = scale.apply(width, height);

        // JPEG has no encoding for an empty raster; a source this small
        // still yields a one-pixel derivative instead of failing.
        let resized = image.resize_exact(target_w.max(1), target_h.max(1), FilterType::Lanczos3);
        let rgb = resized.to_rgb8();

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, self.config.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| PipelineError::Resize {
                scale,
                message: e.to_string(),
            })?;

        tracing::trace!(
            "  Derivative {}: {}x{} -> {}x{} ({} bytes)",
            scale,
            width,
            height,
            target_w,
            target_h,
            buffer.len()
        );
        Ok(buffer)
    }

    /// Generate the derivative for one scale as base64 text.
    pub fn generate_base64(&self, image: &DynamicImage, scale: Scale) -> PipelineResult<String> {
        self.generate(image, scale).map(|bytes| BASE64.encode(bytes))
    }
}
