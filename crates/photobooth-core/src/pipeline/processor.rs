//! Per-submission pipeline: decode, detect, then resize at every scale.
//!
//! Nothing here touches the store. The output is a fully populated
//! [`NewPhotoRecord`] or the first error, so a failure at any stage leaves
//! no trace behind.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::GenericImageView;
use std::fmt;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{NewPhotoRecord, Scale};

use super::derivative::DerivativeGenerator;
use super::detect;

/// Stages a submission moves through, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decoding,
    FormatDetecting,
    Resizing(Scale),
    Persisting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Decoding => f.write_str("decoding"),
            Stage::FormatDetecting => f.write_str("format detection"),
            Stage::Resizing(scale) => write!(f, "resizing ({scale})"),
            Stage::Persisting => f.write_str("persisting"),
        }
    }
}

impl PipelineError {
    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Decode { .. } => Stage::Decoding,
            PipelineError::UnsupportedFormat { .. } => Stage::FormatDetecting,
            // The image is decoded once, ahead of the first resize.
            PipelineError::Corrupt { .. } => Stage::Resizing(Scale::ThreeQuarters),
            PipelineError::Resize { scale, .. } => Stage::Resizing(*scale),
        }
    }
}

/// Turns a raw queue body into a record ready to persist.
pub struct PhotoProcessor {
    generator: DerivativeGenerator,
}

impl PhotoProcessor {
    /// Create a new processor with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            generator: DerivativeGenerator::new(config.derivative.clone()),
        }
    }

    /// Process one queue body (base64 text) into a new record.
    ///
    /// CPU-bound; callers on the async runtime should run it on a
    /// blocking thread.
    pub fn process(&self, body: &[u8]) -> PipelineResult<NewPhotoRecord> {
        let start = std::time::Instant::now();

        // Decode
        let payload = body.trim_ascii();
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| PipelineError::Decode {
                message: e.to_string(),
            })?;
        tracing::trace!("  Decode: {} bytes", bytes.len());

        // Detect
        let format = detect::detect(&bytes)?;
        tracing::trace!("  Format: {}", format.mime());

        let image = image::load_from_memory_with_format(&bytes, format.image_format()).map_err(
            |e| PipelineError::Corrupt {
                mime: format.mime().to_string(),
                message: e.to_string(),
            },
        )?;

        // Resize, strictly in order; the first failure abandons the rest
        let variant_75 = self.generator.generate_base64(&image, Scale::ThreeQuarters)?;
        let variant_50 = self.generator.generate_base64(&image, Scale::Half)?;
        let variant_25 = self.generator.generate_base64(&image, Scale::Quarter)?;

        // Valid base64 is ASCII, so this cannot lose data.
        let origin = String::from_utf8_lossy(payload).into_owned();

        let (width, height) = image.dimensions();
        tracing::debug!(
            "Processed {} submission ({}x{}) in {:?}",
            format.mime(),
            width,
            height,
            start.elapsed()
        );

        Ok(NewPhotoRecord {
            origin,
            variant_75,
            variant_50,
            variant_25,
            is_deleted: false,
        })
    }
}
