//! Content sniffing for submitted payloads.
//!
//! The format is decided from the leading bytes only; file names and
//! declared content types never take part.

use image::ImageFormat;

use crate::error::{PipelineError, PipelineResult};

/// MIME type reported for payloads that match no known signature.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// The two source formats the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    pub fn mime(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            SourceFormat::Jpeg => ImageFormat::Jpeg,
            SourceFormat::Png => ImageFormat::Png,
        }
    }
}

/// Sniff the MIME type of a decoded payload from its magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME)
}

/// Detect the source format, rejecting anything but JPEG and PNG.
pub fn detect(bytes: &[u8]) -> PipelineResult<SourceFormat> {
    match sniff_mime(bytes) {
        "image/jpeg" => Ok(SourceFormat::Jpeg),
        "image/png" => Ok(SourceFormat::Png),
        other => Err(PipelineError::UnsupportedFormat {
            mime: other.to_string(),
        }),
    }
}
