//! Core data types for the Photobooth pipeline.
//!
//! A [`PhotoSubmission`] travels through the queue, a [`NewPhotoRecord`] is
//! what the pipeline hands to the store, and a [`PhotoRecord`] is what the
//! store hands back. All image fields are base64 text at rest.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A caller-provided photo awaiting processing.
///
/// Carries no identifier; the store assigns one when the record is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSubmission {
    /// Base64-encoded JPEG or PNG bytes
    pub data: String,
}

impl PhotoSubmission {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Raw queue body for this submission: the base64 text, no envelope.
    pub fn into_body(self) -> Vec<u8> {
        self.data.into_bytes()
    }
}

/// A fixed derivative scale, as a percentage of the original's linear
/// dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    ThreeQuarters,
    Half,
    Quarter,
}

impl Scale {
    /// Scales in the order the pipeline produces them.
    pub const ALL: [Scale; 3] = [Scale::ThreeQuarters, Scale::Half, Scale::Quarter];

    pub fn percent(self) -> u32 {
        match self {
            Scale::ThreeQuarters => 75,
            Scale::Half => 50,
            Scale::Quarter => 25,
        }
    }

    /// Target dimensions: `floor(dim * percent / 100)` on each axis.
    ///
    /// May return 0 for tiny sources. The derivative generator encodes
    /// such an axis as 1 px, since JPEG has no empty raster.
    pub fn apply(self, width: u32, height: u32) -> (u32, u32) {
        let p = u64::from(self.percent());
        let scale = |dim: u32| (u64::from(dim) * p / 100) as u32;
        (scale(width), scale(height))
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Which stored rendition a read selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Original,
    Derivative(Scale),
}

impl Quality {
    /// Parse a `quality` query value ("100", "75", "50", "25").
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "100" => Some(Quality::Original),
            "75" => Some(Quality::Derivative(Scale::ThreeQuarters)),
            "50" => Some(Quality::Derivative(Scale::Half)),
            "25" => Some(Quality::Derivative(Scale::Quarter)),
            _ => None,
        }
    }
}

/// The four image fields of a record, ready to be created.
///
/// Built only by the pipeline once every derivative succeeded, so a store
/// never sees a partially populated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhotoRecord {
    pub origin: String,
    pub variant_75: String,
    pub variant_50: String,
    pub variant_25: String,
    pub is_deleted: bool,
}

/// A persisted photo: the original plus three JPEG derivatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: Uuid,
    pub origin: String,
    pub variant_75: String,
    pub variant_50: String,
    pub variant_25: String,
    pub is_deleted: bool,
}

impl PhotoRecord {
    pub fn from_new(id: Uuid, record: NewPhotoRecord) -> Self {
        Self {
            id,
            origin: record.origin,
            variant_75: record.variant_75,
            variant_50: record.variant_50,
            variant_25: record.variant_25,
            is_deleted: record.is_deleted,
        }
    }

    /// The base64 rendition for a quality.
    pub fn rendition(&self, quality: Quality) -> &str {
        match quality {
            Quality::Original => &self.origin,
            Quality::Derivative(Scale::ThreeQuarters) => &self.variant_75,
            Quality::Derivative(Scale::Half) => &self.variant_50,
            Quality::Derivative(Scale::Quarter) => &self.variant_25,
        }
    }
}

/// A single rendition of a record, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    /// Base64-encoded image bytes
    pub data: String,
    pub is_deleted: bool,
}
