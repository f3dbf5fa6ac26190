//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/photo`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhotoRequest {
    #[serde(default)]
    pub data: String,
}

/// Query string of `GET /api/photo/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoQuery {
    pub quality: Option<String>,
}

/// `{ "status": "ok" }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub service: String,
    pub service_version: String,
    pub status: String,
    pub mode: String,
}
