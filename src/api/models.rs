//! Wire models for the GlyphBox HTTP API.
//!
//! Field names are camelCase on the wire for compatibility with the
//! existing frontend. `POST /compress` accepts the legacy `blobUrl` /
//! `fontUrl` aliases for the font source; the first non-empty of
//! `url` / `blobUrl` / `fontUrl` wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::charset::AvailableCharsets;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub blob_url: Option<String>,
    #[serde(default)]
    pub font_url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub charsets: Option<Vec<String>>,
}

impl CompressRequest {
    /// First non-empty of `url` / `blobUrl` / `fontUrl`.
    pub fn source_url(&self) -> Option<&str> {
        [&self.url, &self.blob_url, &self.font_url]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|candidate| !candidate.trim().is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    pub success: bool,
    pub font_name: String,
    pub file_size: usize,
    pub download_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct CharsetListResponse {
    pub success: bool,
    pub charsets: AvailableCharsets,
}

#[derive(Debug, Serialize)]
pub struct CharsetContentResponse {
    pub success: bool,
    pub name: String,
    pub characters: String,
    pub length: usize,
}

#[derive(Debug, Deserialize)]
pub struct CharsetQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicketRequest {
    pub file_name: String,
}

/// Short-lived ticket for a client-side original-font upload. The storage
/// service enforcing it is external; this endpoint only issues the
/// constraints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicketResponse {
    pub success: bool,
    pub token: String,
    pub upload_path: String,
    pub allowed_content_types: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub version: String,
}
