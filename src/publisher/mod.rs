//! Publishes subsetted fonts to durable storage under a collision-resistant
//! name and returns the public locator.

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::engine::SubsetResult;
use crate::storage::{StorageClient, StorageError};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("storage upload failed")]
    Upload(#[from] StorageError),
}

/// The published artifact: where the subsetted font ended up.
#[derive(Debug, Clone)]
pub struct PublishedArtifact {
    pub file_name: String,
    pub size: usize,
    pub download_url: String,
    pub storage_path: String,
}

pub struct ResultPublisher {
    storage: StorageClient,
    environment: String,
}

impl ResultPublisher {
    pub fn new(storage: StorageClient, environment: String) -> Self {
        Self {
            storage,
            environment,
        }
    }

    /// Upload the subsetted font under `{environment}/compressed/` with a
    /// timestamp+token suffix so concurrent jobs for the same font never
    /// collide. Upload failure is terminal; there is no retry here.
    pub async fn publish(
        &self,
        result: &SubsetResult,
        original_base_name: &str,
    ) -> Result<PublishedArtifact, PublishError> {
        let file_name = safe_output_name(original_base_name, &result.extension);
        let storage_path = format!("{}/compressed/{}", self.environment, file_name);
        let content_type = content_type_for(&result.extension);

        self.storage
            .put(&storage_path, result.bytes.clone(), content_type)
            .await?;

        let download_url = self.storage.public_url(&storage_path);
        info!(path = %storage_path, size = result.bytes.len(), "published subsetted font");

        Ok(PublishedArtifact {
            file_name,
            size: result.bytes.len(),
            download_url,
            storage_path,
        })
    }
}

/// Keep letters, digits, `_`, `.` and `-`; everything else becomes `_`.
pub fn sanitize_file_component(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn safe_output_name(base_name: &str, extension: &str) -> String {
    let sanitized = sanitize_file_component(base_name);
    let base = if sanitized.is_empty() {
        "font"
    } else {
        sanitized.as_str()
    };

    let timestamp = Utc::now().timestamp_millis();
    let token: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();

    format!("compressed-{base}_{timestamp}_{token}.{extension}")
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        _ => "application/octet-stream",
    }
}
