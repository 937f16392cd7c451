//! The per-request subsetting pipeline.
//!
//! Drives validate → resolve → fetch → subset → publish strictly in order,
//! races the whole job against a global deadline, and cleans up every
//! job-owned temporary path on every exit: success, failure or timeout.

mod job;

pub use job::FontJob;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;
use tracing::{info, warn};

use crate::charset::{CharsetRegistry, Repertoire};
use crate::config::PipelineConfig;
use crate::engine::{SubsetEngine, SubsetError};
use crate::fetcher::{FetchError, FontFetcher};
use crate::publisher::{PublishError, PublishedArtifact, ResultPublisher};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing \"url\" parameter or no text/charsets provided")]
    MissingInput,

    #[error("invalid font URL: {0}")]
    InvalidUrl(String),

    #[error("no usable characters to subset; provide text or a valid charset id")]
    EmptyRepertoire,

    #[error("font download failed")]
    Fetch(#[from] FetchError),

    #[error("font subsetting failed")]
    Subset(#[from] SubsetError),

    #[error("upload of the subsetted font failed")]
    Publish(#[from] PublishError),

    #[error("request processing timed out")]
    DeadlineExceeded,
}

impl PipelineError {
    /// Caller mistakes: rejected before any resource is allocated.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingInput
                | PipelineError::InvalidUrl(_)
                | PipelineError::EmptyRepertoire
        )
    }

    /// Deadline failures get a distinct status so clients can tell
    /// "try a smaller input" apart from a generic server error.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            PipelineError::DeadlineExceeded | PipelineError::Subset(SubsetError::Timeout)
        )
    }
}

/// Validated request input, after legacy alias resolution.
#[derive(Debug, Clone, Default)]
pub struct SubsetRequest {
    pub url: String,
    pub text: String,
    pub charsets: Vec<String>,
}

pub struct Pipeline {
    registry: Arc<CharsetRegistry>,
    fetcher: FontFetcher,
    engine: SubsetEngine,
    publisher: ResultPublisher,
    deadline: Duration,
}

impl Pipeline {
    pub fn new(
        registry: Arc<CharsetRegistry>,
        fetcher: FontFetcher,
        engine: SubsetEngine,
        publisher: ResultPublisher,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            registry,
            fetcher,
            engine,
            publisher,
            deadline: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Run one subsetting request to completion.
    ///
    /// Exactly one outcome is produced, and cleanup runs after the
    /// deadline race is settled. A stage cancelled by the deadline has
    /// already registered its temp paths with the job, so they are
    /// reclaimed here rather than by the cancelled stage itself.
    pub async fn process(&self, request: SubsetRequest) -> Result<PublishedArtifact, PipelineError> {
        let url_raw = request.url.trim();
        let has_sources = !request.text.is_empty() || !request.charsets.is_empty();
        if url_raw.is_empty() || !has_sources {
            return Err(PipelineError::MissingInput);
        }

        let url = Url::parse(url_raw).map_err(|e| PipelineError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PipelineError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }

        let repertoire = Repertoire::resolve(&self.registry, &request.text, &request.charsets)
            .map_err(|_| PipelineError::EmptyRepertoire)?;

        let job = FontJob::new(url, repertoire);
        info!(
            job_id = %job.id,
            url = %job.source_url,
            chars = job.repertoire.char_count(),
            "starting subsetting job"
        );

        let outcome = match tokio::time::timeout(self.deadline, self.execute(&job)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(job_id = %job.id, deadline = ?self.deadline, "job deadline elapsed");
                Err(PipelineError::DeadlineExceeded)
            }
        };

        job.cleanup().await;

        match &outcome {
            Ok(artifact) => info!(
                job_id = %job.id,
                path = %artifact.storage_path,
                size = artifact.size,
                "job completed"
            ),
            Err(error) => warn!(job_id = %job.id, error = %error, "job failed"),
        }

        outcome
    }

    async fn execute(&self, job: &FontJob) -> Result<PublishedArtifact, PipelineError> {
        let input_path = self.fetcher.fetch(&job.source_url, job).await?;

        let subset = self.engine.subset(&input_path, &job.repertoire, job).await?;

        let base_name = input_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("font");
        let artifact = self.publisher.publish(&subset, base_name).await?;

        Ok(artifact)
    }
}
