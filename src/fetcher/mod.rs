//! Font download with bounded retries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use percent_encoding::percent_decode_str;
use reqwest::{Client, Url};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::humanize::ByteSize;
use crate::pipeline::FontJob;
use crate::publisher::sanitize_file_component;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported URL scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("download failed with HTTP status {0}")]
    Status(u16),

    #[error("download transport error: {0}")]
    Transport(String),

    #[error("download timed out")]
    Timeout,

    #[error("font exceeds the {limit} download limit")]
    TooLarge { limit: ByteSize },

    #[error("failed to write downloaded font")]
    Io(#[from] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Retry behavior as data: attempts, backoff, and what counts as retryable.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.retry_backoff_ms),
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs),
        }
    }

    /// HTTP status failures and transport problems are worth another try;
    /// local I/O errors and the size limit are not.
    pub fn is_retryable(&self, error: &FetchError) -> bool {
        matches!(
            error,
            FetchError::Status(_) | FetchError::Transport(_) | FetchError::Timeout
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

/// Downloads a remote font into a job-owned temporary directory.
pub struct FontFetcher {
    client: Client,
    policy: RetryPolicy,
    max_font_bytes: u64,
    temp_dir: PathBuf,
}

impl FontFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.attempt_timeout_secs))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            policy: RetryPolicy::from_config(config),
            max_font_bytes: config.max_font_bytes.as_u64(),
            temp_dir: config
                .temp_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
        })
    }

    /// Download `url` into a fresh temporary directory registered with the
    /// job. Partial files are removed before every retry and before a
    /// failure is surfaced.
    pub async fn fetch(&self, url: &Url, job: &FontJob) -> Result<PathBuf> {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(FetchError::UnsupportedScheme(other.to_string())),
        }

        let input_dir = tempfile::Builder::new()
            .prefix("glyphbox-download-")
            .tempdir_in(&self.temp_dir)?
            .into_path();
        job.register_dir(input_dir.clone());

        let file_name = file_name_from_url(url);
        let destination = input_dir.join(&file_name);
        job.register_file(destination.clone());

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.download_once(url, &destination).await {
                Ok(()) => {
                    if attempt > 1 {
                        debug!(url = %url, attempt, "download succeeded after retry");
                    }
                    return Ok(destination);
                }
                Err(error) => {
                    remove_partial(&destination).await;

                    if attempt >= self.policy.max_attempts || !self.policy.is_retryable(&error) {
                        warn!(url = %url, attempt, error = %error, "download failed, giving up");
                        return Err(error);
                    }

                    warn!(url = %url, attempt, error = %error, "download failed, retrying");
                    tokio::time::sleep(self.policy.backoff).await;
                }
            }
        }
    }

    async fn download_once(&self, url: &Url, destination: &Path) -> Result<()> {
        let mut response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "*/*")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let mut file = tokio::fs::File::create(destination).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest_error)? {
            written += chunk.len() as u64;
            if written > self.max_font_bytes {
                return Err(FetchError::TooLarge {
                    limit: ByteSize(self.max_font_bytes),
                });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(url = %url, size = written, path = %destination.display(), "download completed");
        Ok(())
    }
}

fn map_reqwest_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(error.to_string())
    }
}

async fn remove_partial(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %err, "failed to remove partial download");
        }
    }
}

/// Derive a safe local file name from the URL path: percent-decoded
/// basename, sanitized, with a `.ttf` fallback extension when the URL does
/// not carry a recognized font extension.
pub fn file_name_from_url(url: &Url) -> String {
    let decoded = percent_decode_str(url.path()).decode_utf8_lossy();
    let base = decoded
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("");

    let mut name = sanitize_file_component(base);
    if name.is_empty() || name.chars().all(|c| c == '.' || c == '_') {
        name = "font".to_string();
    }
    if !has_font_extension(&name) {
        name.push_str(".ttf");
    }
    name
}

fn has_font_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".ttf") || lower.ends_with(".otf")
}
