use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Deployment environment label; prefixes storage paths and gates
    /// error detail in responses.
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub subset: SubsetConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            fetch: FetchConfig::default(),
            subset: SubsetConfig::default(),
            storage: StorageConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

pub fn default_environment() -> String {
    "development".to_string()
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub api: ApiLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api: ApiLimits::default(),
        }
    }
}

/// API request limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiLimits {
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: ByteSize,
}

impl Default for ApiLimits {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

fn default_max_body_bytes() -> ByteSize {
    ByteSize(5 * 1024 * 1024) // 5 MB
}

/// Font download configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Total attempts per download: 1 initial + (max_attempts - 1) retries.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_max_font_bytes")]
    pub max_font_bytes: ByteSize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Spool directory for downloaded fonts; system temp dir when unset.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_font_bytes: default_max_font_bytes(),
            user_agent: default_user_agent(),
            temp_dir: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_font_bytes() -> ByteSize {
    ByteSize(30 * 1024 * 1024) // 30 MB
}

fn default_user_agent() -> String {
    "GlyphBox/0.1.0".to_string()
}

/// Subsetting tool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubsetConfig {
    /// External glyph-subsetting command.
    #[serde(default = "default_subset_command")]
    pub subset_command: String,
    /// External OTF-to-TTF conversion command.
    #[serde(default = "default_convert_command")]
    pub convert_command: String,
    #[serde(default = "default_subset_timeout_secs")]
    pub timeout_secs: u64,
    /// Spool directory for subsetting output; system temp dir when unset.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for SubsetConfig {
    fn default() -> Self {
        Self {
            subset_command: default_subset_command(),
            convert_command: default_convert_command(),
            timeout_secs: default_subset_timeout_secs(),
            temp_dir: None,
        }
    }
}

fn default_subset_command() -> String {
    "fontmin".to_string()
}

fn default_convert_command() -> String {
    "otf2ttf".to_string()
}

fn default_subset_timeout_secs() -> u64 {
    30
}

/// Storage provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    S3,
    #[default]
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    /// Base URL under which uploaded artifacts are publicly reachable.
    pub public_base_url: Option<String>,
    /// S3 access key (loaded from environment, not from config file)
    #[serde(skip)]
    pub access_key: Option<String>,
    /// S3 secret key (loaded from environment, not from config file)
    #[serde(skip)]
    pub secret_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::Memory,
            bucket: default_bucket(),
            endpoint: None,
            region: None,
            public_base_url: None,
            access_key: None,
            secret_key: None,
        }
    }
}

fn default_bucket() -> String {
    "glyphbox-fonts".to_string()
}

/// Whole-request pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    60
}
