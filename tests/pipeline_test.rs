//! End-to-end pipeline tests: a local HTTP server stands in for the remote
//! font host, and a stub tool stands in for the external subsetter, so
//! every stage transition, retry and cleanup path runs for real.

mod support;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use glyphbox::charset::CharsetRegistry;
use glyphbox::config::{FetchConfig, PipelineConfig, SubsetConfig};
use glyphbox::engine::{SubsetEngine, SubsetError, SubsetTool};
use glyphbox::fetcher::FontFetcher;
use glyphbox::pipeline::{Pipeline, PipelineError, SubsetRequest};
use glyphbox::publisher::ResultPublisher;
use glyphbox::storage::StorageClient;

use support::{FAKE_FONT, StubTool, spawn_font_server, spool_is_empty};

struct PipelineOptions {
    subset_timeout_secs: u64,
    request_timeout_secs: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            subset_timeout_secs: 30,
            request_timeout_secs: 60,
        }
    }
}

fn build_pipeline(
    spool: &Path,
    tool: StubTool,
    options: PipelineOptions,
) -> (Pipeline, StorageClient) {
    let registry = Arc::new(CharsetRegistry::new());

    let fetch_config = FetchConfig {
        retry_backoff_ms: 10,
        attempt_timeout_secs: 5,
        temp_dir: Some(spool.to_path_buf()),
        ..FetchConfig::default()
    };
    let fetcher = FontFetcher::new(&fetch_config).unwrap();

    let subset_config = SubsetConfig {
        timeout_secs: options.subset_timeout_secs,
        temp_dir: Some(spool.to_path_buf()),
        ..SubsetConfig::default()
    };
    let tool: Arc<dyn SubsetTool> = Arc::new(tool);
    let engine = SubsetEngine::new(tool, &subset_config);

    let storage = StorageClient::in_memory();
    let publisher = ResultPublisher::new(storage.clone(), "testing".to_string());

    let pipeline = Pipeline::new(
        registry,
        fetcher,
        engine,
        publisher,
        &PipelineConfig {
            request_timeout_secs: options.request_timeout_secs,
        },
    );
    (pipeline, storage)
}

fn request(url: String, text: &str, charsets: &[&str]) -> SubsetRequest {
    SubsetRequest {
        url,
        text: text.to_string(),
        charsets: charsets.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn successful_job_publishes_and_cleans_up() {
    let (addr, _hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let (pipeline, storage) =
        build_pipeline(spool.path(), StubTool::default(), PipelineOptions::default());

    let artifact = pipeline
        .process(request(format!("http://{addr}/fonts/demo.ttf"), "ABC", &[]))
        .await
        .unwrap();

    assert!(artifact.file_name.starts_with("compressed-demo_"));
    assert!(artifact.file_name.ends_with(".ttf"));
    assert!(artifact.storage_path.starts_with("testing/compressed/"));
    // the stub subsets down to the repertoire bytes
    assert_eq!(artifact.size, 3);
    assert!(artifact.size < FAKE_FONT.len());
    assert!(storage.exists(&artifact.storage_path).await.unwrap());

    assert!(spool_is_empty(spool.path()));
}

#[tokio::test]
async fn missing_404_font_consumes_all_attempts() {
    let (addr, hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let (pipeline, _storage) =
        build_pipeline(spool.path(), StubTool::default(), PipelineOptions::default());

    let error = pipeline
        .process(request(format!("http://{addr}/fonts/missing.ttf"), "A", &[]))
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::Fetch(_)));
    assert!(!error.is_client_error());
    // 1 initial attempt + 2 retries
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert!(spool_is_empty(spool.path()));
}

#[tokio::test]
async fn empty_sources_rejected_before_any_network_io() {
    let (addr, hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let (pipeline, _storage) =
        build_pipeline(spool.path(), StubTool::default(), PipelineOptions::default());

    let error = pipeline
        .process(request(format!("http://{addr}/fonts/demo.ttf"), "", &[]))
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::MissingInput));
    assert!(error.is_client_error());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(spool_is_empty(spool.path()));
}

#[tokio::test]
async fn malformed_and_non_http_urls_are_rejected() {
    let spool = tempfile::tempdir().unwrap();
    let (pipeline, _storage) =
        build_pipeline(spool.path(), StubTool::default(), PipelineOptions::default());

    let malformed = pipeline
        .process(request("not a url".to_string(), "A", &[]))
        .await
        .unwrap_err();
    assert!(matches!(malformed, PipelineError::InvalidUrl(_)));

    let ftp = pipeline
        .process(request("ftp://example.com/font.ttf".to_string(), "A", &[]))
        .await
        .unwrap_err();
    assert!(matches!(ftp, PipelineError::InvalidUrl(_)));
}

#[tokio::test]
async fn sole_unknown_preset_is_a_client_error() {
    let (addr, hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let (pipeline, _storage) =
        build_pipeline(spool.path(), StubTool::default(), PipelineOptions::default());

    let error = pipeline
        .process(request(
            format!("http://{addr}/fonts/demo.ttf"),
            "",
            &["klingon"],
        ))
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::EmptyRepertoire));
    assert!(error.is_client_error());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_preset_alongside_valid_sources_is_ignored() {
    let (addr, _hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let (pipeline, _storage) =
        build_pipeline(spool.path(), StubTool::default(), PipelineOptions::default());

    let artifact = pipeline
        .process(request(
            format!("http://{addr}/fonts/demo.ttf"),
            "",
            &["klingon", "digits"],
        ))
        .await
        .unwrap();

    // the stub echoes the repertoire, so the size is the digits charset
    assert_eq!(artifact.size, 10);
}

#[tokio::test]
async fn subsetting_timeout_is_distinct_and_cleans_up() {
    let (addr, _hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let tool = StubTool {
        delay_ms: 3_000,
        ..StubTool::default()
    };
    let (pipeline, _storage) = build_pipeline(
        spool.path(),
        tool,
        PipelineOptions {
            subset_timeout_secs: 1,
            ..PipelineOptions::default()
        },
    );

    let error = pipeline
        .process(request(format!("http://{addr}/fonts/demo.ttf"), "A", &[]))
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::Subset(SubsetError::Timeout)));
    assert!(error.is_timeout());
    assert!(spool_is_empty(spool.path()));
}

#[tokio::test]
async fn global_deadline_cancels_in_flight_stage_and_cleans_up() {
    let (addr, _hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let tool = StubTool {
        delay_ms: 10_000,
        ..StubTool::default()
    };
    let (pipeline, _storage) = build_pipeline(
        spool.path(),
        tool,
        PipelineOptions {
            subset_timeout_secs: 30,
            request_timeout_secs: 1,
        },
    );

    let error = pipeline
        .process(request(format!("http://{addr}/fonts/demo.ttf"), "A", &[]))
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::DeadlineExceeded));
    assert!(error.is_timeout());
    // the cancelled stage registered its temp paths before it was dropped
    assert!(spool_is_empty(spool.path()));
}

#[tokio::test]
async fn otf_input_is_normalized_before_subsetting() {
    let (addr, _hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let tool = StubTool {
        truetype_only: true,
        ..StubTool::default()
    };
    let converted = tool.converted.clone();
    let (pipeline, _storage) =
        build_pipeline(spool.path(), tool, PipelineOptions::default());

    let artifact = pipeline
        .process(request(
            format!("http://{addr}/fonts/demo.otf"),
            "",
            &["latin_basic"],
        ))
        .await
        .unwrap();

    assert!(converted.load(Ordering::SeqCst));
    assert!(artifact.file_name.ends_with(".ttf"));
    assert!(spool_is_empty(spool.path()));
}

#[tokio::test]
async fn repeated_requests_yield_distinct_names_and_identical_bytes() {
    let (addr, _hits) = spawn_font_server().await;
    let spool = tempfile::tempdir().unwrap();
    let (pipeline, storage) =
        build_pipeline(spool.path(), StubTool::default(), PipelineOptions::default());

    let make = || request(format!("http://{addr}/fonts/demo.ttf"), "ABC", &[]);
    let first = pipeline.process(make()).await.unwrap();
    let second = pipeline.process(make()).await.unwrap();

    assert_ne!(first.storage_path, second.storage_path);
    assert_ne!(first.file_name, second.file_name);

    let first_bytes = storage.get(&first.storage_path).await.unwrap();
    let second_bytes = storage.get(&second.storage_path).await.unwrap();
    assert_eq!(first_bytes, second_bytes);
}
