//! Shared fixtures: a local font host and a stub subsetting tool.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    extract::Path as UrlPath,
    http::StatusCode,
    routing::get,
};
use bytes::Bytes;
use tokio::net::TcpListener;

use glyphbox::engine::{SubsetTool, ToolError};

/// Stands in for a real font; only its size matters to the tests.
pub const FAKE_FONT: &[u8] = &[0u8; 2048];

/// Serve `FAKE_FONT` under `/fonts/*`; names starting with `missing`
/// return 404. Every request bumps the hit counter.
pub async fn spawn_font_server() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_handle = hits.clone();

    let handler = move |UrlPath(name): UrlPath<String>| {
        let hits = hits_handle.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            if name.starts_with("missing") {
                (StatusCode::NOT_FOUND, Bytes::new())
            } else {
                (StatusCode::OK, Bytes::from_static(FAKE_FONT))
            }
        }
    };

    let app = Router::new().route("/fonts/{name}", get(handler));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, hits)
}

/// Deterministic in-process subsetter: writes the repertoire bytes as the
/// "subsetted font", optionally after a delay.
pub struct StubTool {
    pub truetype_only: bool,
    pub delay_ms: u64,
    pub converted: Arc<AtomicBool>,
}

impl Default for StubTool {
    fn default() -> Self {
        Self {
            truetype_only: false,
            delay_ms: 0,
            converted: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl SubsetTool for StubTool {
    fn requires_truetype(&self) -> bool {
        self.truetype_only
    }

    async fn convert_to_ttf(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.converted.store(true, Ordering::SeqCst);
        tokio::fs::copy(input, output)
            .await
            .map_err(|e| ToolError::Other(e.to_string()))?;
        Ok(())
    }

    async fn subset(
        &self,
        input: &Path,
        repertoire: &str,
        dest_dir: &Path,
    ) -> Result<(), ToolError> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }

        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("subset");
        let output: PathBuf = dest_dir.join(format!("{stem}.ttf"));
        tokio::fs::write(&output, repertoire.as_bytes())
            .await
            .map_err(|e| ToolError::Other(e.to_string()))?;
        Ok(())
    }
}

/// True when the spool directory holds no leftover job directories.
pub fn spool_is_empty(spool: &Path) -> bool {
    std::fs::read_dir(spool).unwrap().next().is_none()
}
