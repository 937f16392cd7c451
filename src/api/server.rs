use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    services::{charsets, compress, create_upload_ticket, health},
    state::AppState,
};
use crate::charset::CharsetRegistry;
use crate::config::Config;
use crate::engine::{CommandSubsetTool, SubsetEngine, SubsetTool};
use crate::fetcher::FontFetcher;
use crate::pipeline::Pipeline;
use crate::publisher::ResultPublisher;
use crate::storage::StorageClient;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(address: SocketAddr) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let charsets = Arc::new(CharsetRegistry::new());

    let storage = StorageClient::from_config(&config.storage)
        .map_err(|e| format!("Failed to initialize storage: {e}"))?;
    let publisher = ResultPublisher::new(storage, config.environment.clone());

    let fetcher = FontFetcher::new(&config.fetch)
        .map_err(|e| format!("Failed to initialize HTTP client: {e}"))?;

    // The subsetting capability handle is built exactly once here and
    // threaded through the state; nothing lazily initializes it later.
    let tool: Arc<dyn SubsetTool> = Arc::new(CommandSubsetTool::new(&config.subset));
    let engine = SubsetEngine::new(tool, &config.subset);

    let pipeline = Pipeline::new(
        charsets.clone(),
        fetcher,
        engine,
        publisher,
        &config.pipeline,
    );

    info!(environment = %config.environment, "GlyphBox initialized");
    let state = AppState::new(config, charsets, pipeline);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "GlyphBox API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the service router. Shared with the integration tests so they
/// exercise the same middleware stack as production.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/compress", post(compress))
        .route("/charsets", get(charsets))
        .route("/uploads", post(create_upload_ticket))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
