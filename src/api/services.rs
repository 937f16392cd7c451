use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use http_body_util::BodyExt;
use uuid::Uuid;

use super::{
    models::{
        CharsetContentResponse, CharsetListResponse, CharsetQuery, CompressRequest,
        CompressResponse, HealthResponse, UploadTicketRequest, UploadTicketResponse,
    },
    state::AppState,
};
use crate::api::error::ApiError;
use crate::pipeline::SubsetRequest;
use crate::publisher::sanitize_file_component;

const UPLOAD_CONTENT_TYPES: &[&str] = &[
    "font/ttf",
    "font/otf",
    "application/vnd.ms-opentype",
    "application/octet-stream",
];

const UPLOAD_TICKET_TTL_MINUTES: i64 = 10;

/// Font compression endpoint (POST /compress)
///
/// Accepts a JSON body naming the source font URL (legacy `blobUrl` /
/// `fontUrl` aliases included) plus the characters to retain, runs the
/// subsetting pipeline, and returns the published download URL.
///
/// ## Flow:
/// 1. Validate Content-Type and body size
/// 2. Resolve the legacy URL aliases and build the pipeline request
/// 3. Run the pipeline (validate → resolve → fetch → subset → publish)
/// 4. Map the outcome to 200 / 400 / 500 / 504
///
/// The pipeline runs on its own task so a client that hangs up early
/// cannot cancel the job mid-stage and skip temp-file cleanup.
pub async fn compress(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("missing Content-Type header".into()))?;
    super::utils::parse_content_type(content_type)?;

    let body_bytes = read_body(body, &state).await?;
    let request: CompressRequest = serde_json::from_slice(&body_bytes)?;

    let url = request.source_url().unwrap_or_default().to_string();
    tracing::info!(
        url = %super::utils::truncate_for_log(&url, 100),
        text_chars = request.text.as_deref().map(|t| t.chars().count()).unwrap_or(0),
        charsets = ?request.charsets.as_deref().unwrap_or_default(),
        "received compression request"
    );

    let subset_request = SubsetRequest {
        url,
        text: request.text.unwrap_or_default(),
        charsets: request.charsets.unwrap_or_default(),
    };

    state.metrics.request_received();

    let pipeline = state.pipeline.clone();
    let outcome = tokio::spawn(async move { pipeline.process(subset_request).await })
        .await
        .map_err(|e| ApiError::Internal(format!("subsetting task failed: {e}")))?;

    match outcome {
        Ok(artifact) => {
            state.metrics.request_completed();
            Ok((
                StatusCode::OK,
                Json(CompressResponse {
                    success: true,
                    font_name: artifact.file_name,
                    file_size: artifact.size,
                    download_url: artifact.download_url,
                }),
            ))
        }
        Err(error) => {
            if error.is_timeout() {
                state.metrics.request_timed_out();
            } else {
                state.metrics.request_failed();
            }
            let api_error = ApiError::from_pipeline(&error, state.config.is_production());
            tracing::warn!(code = api_error.code(), error = %error, "compression request failed");
            Err(api_error)
        }
    }
}

/// Charset catalog endpoint (GET /charsets)
///
/// Without a query, lists the available charset ids; with `?name=<id>`,
/// returns that charset's characters and length, or 404.
pub async fn charsets(
    State(state): State<AppState>,
    Query(query): Query<CharsetQuery>,
) -> Result<Response, ApiError> {
    if let Some(name) = query.name {
        let Some(characters) = state.charsets.resolve(&name) else {
            return Err(ApiError::NotFound(format!("charset '{name}' does not exist")));
        };

        return Ok((
            StatusCode::OK,
            Json(CharsetContentResponse {
                success: true,
                length: characters.chars().count(),
                characters: characters.to_string(),
                name,
            }),
        )
            .into_response());
    }

    Ok((
        StatusCode::OK,
        Json(CharsetListResponse {
            success: true,
            charsets: state.charsets.list_available(),
        }),
    )
        .into_response())
}

/// Upload-ticket endpoint (POST /uploads)
///
/// Issues a short-lived ticket for a client-side original-font upload:
/// the storage path is server-enforced under `{environment}/uploads/` and
/// the allowed content types are restricted to font MIME types. The
/// storage service consuming the ticket is external.
pub async fn create_upload_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("missing Content-Type header".into()))?;
    super::utils::parse_content_type(content_type)?;

    let body_bytes = read_body(body, &state).await?;
    let request: UploadTicketRequest = serde_json::from_slice(&body_bytes)?;

    let file_name = sanitize_file_component(request.file_name.trim());
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("\"fileName\" must not be empty".into()));
    }

    let response = UploadTicketResponse {
        success: true,
        token: Uuid::new_v4().to_string(),
        upload_path: format!("{}/uploads/{}", state.config.environment, file_name),
        allowed_content_types: UPLOAD_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        expires_at: Utc::now() + chrono::Duration::minutes(UPLOAD_TICKET_TTL_MINUTES),
    };

    tracing::info!(path = %response.upload_path, "issued upload ticket");
    Ok((StatusCode::OK, Json(response)))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    use std::collections::HashMap;

    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());
    components.insert("storage".to_string(), "healthy".to_string());
    components.insert("subset_tool".to_string(), "healthy".to_string());

    let snapshot = state.metrics.snapshot();
    tracing::debug!(
        received = snapshot.requests_received,
        completed = snapshot.requests_completed,
        "health probed"
    );

    let response = HealthResponse {
        status: "healthy".to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn read_body(body: axum::body::Body, state: &AppState) -> Result<bytes::Bytes, ApiError> {
    let bytes = body
        .collect()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .to_bytes();

    let limit = state.config.server.api.max_body_bytes;
    if bytes.len() as u64 > limit.as_u64() {
        return Err(ApiError::BadRequest(format!(
            "request body exceeds the {limit} limit"
        )));
    }

    Ok(bytes)
}
