//! Small request-processing helpers.

use crate::api::error::ApiError;

/// Require `application/json` (an optional charset parameter is fine).
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid Content-Type: {content_type}")))?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::BadRequest(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// Shorten long values (URLs, text blobs) for log lines.
pub fn truncate_for_log(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let truncated: String = value.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
