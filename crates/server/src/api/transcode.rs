//! Speed transform upload handler.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use speedshift_core::{
    is_accepted_extension, trimmed_speed, SpeedFactor, TranscodeError, TranscodeRequest,
};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Raw processor error stream, only for processor failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
            kind: None,
            diagnostic: None,
        }),
    )
}

/// Keeps the status axum picked (413 for an oversized body, 400 otherwise).
fn multipart_error(e: MultipartError) -> ApiError {
    (
        e.status(),
        Json(ErrorResponse {
            error: e.body_text(),
            kind: None,
            diagnostic: None,
        }),
    )
}

fn transcode_error(e: TranscodeError) -> ApiError {
    let status = match &e {
        TranscodeError::InvalidSpeed { .. } | TranscodeError::UnparsableSpeed { .. } => {
            StatusCode::BAD_REQUEST
        }
        TranscodeError::ProcessorFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TranscodeError::ProcessorLaunch { .. } | TranscodeError::Cancelled => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        TranscodeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        TranscodeError::Staging { .. }
        | TranscodeError::MissingOutput { .. }
        | TranscodeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            kind: Some(e.kind().to_string()),
            diagnostic: e.diagnostic().map(str::to_string),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/transcode
///
/// Multipart fields: `file` (the video) and `speed` (e.g. `1.5`).
/// Responds with the re-timed video as an attachment named
/// `<stem>.<speed>x<ext>`.
pub async fn transcode(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut speed_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                data = Some(bytes.to_vec());
            }
            "speed" => {
                let text = field.text().await.map_err(multipart_error)?;
                speed_text = Some(text);
            }
            _ => {}
        }
    }

    let data = match data {
        Some(d) if !d.is_empty() => d,
        _ => return Err(bad_request("No video file provided")),
    };
    let filename = match filename {
        Some(f) if !f.trim().is_empty() => f,
        _ => return Err(bad_request("Uploaded file has no filename")),
    };
    let accepted = &state.config().processor.accepted_extensions;
    if !is_accepted_extension(&filename, accepted) {
        return Err(bad_request(format!(
            "Unsupported file type; accepted extensions: {}",
            accepted.join(", ")
        )));
    }
    let speed: SpeedFactor = speed_text
        .ok_or_else(|| bad_request("No speed provided"))?
        .parse()
        .map_err(transcode_error)?;

    tracing::info!(filename = %filename, speed = speed.value(), bytes = data.len(), "Transcode requested");

    // Dropping this handler (client gone) cancels the encode.
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let output = state
        .runner()
        .run(TranscodeRequest::new(data, filename, speed.value()), &cancel)
        .await
        .map_err(transcode_error)?;

    let body = output
        .read_artifact()
        .await
        .map_err(|e| transcode_error(TranscodeError::Io(e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(output.output_name())),
    );
    if let Ok(value) = HeaderValue::from_str(&content_disposition(output.output_name())) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&output.summary.job_id) {
        headers.insert(HeaderName::from_static("x-speedshift-job-id"), value);
    }
    if let Ok(value) = HeaderValue::from_str(&trimmed_speed(output.summary.speed)) {
        headers.insert(HeaderName::from_static("x-speedshift-speed"), value);
    }

    Ok((StatusCode::OK, headers, body).into_response())
}

/// MIME type for the accepted video containers.
fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("clip.2x.mp4"), "video/mp4");
        assert_eq!(content_type_for("clip.0.5x.MOV"), "video/quicktime");
        assert_eq!(content_type_for("clip.2x.webm"), "video/webm");
        assert_eq!(content_type_for("clip.2x"), "application/octet-stream");
    }

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("clip.2x.mp4"),
            "attachment; filename=\"clip.2x.mp4\"; filename*=UTF-8''clip.2x.mp4"
        );
    }

    #[test]
    fn test_content_disposition_escapes_quotes_and_unicode() {
        let value = content_disposition("vidéo \"final\".1.5x.mp4");
        assert!(value.starts_with("attachment; filename=\"vid_o _final_.1.5x.mp4\""));
        assert!(value.contains("filename*=UTF-8''vid%C3%A9o%20%22final%22.1.5x.mp4"));
        assert!(HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn test_error_status_mapping() {
        let (status, body) = transcode_error(TranscodeError::processor_failure(
            Some(1),
            "Invalid data found",
        ));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.diagnostic.as_deref(), Some("Invalid data found"));

        let (status, _) = transcode_error(TranscodeError::invalid_speed(0.0, "zero"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = transcode_error(TranscodeError::Timeout { timeout_secs: 5 });
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }
}
