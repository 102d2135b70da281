//! Upload Route
//!
//! POST /upload - stream the `file` part of a multipart body through the
//! relay and report its size, SHA-256 and throughput.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Extension, Json,
};
use tracing::Instrument;
use uuid::Uuid;

use super::timing::RequestStart;
use crate::state::AppState;
use crate::upload::{
    consume, declared_length, pipe, precheck, produce, SizeGuard, TransferError, UploadError,
    UploadReceipt, FILE_FIELD,
};

// ============================================================================
// Error Response
// ============================================================================

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, "Upload failed: {}", self);
        } else {
            tracing::warn!(status = %status, "Upload rejected: {}", self);
        }

        (status, self.message()).into_response()
    }
}

/// Errors while locating the part: transport faults and early end of body
/// are truncation, everything else is a malformed request
fn part_error(e: multer::Error) -> UploadError {
    match e {
        multer::Error::StreamReadFailed(_)
        | multer::Error::IncompleteStream
        | multer::Error::IncompleteFieldData { .. }
        | multer::Error::IncompleteHeaders => {
            UploadError::Transfer(TransferError::Truncated(e.to_string()))
        }
        other => UploadError::MalformedMultipart(other.to_string()),
    }
}

// ============================================================================
// Handler
// ============================================================================

/// POST /upload
///
/// Finds the `file` part, rejects on the declared length if it cannot fit,
/// then runs the producer on its own task while this handler consumes.
#[tracing::instrument(name = "upload", skip_all, fields(upload_id = %Uuid::new_v4()))]
pub async fn upload_file(
    State(state): State<AppState>,
    start: Option<Extension<RequestStart>>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadReceipt>, UploadError> {
    let started = start
        .map(|Extension(RequestStart(at))| at)
        .unwrap_or_else(Instant::now);
    let limits = state.upload_limits();

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| UploadError::NotMultipart("missing Content-Type".to_string()))?;
    let boundary =
        multer::parse_boundary(content_type).map_err(|e| UploadError::NotMultipart(e.to_string()))?;

    let mut multipart = multer::Multipart::new(body.into_data_stream(), boundary);

    // Skip parts until the one named `file`
    let field = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(part_error)?
            .ok_or(UploadError::MissingFilePart)?;

        if field.name() == Some(FILE_FIELD) {
            break field;
        }
        tracing::debug!(name = ?field.name(), "Skipping multipart field");
    };

    tracing::debug!(
        file_name = ?field.file_name(),
        content_type = ?field.content_type(),
        "Found file part"
    );

    precheck(declared_length(&headers), limits)?;

    let (writer, reader) = pipe();
    tokio::spawn(produce(field, SizeGuard::new(limits), writer).in_current_span());

    let receipt = consume(reader, started).await?;

    tracing::info!(
        size = receipt.size,
        sha256 = %receipt.sha256,
        mbps = receipt.mbps,
        "Upload complete"
    );

    Ok(Json(receipt))
}
