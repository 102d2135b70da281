//! Upload types for the streaming relay

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Maximum accepted upload size: 1MB
pub const MAX_UPLOAD_SIZE: u64 = 1024 * 1024;

/// Extra bytes tolerated on the declared Content-Length for multipart framing
pub const HEADER_SLACK: u64 = 1024;

/// Number of chunks the relay holds before the producer has to wait
pub const RELAY_CAPACITY: usize = 1;

/// Name of the multipart field carrying the payload
pub const FILE_FIELD: &str = "file";

// ============================================================================
// Limits
// ============================================================================

/// Size limits applied to a single upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Largest payload accepted, in bytes
    pub max_bytes: u64,

    /// Allowance on top of `max_bytes` for the declared request length
    pub header_slack: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_SIZE,
            header_slack: HEADER_SLACK,
        }
    }
}

// ============================================================================
// Outcome Types
// ============================================================================

/// Payload of a clean relay close: what the producer saw end to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    /// Total bytes read from the part
    pub size: u64,

    /// Hex-encoded SHA-256 of those bytes
    pub sha256: String,
}

/// Successful upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Bytes received
    pub size: u64,

    /// SHA-256 of the payload
    pub sha256: String,

    /// Effective throughput in megabits per second
    pub mbps: f64,
}

// ============================================================================
// Error Types
// ============================================================================

/// Terminal errors carried by the relay's error close
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("Upload exceeds {limit} bytes")]
    Oversize { limit: u64 },

    #[error("Upload truncated: {0}")]
    Truncated(String),
}

/// Upload error types
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Not a multipart request: {0}")]
    NotMultipart(String),

    #[error("Malformed multipart body: {0}")]
    MalformedMultipart(String),

    #[error("No part named 'file'")]
    MissingFilePart,

    #[error("Declared length {declared} exceeds {limit} bytes")]
    TooLarge { declared: u64, limit: u64 },

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl UploadError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotMultipart(_) => StatusCode::BAD_REQUEST,
            Self::MalformedMultipart(_) => StatusCode::BAD_REQUEST,
            Self::MissingFilePart => StatusCode::BAD_REQUEST,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Transfer(TransferError::Oversize { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Transfer(TransferError::Truncated(_)) => StatusCode::BAD_REQUEST,
        }
    }

    /// Plain-text body sent to the client
    pub fn message(&self) -> String {
        match self {
            Self::NotMultipart(reason) | Self::MalformedMultipart(reason) => {
                format!("Bad Request ({})", reason)
            }
            Self::MissingFilePart => format!("Bad Request (no part named '{}')", FILE_FIELD),
            Self::TooLarge { .. } | Self::Transfer(TransferError::Oversize { .. }) => {
                "File too large.".to_string()
            }
            Self::Transfer(TransferError::Truncated(_)) => "Upload failed.".to_string(),
        }
    }
}
