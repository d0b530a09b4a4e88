//! API request and response types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::dispatch::Dispatcher;
use crate::core::mime::SupportedTypes;
use crate::types::UploadMetadata;
use crate::ExtractionConfig;

/// API server size limit configuration.
///
/// Default limits are 100 MB for both the whole request body and a single
/// multipart field.
///
/// # Configuration via Environment Variables
///
/// ```bash
/// # In bytes:
/// export DOCPROMPT_MAX_REQUEST_BODY_BYTES=104857600     # 100 MB
/// export DOCPROMPT_MAX_MULTIPART_FIELD_BYTES=104857600  # 100 MB
///
/// # Legacy, in MB (applies to both limits):
/// export DOCPROMPT_MAX_UPLOAD_SIZE_MB=100
/// ```
///
/// # Examples
///
/// ```
/// use docprompt::api::ApiSizeLimits;
///
/// let limits = ApiSizeLimits::default();
/// assert_eq!(limits.max_request_body_bytes, 100 * 1024 * 1024);
///
/// let limits = ApiSizeLimits::from_mb(20, 10);
/// assert_eq!(limits.max_multipart_field_bytes, 10 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSizeLimits {
    /// Maximum size of the entire request body in bytes.
    pub max_request_body_bytes: usize,

    /// Maximum size of a single multipart field in bytes.
    pub max_multipart_field_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self::from_mb(100, 100)
    }
}

impl ApiSizeLimits {
    pub fn new(max_request_body_bytes: usize, max_multipart_field_bytes: usize) -> Self {
        Self {
            max_request_body_bytes,
            max_multipart_field_bytes,
        }
    }

    /// Create size limits from MB values.
    pub fn from_mb(max_request_body_mb: usize, max_multipart_field_mb: usize) -> Self {
        Self {
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
            max_multipart_field_bytes: max_multipart_field_mb * 1024 * 1024,
        }
    }
}

/// Successful extraction response.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractMetadataResponse {
    /// Always `true`; failures use [`ErrorResponse`]
    pub success: bool,
    /// Metadata record merged with the upload's file facts
    pub metadata: UploadMetadata,
    /// Rendered summary for a language model
    pub prompt_context: String,
}

/// Static service descriptor returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// API version
    pub version: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type name
    pub error_type: String,
    /// Error message
    pub message: String,
    /// HTTP status code
    pub status_code: u16,
}

/// API server state.
///
/// Everything here is built once when the router is created and only read
/// afterwards.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Extraction configuration applied to every request
    pub config: Arc<ExtractionConfig>,
    /// MIME allow-list
    pub supported: Arc<SupportedTypes>,
    pub dispatcher: Arc<Dispatcher>,
}
