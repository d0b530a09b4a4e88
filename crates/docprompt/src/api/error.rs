//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::DocPromptError;

use super::types::ErrorResponse;

/// Error returned by API handlers.
///
/// Request-level problems (bad upload, unsupported type) map to 400; anything
/// that went wrong while processing a valid upload maps to 500.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    /// 400 carrying the error's own message.
    pub fn validation(err: DocPromptError) -> Self {
        let message = match &err {
            DocPromptError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self::new(StatusCode::BAD_REQUEST, error_type(&err), message)
    }

    /// 500 with the failure detail prefixed by a fixed phrase.
    pub fn internal(err: DocPromptError) -> Self {
        tracing::error!("Document processing failed: {}", err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_type(&err),
            format!("Error processing document: {}", err),
        )
    }

    fn new(status: StatusCode, error_type: &str, message: String) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error_type: error_type.to_string(),
                message,
                status_code: status.as_u16(),
            },
        }
    }
}

fn error_type(err: &DocPromptError) -> &'static str {
    match err {
        DocPromptError::Io(_) => "IoError",
        DocPromptError::Parsing { .. } => "ParsingError",
        DocPromptError::Validation { .. } => "ValidationError",
        DocPromptError::Serialization { .. } => "SerializationError",
        DocPromptError::UnsupportedFormat { .. } => "UnsupportedFormatError",
        DocPromptError::Other(_) => "InternalError",
    }
}

impl From<DocPromptError> for ApiError {
    fn from(err: DocPromptError) -> Self {
        if err.is_client_error() {
            Self::validation(err)
        } else {
            Self::internal(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
