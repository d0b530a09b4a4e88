//! API request handlers.

use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::core::pipeline::process_upload_with;
use crate::error::DocPromptError;

use super::{
    error::ApiError,
    types::{ApiState, ExtractMetadataResponse, HealthResponse, RootResponse},
};

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "file";

/// Service descriptor.
///
/// GET /
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Document Metadata Extractor API".to_string(),
        endpoints: vec!["/extract-metadata".to_string()],
    })
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Metadata extraction endpoint handler.
///
/// POST /extract-metadata
///
/// Accepts multipart form data with a single `file` field. Other fields are
/// ignored. The upload is processed on a blocking thread.
///
/// # Errors
///
/// - 400 when the `file` field is missing, has no filename, or the body is not valid multipart
/// - 400 when the sniffed content type is not in the allow-list
/// - 500 for any other processing failure
pub async fn extract_metadata_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractMetadataResponse>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(DocPromptError::validation(e.to_string())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(DocPromptError::validation(e.to_string())))?;

        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload.filter(|(filename, _)| !filename.is_empty()) else {
        return Err(ApiError::validation(DocPromptError::validation("No file provided")));
    };

    tracing::info!("Received {} ({} bytes)", filename, data.len());

    let processed = tokio::task::spawn_blocking(move || {
        process_upload_with(&state.dispatcher, &filename, &data, &state.config, &state.supported)
    })
    .await
    .map_err(|join_err| ApiError::internal(DocPromptError::Other(format!("Task panicked: {}", join_err))))??;

    Ok(Json(ExtractMetadataResponse {
        success: true,
        metadata: processed.metadata,
        prompt_context: processed.prompt_context,
    }))
}
