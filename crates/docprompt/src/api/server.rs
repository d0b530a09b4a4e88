//! API server setup and configuration.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::core::dispatch::Dispatcher;
use crate::core::mime::SupportedTypes;
use crate::error::DocPromptError;
use crate::{ExtractionConfig, Result};

use super::{
    handlers::{extract_metadata_handler, health_handler, root_handler},
    types::{ApiSizeLimits, ApiState},
};

const MAX_REQUEST_BODY_BYTES_VAR: &str = "DOCPROMPT_MAX_REQUEST_BODY_BYTES";
const MAX_MULTIPART_FIELD_BYTES_VAR: &str = "DOCPROMPT_MAX_MULTIPART_FIELD_BYTES";
const MAX_UPLOAD_SIZE_MB_VAR: &str = "DOCPROMPT_MAX_UPLOAD_SIZE_MB";
const CORS_ORIGINS_VAR: &str = "DOCPROMPT_CORS_ORIGINS";

/// Parse size limits from environment variables.
///
/// `DOCPROMPT_MAX_REQUEST_BODY_BYTES` (with optional
/// `DOCPROMPT_MAX_MULTIPART_FIELD_BYTES`) wins over the legacy
/// `DOCPROMPT_MAX_UPLOAD_SIZE_MB`. Unset, unparsable or zero values fall
/// through to the 100 MB default.
fn parse_size_limits_from_env() -> ApiSizeLimits {
    if let Ok(value) = std::env::var(MAX_REQUEST_BODY_BYTES_VAR) {
        match value.parse::<usize>() {
            Ok(bytes) if bytes > 0 => {
                let multipart_bytes = std::env::var(MAX_MULTIPART_FIELD_BYTES_VAR)
                    .ok()
                    .and_then(|v| v.parse::<usize>().ok())
                    .filter(|v| *v > 0)
                    .unwrap_or(bytes);

                tracing::info!(
                    "Upload size limits configured from environment: request_body={} bytes, multipart_field={} bytes",
                    bytes,
                    multipart_bytes
                );
                return ApiSizeLimits::new(bytes, multipart_bytes);
            }
            Ok(_) => tracing::warn!("Invalid {} value (must be > 0)", MAX_REQUEST_BODY_BYTES_VAR),
            Err(_) => tracing::warn!(
                "Failed to parse {}='{}', must be a valid usize",
                MAX_REQUEST_BODY_BYTES_VAR,
                value
            ),
        }
    }

    if let Ok(value) = std::env::var(MAX_UPLOAD_SIZE_MB_VAR) {
        match value.parse::<usize>() {
            Ok(mb) if mb > 0 => {
                tracing::info!("Upload size limit configured from environment (legacy): {} MB", mb);
                return ApiSizeLimits::from_mb(mb, mb);
            }
            Ok(_) => tracing::warn!("Invalid {} value (must be > 0)", MAX_UPLOAD_SIZE_MB_VAR),
            Err(_) => tracing::warn!(
                "Failed to parse {}='{}', must be a valid usize",
                MAX_UPLOAD_SIZE_MB_VAR,
                value
            ),
        }
    }

    let limits = ApiSizeLimits::default();
    tracing::info!(
        "Upload size limit: 100 MB (default, {} bytes)",
        limits.max_request_body_bytes
    );
    limits
}

fn cors_layer_from_env() -> CorsLayer {
    let permissive = || CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let Ok(origins_str) = std::env::var(CORS_ORIGINS_VAR) else {
        tracing::warn!(
            "CORS configured to allow all origins (default). Set {} to a comma-separated list of origins to restrict it",
            CORS_ORIGINS_VAR
        );
        return permissive();
    };

    let origins: Vec<_> = origins_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<axum::http::HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("{} set but empty/invalid, falling back to permissive CORS", CORS_ORIGINS_VAR);
        return permissive();
    }

    tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router with all routes configured.
///
/// Public so the router can be nested into another axum application.
///
/// # Examples
///
/// ```no_run
/// use docprompt::{ExtractionConfig, api::create_router};
///
/// let router = create_router(ExtractionConfig::default());
/// let app = axum::Router::new().nest("/docs", router);
/// ```
pub fn create_router(config: ExtractionConfig) -> Router {
    create_router_with_limits(config, ApiSizeLimits::default())
}

/// Create the API router with custom size limits.
///
/// Bodies over `max_request_body_bytes` are rejected with 413 before reaching
/// the handler.
pub fn create_router_with_limits(config: ExtractionConfig, limits: ApiSizeLimits) -> Router {
    let state = ApiState {
        config: Arc::new(config),
        supported: Arc::new(SupportedTypes::default()),
        dispatcher: Arc::new(Dispatcher::default()),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/extract-metadata", post(extract_metadata_handler))
        .layer(DefaultBodyLimit::max(limits.max_multipart_field_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors_layer_from_env())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server with config file discovery.
///
/// Looks for `docprompt.toml` in the current directory and its parents, and
/// reads upload limits from the environment.
///
/// # Examples
///
/// ```no_run
/// use docprompt::api::serve;
///
/// #[tokio::main]
/// async fn main() -> docprompt::Result<()> {
///     serve("0.0.0.0", 5000).await
/// }
/// ```
pub async fn serve(host: impl AsRef<str>, port: u16) -> Result<()> {
    let config = match ExtractionConfig::discover()? {
        Some(config) => {
            tracing::info!("Loaded extraction config from discovered file");
            config
        }
        None => {
            tracing::info!("No config file found, using default configuration");
            ExtractionConfig::default()
        }
    };

    serve_with_config(host, port, config).await
}

/// Start the API server with explicit config and size limits from the environment.
pub async fn serve_with_config(host: impl AsRef<str>, port: u16, config: ExtractionConfig) -> Result<()> {
    let limits = parse_size_limits_from_env();
    serve_with_config_and_limits(host, port, config, limits).await
}

/// Start the API server with explicit config and size limits.
///
/// # Errors
///
/// Returns `DocPromptError::Validation` if `host` is not an IP address and
/// `DocPromptError::Io` if the socket can't be bound.
pub async fn serve_with_config_and_limits(
    host: impl AsRef<str>,
    port: u16,
    config: ExtractionConfig,
    limits: ApiSizeLimits,
) -> Result<()> {
    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| DocPromptError::validation(format!("Invalid host address: {}", e)))?;

    let addr = SocketAddr::new(ip, port);
    let app = create_router_with_limits(config, limits);

    tracing::info!("Starting document metadata API on http://{}:{}", ip, port);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(DocPromptError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| DocPromptError::Other(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    fn clear_limit_vars() {
        unsafe {
            std::env::remove_var(MAX_REQUEST_BODY_BYTES_VAR);
            std::env::remove_var(MAX_MULTIPART_FIELD_BYTES_VAR);
            std::env::remove_var(MAX_UPLOAD_SIZE_MB_VAR);
        }
    }

    #[test]
    fn test_create_router() {
        let _router = create_router(ExtractionConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_host_rejected() {
        let err = serve_with_config_and_limits("not-an-ip", 0, ExtractionConfig::default(), ApiSizeLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DocPromptError::Validation { .. }));
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_size_limits_default_100mb() {
        clear_limit_vars();

        let limits = parse_size_limits_from_env();
        assert_eq!(limits.max_request_body_bytes, 100 * 1024 * 1024);
        assert_eq!(limits.max_multipart_field_bytes, 100 * 1024 * 1024);
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_size_limits_from_bytes_env_vars() {
        clear_limit_vars();
        unsafe {
            std::env::set_var(MAX_REQUEST_BODY_BYTES_VAR, "20971520");
            std::env::set_var(MAX_MULTIPART_FIELD_BYTES_VAR, "10485760");
        }

        let limits = parse_size_limits_from_env();
        assert_eq!(limits.max_request_body_bytes, 20 * 1024 * 1024);
        assert_eq!(limits.max_multipart_field_bytes, 10 * 1024 * 1024);

        clear_limit_vars();
    }

    #[test]
    #[serial_test::serial]
    fn test_multipart_limit_follows_request_limit() {
        clear_limit_vars();
        unsafe {
            std::env::set_var(MAX_REQUEST_BODY_BYTES_VAR, "1048576");
        }

        let limits = parse_size_limits_from_env();
        assert_eq!(limits.max_multipart_field_bytes, 1024 * 1024);

        clear_limit_vars();
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_size_limits_from_legacy_mb_env_var() {
        clear_limit_vars();
        unsafe {
            std::env::set_var(MAX_UPLOAD_SIZE_MB_VAR, "16");
        }

        let limits = parse_size_limits_from_env();
        assert_eq!(limits, ApiSizeLimits::from_mb(16, 16));

        clear_limit_vars();
    }

    #[test]
    #[serial_test::serial]
    fn test_invalid_and_zero_values_fall_back_to_default() {
        clear_limit_vars();
        unsafe {
            std::env::set_var(MAX_REQUEST_BODY_BYTES_VAR, "not a number");
        }
        assert_eq!(parse_size_limits_from_env(), ApiSizeLimits::default());

        unsafe {
            std::env::set_var(MAX_REQUEST_BODY_BYTES_VAR, "0");
        }
        assert_eq!(parse_size_limits_from_env(), ApiSizeLimits::default());

        clear_limit_vars();
    }

    #[test]
    #[serial_test::serial]
    fn test_bytes_env_var_takes_precedence_over_legacy() {
        clear_limit_vars();
        unsafe {
            std::env::set_var(MAX_REQUEST_BODY_BYTES_VAR, "1048576");
            std::env::set_var(MAX_UPLOAD_SIZE_MB_VAR, "500");
        }

        let limits = parse_size_limits_from_env();
        assert_eq!(limits.max_request_body_bytes, 1024 * 1024);

        clear_limit_vars();
    }
}
