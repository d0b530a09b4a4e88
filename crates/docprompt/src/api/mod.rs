//! REST API server for document metadata extraction.
//!
//! An axum router that accepts one uploaded document, identifies it, extracts
//! bounded metadata and returns it together with a rendered prompt context.
//!
//! # Endpoints
//!
//! - `POST /extract-metadata` - Extract metadata from an uploaded file (multipart field `file`)
//! - `GET /` - Service descriptor
//! - `GET /health` - Health check endpoint
//!
//! # Examples
//!
//! ```no_run
//! use docprompt::api::serve;
//!
//! #[tokio::main]
//! async fn main() -> docprompt::Result<()> {
//!     serve("127.0.0.1", 5000).await?;
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! curl -F "file=@report.pdf" http://localhost:5000/extract-metadata
//!
//! curl http://localhost:5000/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, create_router_with_limits, serve, serve_with_config, serve_with_config_and_limits};
pub use types::{ApiSizeLimits, ApiState, ErrorResponse, ExtractMetadataResponse, HealthResponse, RootResponse};
