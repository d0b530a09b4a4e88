//! Error types for docprompt.
//!
//! All fallible operations in the library return [`DocPromptError`]:
//!
//! - `Io` wraps `std::io::Error` and is never re-wrapped; file system problems
//!   surface as-is so they can be reported.
//! - `Parsing` covers format errors raised by the document libraries (corrupt
//!   PDFs, unreadable workbooks, undecodable images).
//! - `Validation` covers bad requests and bad configuration.
//! - `UnsupportedFormat` is returned when sniffed content is not on the allow-list.
//!
//! Extraction failures are normally contained by the dispatcher and turned into
//! placeholder records, so most of these never reach an HTTP client.
use thiserror::Error;

/// Result type alias using `DocPromptError`.
pub type Result<T> = std::result::Result<T, DocPromptError>;

/// Main error type for all docprompt operations.
#[derive(Debug, Error)]
pub enum DocPromptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported file type: {mime_type}. Supported types: [{}]", format_supported(.supported))]
    UnsupportedFormat { mime_type: String, supported: Vec<String> },

    #[error("{0}")]
    Other(String),
}

fn format_supported(supported: &[String]) -> String {
    supported
        .iter()
        .map(|mime| format!("'{}'", mime))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<calamine::Error> for DocPromptError {
    fn from(err: calamine::Error) -> Self {
        match err {
            // Real IO errors bubble up unchanged
            calamine::Error::Io(io_err) if io_err.kind() != std::io::ErrorKind::InvalidData => {
                DocPromptError::Io(io_err)
            }
            other => DocPromptError::Parsing {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

impl From<lopdf::Error> for DocPromptError {
    fn from(err: lopdf::Error) -> Self {
        DocPromptError::Parsing {
            message: format!("Invalid PDF: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<image::ImageError> for DocPromptError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io_err) => DocPromptError::Io(io_err),
            other => DocPromptError::Parsing {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

impl From<zip::result::ZipError> for DocPromptError {
    fn from(err: zip::result::ZipError) -> Self {
        DocPromptError::Parsing {
            message: format!("Failed to open ZIP archive: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for DocPromptError {
    fn from(err: serde_json::Error) -> Self {
        DocPromptError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl DocPromptError {
    error_constructor!(parsing, Parsing);
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);

    /// Whether this error should be reported to HTTP clients as a bad request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DocPromptError::Validation { .. } | DocPromptError::UnsupportedFormat { .. }
        )
    }
}
