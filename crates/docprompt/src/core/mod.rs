//! Core orchestration: type detection, dispatch, the upload pipeline and
//! prompt rendering.
//!
//! # Example
//!
//! ```rust,no_run
//! use docprompt::core::config::ExtractionConfig;
//! use docprompt::core::mime::SupportedTypes;
//! use docprompt::core::pipeline::process_file;
//!
//! # fn example() -> docprompt::Result<()> {
//! let processed = process_file("report.pdf", &ExtractionConfig::default(), &SupportedTypes::default())?;
//! println!("{}", processed.prompt_context);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod mime;
pub mod pipeline;
pub mod prompt;

pub use config::{ExtractionConfig, PdfConfig, ReadLimits};
pub use dispatch::{Dispatcher, DocumentKind};
pub use mime::{SupportedTypes, detect_mime_type, detect_mime_type_from_bytes};
pub use pipeline::{process_file, process_upload, process_upload_with};
pub use prompt::render_prompt_context;
