//! docprompt - document metadata extraction for prompt building.
//!
//! Accepts a PDF, spreadsheet, image, Word document or plain text file, sniffs
//! its type from content, reads a bounded prefix with the matching extractor
//! and renders a short natural-language summary ("prompt context") meant to be
//! handed to a language model.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docprompt::{ExtractionConfig, SupportedTypes, process_upload};
//!
//! # fn main() -> docprompt::Result<()> {
//! let bytes = std::fs::read("quarterly.xlsx")?;
//! let processed = process_upload("quarterly.xlsx", &bytes, &ExtractionConfig::default(), &SupportedTypes::default())?;
//! println!("{}", processed.prompt_context);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): MIME sniffing, dispatch, the upload pipeline, config loading
//! - **Extraction** (`extraction`): one routine per document family
//! - **API** (`api`, feature `api`): axum HTTP server exposing `/extract-metadata`

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extraction;
pub mod text;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

pub use error::{DocPromptError, Result};
pub use types::*;

pub use core::config::{ExtractionConfig, PdfConfig, ReadLimits};
pub use core::dispatch::{Dispatcher, DocumentKind};
pub use core::mime::{
    DOCX_MIME_TYPE, EXCEL_BINARY_MIME_TYPE, EXCEL_MIME_TYPE, LEGACY_WORD_MIME_TYPE, PDF_MIME_TYPE,
    PLAIN_TEXT_MIME_TYPE, SupportedTypes, detect_mime_type, detect_mime_type_from_bytes,
};
pub use core::pipeline::{process_file, process_upload, process_upload_with};
pub use core::prompt::render_prompt_context;
