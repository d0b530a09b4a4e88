//! Routing of a validated MIME type to exactly one extractor.
//!
//! [`DocumentKind`] is the routing table. [`Dispatcher::extract`] runs the
//! chosen extractor inside a single containment boundary: an `Err` or a panic
//! from any extractor becomes that kind's placeholder record with `error` set.
//! The only exception is PDF with `pdf.fail_on_error`, where the failure is
//! returned to the caller.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use tracing::{debug, warn};

use crate::core::config::ExtractionConfig;
use crate::core::mime::{
    DOCX_MIME_TYPE, EXCEL_BINARY_MIME_TYPE, EXCEL_MIME_TYPE, LEGACY_WORD_MIME_TYPE, PDF_MIME_TYPE,
    PLAIN_TEXT_MIME_TYPE,
};
use crate::error::{DocPromptError, Result};
use crate::extraction::{
    SpreadsheetExtractor, extract_docx_metadata, extract_image_metadata, extract_pdf_metadata, extract_text_metadata,
};
use crate::types::{DocumentMetadata, DocumentType};

/// Document family an upload is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Spreadsheet,
    Image,
    Document,
    Text,
    Unknown,
}

impl DocumentKind {
    /// Exact match for PDF, spreadsheets, Word and text; prefix match for `image/*`.
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_type {
            PDF_MIME_TYPE => DocumentKind::Pdf,
            EXCEL_MIME_TYPE | EXCEL_BINARY_MIME_TYPE => DocumentKind::Spreadsheet,
            DOCX_MIME_TYPE | LEGACY_WORD_MIME_TYPE => DocumentKind::Document,
            PLAIN_TEXT_MIME_TYPE => DocumentKind::Text,
            other if other.starts_with("image/") => DocumentKind::Image,
            _ => DocumentKind::Unknown,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            DocumentKind::Pdf => DocumentType::Pdf,
            DocumentKind::Spreadsheet => DocumentType::Spreadsheet,
            DocumentKind::Image => DocumentType::Image,
            DocumentKind::Document => DocumentType::Document,
            DocumentKind::Text => DocumentType::Text,
            DocumentKind::Unknown => DocumentType::Unknown,
        }
    }

    fn placeholder_preview(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF document (unable to read content)",
            DocumentKind::Spreadsheet => "Spreadsheet (unable to read content)",
            DocumentKind::Image => "Image file (unable to read metadata)",
            DocumentKind::Document => "Word document (unable to read content)",
            DocumentKind::Text => "Text file (unable to read content)",
            DocumentKind::Unknown => "Unsupported document type",
        }
    }

    fn placeholder_structure(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::Pdf => &["PDF"],
            DocumentKind::Spreadsheet => &["Spreadsheet", "Worksheets", "Data"],
            DocumentKind::Image => &["Image"],
            DocumentKind::Document => &["Document"],
            DocumentKind::Text => &["Text"],
            DocumentKind::Unknown => &["Unknown"],
        }
    }

    /// Fixed-shape record used when nothing could be read from the document.
    pub fn placeholder(&self, error: Option<String>) -> DocumentMetadata {
        DocumentMetadata {
            document_type: self.document_type(),
            page_count: 1,
            text_preview: self.placeholder_preview().to_string(),
            tables_count: 0,
            images_count: if *self == DocumentKind::Image { 1 } else { 0 },
            structure_elements: self.placeholder_structure().iter().map(|s| s.to_string()).collect(),
            format: None,
            error,
        }
    }
}

/// Runs the extractor for a document kind.
#[derive(Debug, Default)]
pub struct Dispatcher {
    spreadsheet: SpreadsheetExtractor,
}

impl Dispatcher {
    pub fn new(spreadsheet: SpreadsheetExtractor) -> Self {
        Self { spreadsheet }
    }

    /// Extract metadata for a file whose type has already been validated.
    ///
    /// # Errors
    ///
    /// Only fails for PDFs when `config.pdf.fail_on_error` is set; every other
    /// failure is contained in the returned record.
    pub fn extract(&self, path: &Path, mime_type: &str, config: &ExtractionConfig) -> Result<DocumentMetadata> {
        let kind = DocumentKind::from_mime(mime_type);
        debug!("Dispatching {} as {:?}", mime_type, kind);

        let outcome = catch_unwind(AssertUnwindSafe(|| self.run(kind, path, mime_type, config)))
            .unwrap_or_else(|payload| Err(DocPromptError::Other(panic_message(payload.as_ref()))));

        match outcome {
            Ok(metadata) => Ok(metadata),
            Err(err) if kind == DocumentKind::Pdf && config.pdf.fail_on_error => Err(err),
            Err(err) => {
                warn!("{:?} extraction failed, returning placeholder: {}", kind, err);
                Ok(kind.placeholder(Some(err.to_string())))
            }
        }
    }

    fn run(
        &self,
        kind: DocumentKind,
        path: &Path,
        mime_type: &str,
        config: &ExtractionConfig,
    ) -> Result<DocumentMetadata> {
        let limits = &config.limits;
        match kind {
            DocumentKind::Pdf => extract_pdf_metadata(path, limits),
            DocumentKind::Spreadsheet => Ok(self.spreadsheet.extract(path, mime_type, limits)),
            DocumentKind::Image => extract_image_metadata(path),
            DocumentKind::Document => extract_docx_metadata(path, limits),
            DocumentKind::Text => extract_text_metadata(path, limits),
            DocumentKind::Unknown => Ok(kind.placeholder(None)),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("Extractor panicked: {}", detail)
}
