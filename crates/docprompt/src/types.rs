//! Metadata record types.
//!
//! A [`DocumentMetadata`] is produced once per upload by one of the format
//! extractors. Fields that only make sense for one family of documents live in
//! [`FormatMetadata`] and are flattened into the record when serialized, so the
//! JSON shape stays a single flat object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse document family reported in `document_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Spreadsheet,
    Image,
    Document,
    Text,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Spreadsheet => "spreadsheet",
            DocumentType::Image => "image",
            DocumentType::Document => "document",
            DocumentType::Text => "text",
            DocumentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary metadata extracted from a single document.
///
/// When `error` is set the extractor failed and every other field holds a
/// placeholder value rather than data read from the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub document_type: DocumentType,

    /// Pages for PDFs, sheets for spreadsheets, sections for Word documents, 1 otherwise.
    pub page_count: usize,

    /// Bounded prefix of the document text, with a trailing `...` when cut.
    pub text_preview: String,

    /// Tables seen in the inspected prefix (sheets for spreadsheets).
    pub tables_count: usize,

    /// Embedded images seen in the inspected prefix.
    pub images_count: usize,

    /// Coarse element categories, in detection order.
    pub structure_elements: Vec<String>,

    #[serde(flatten)]
    pub format: Option<FormatMetadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentMetadata {
    /// Spreadsheet transcript, if this record carries one.
    pub fn full_content(&self) -> Option<&str> {
        match &self.format {
            Some(FormatMetadata::Spreadsheet(sheet)) => Some(sheet.full_content.as_str()),
            _ => None,
        }
    }
}

/// Format-specific fields, present only for the matching `document_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormatMetadata {
    Pdf(PdfMetadata),
    Spreadsheet(SpreadsheetMetadata),
    Image(ImageMetadata),
    Document(WordMetadata),
    Text(TextMetadata),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfMetadata {
    /// Whether the document outline (table of contents) has any entries
    pub has_bookmarks: bool,
    /// Whether the trailer declares an encryption dictionary
    pub is_encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetMetadata {
    pub sheet_names: Vec<String>,
    /// Data rows read across the inspected sheets
    pub total_rows: usize,
    /// Complete transcript used as the prompt content
    pub full_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// `WIDTHxHEIGHT` in pixels
    pub dimensions: String,
    /// Declared container format, e.g. `JPEG`
    pub format: String,
    /// Color mode, e.g. `RGB` or `L`
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMetadata {
    pub paragraph_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMetadata {
    pub line_count: usize,
    pub character_count: usize,
}

/// Facts about the uploaded file itself, independent of its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFacts {
    pub filename: String,
    pub file_size: usize,
    pub mime_type: String,
    /// Extension including the leading dot, or empty when the name has none
    pub file_extension: String,
}

/// A metadata record merged with the facts of the upload it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadMetadata {
    #[serde(flatten)]
    pub document: DocumentMetadata,
    #[serde(flatten)]
    pub file: FileFacts,
}

/// Output of the upload pipeline: the merged record and its rendered prompt context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedDocument {
    pub metadata: UploadMetadata,
    pub prompt_context: String,
}
