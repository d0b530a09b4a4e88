//! PDF extraction using lopdf.
//!
//! The whole cross-reference table is loaded to get the page count, but text
//! and embedded images are only read from the leading pages.

use lopdf::{Dictionary, Document};
use std::path::Path;
use tracing::debug;

use crate::core::config::ReadLimits;
use crate::error::Result;
use crate::text::truncate_preview;
use crate::types::{DocumentMetadata, DocumentType, FormatMetadata, PdfMetadata};

/// Read page count, flags, and the text and image counts of the leading pages.
///
/// Text or image failures on a single page are logged and skipped; only a
/// document that can't be loaded at all is an error.
///
/// # Errors
///
/// Returns `DocPromptError::Parsing` if the file is not a loadable PDF or has
/// no document catalog.
pub fn extract_pdf_metadata(path: &Path, limits: &ReadLimits) -> Result<DocumentMetadata> {
    let document = Document::load(path)?;
    let catalog = document.catalog()?;

    let pages = document.get_pages();
    let is_encrypted = document.is_encrypted();
    let has_bookmarks = has_outline_entries(&document, catalog);

    let mut text_content = String::new();
    let mut images_count = 0;

    for (&page_number, &page_id) in pages.iter().take(limits.pdf_preview_pages) {
        match document.extract_text(&[page_number]) {
            Ok(text) => text_content.push_str(&text),
            Err(e) => debug!("Failed to extract text from page {}: {}", page_number, e),
        }

        match document.get_page_images(page_id) {
            Ok(images) => images_count += images.len(),
            Err(e) => debug!("Failed to get images from page {}: {}", page_number, e),
        }
    }

    Ok(DocumentMetadata {
        document_type: DocumentType::Pdf,
        page_count: pages.len(),
        text_preview: truncate_preview(&text_content, limits.preview_chars).into_owned(),
        tables_count: 0,
        images_count,
        structure_elements: vec!["PDF".to_string()],
        format: Some(FormatMetadata::Pdf(PdfMetadata {
            has_bookmarks,
            is_encrypted,
        })),
        error: None,
    })
}

/// Whether the catalog's outline tree has at least one entry.
fn has_outline_entries(document: &Document, catalog: &Dictionary) -> bool {
    let Ok(outlines) = catalog.get(b"Outlines") else {
        return false;
    };

    document
        .dereference(outlines)
        .and_then(|(_, object)| object.as_dict())
        .map(|outline| outline.has(b"First"))
        .unwrap_or(false)
}
