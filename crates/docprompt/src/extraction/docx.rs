//! Word (DOCX) extraction using docx-lite.
//!
//! Paragraph and table counts come from the parsed document. Section count is
//! read straight from `word/document.xml`, where every section ends with a
//! `w:sectPr` element.

use std::io::{Cursor, Read};
use std::path::Path;

use crate::core::config::ReadLimits;
use crate::error::{DocPromptError, Result};
use crate::text::truncate_preview;
use crate::types::{DocumentMetadata, DocumentType, FormatMetadata, WordMetadata};

const SECTION_TAG: &str = "<w:sectPr";

/// Read the leading paragraphs of a Word document and count its parts.
///
/// # Errors
///
/// Returns `DocPromptError::Parsing` if the file is not a readable DOCX package.
/// Legacy binary `.doc` files end up here too and fail the same way.
pub fn extract_docx_metadata(path: &Path, limits: &ReadLimits) -> Result<DocumentMetadata> {
    let bytes = std::fs::read(path)?;

    let doc = docx_lite::parse_document(Cursor::new(&bytes))
        .map_err(|e| DocPromptError::parsing(format!("DOCX parsing failed: {}", e)))?;

    let mut text_content = String::new();
    for paragraph in doc.paragraphs.iter().take(limits.docx_preview_paragraphs) {
        text_content.push_str(&paragraph.to_text());
        text_content.push('\n');
    }

    let tables_count = doc.tables.len();
    let section_count = count_sections(&bytes)?;

    let mut structure_elements = vec!["Document".to_string(), "Paragraphs".to_string()];
    if tables_count > 0 {
        structure_elements.push("Tables".to_string());
    }

    Ok(DocumentMetadata {
        document_type: DocumentType::Document,
        page_count: section_count,
        text_preview: truncate_preview(&text_content, limits.preview_chars).into_owned(),
        tables_count,
        images_count: 0,
        structure_elements,
        format: Some(FormatMetadata::Document(WordMetadata {
            paragraph_count: doc.paragraphs.len(),
        })),
        error: None,
    })
}

/// Number of sections declared in the main document part, at least one.
fn count_sections(bytes: &[u8]) -> Result<usize> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut document_xml)
        .map_err(|e| DocPromptError::parsing(format!("Failed to read document.xml: {}", e)))?;

    let count = document_xml
        .match_indices(SECTION_TAG)
        .filter(|(idx, _)| {
            // skip longer element names such as w:sectPrChange
            matches!(
                document_xml.as_bytes().get(idx + SECTION_TAG.len()),
                Some(b'>') | Some(b' ') | Some(b'/') | Some(b'\n') | Some(b'\r') | Some(b'\t')
            )
        })
        .count();

    Ok(count.max(1))
}
