//! Plain text extraction.

use std::path::Path;

use crate::core::config::ReadLimits;
use crate::error::Result;
use crate::text::truncate_preview;
use crate::types::{DocumentMetadata, DocumentType, FormatMetadata, TextMetadata};

/// Read a UTF-8 text file and count its lines and characters.
///
/// `\r\n` and lone `\r` line endings are read as `\n` before anything is
/// counted. Lines are counted by splitting on `\n`, so a trailing newline adds
/// an empty final line. Characters are Unicode scalar values.
///
/// # Errors
///
/// Returns `DocPromptError::Io` if the file can't be read or is not valid UTF-8.
pub fn extract_text_metadata(path: &Path, limits: &ReadLimits) -> Result<DocumentMetadata> {
    let content = normalize_newlines(std::fs::read_to_string(path)?);

    let line_count = content.split('\n').count();
    let character_count = content.chars().count();

    Ok(DocumentMetadata {
        document_type: DocumentType::Text,
        page_count: 1,
        text_preview: truncate_preview(&content, limits.preview_chars).into_owned(),
        tables_count: 0,
        images_count: 0,
        structure_elements: vec!["Text".to_string()],
        format: Some(FormatMetadata::Text(TextMetadata {
            line_count,
            character_count,
        })),
        error: None,
    })
}

fn normalize_newlines(content: String) -> String {
    if content.contains('\r') {
        content.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        content
    }
}
