//! MIME type detection and validation.
//!
//! Types are sniffed from file content signatures, never from the file name.
//! An unrecognized signature is a normal outcome: the detector still returns a
//! type string and [`SupportedTypes::validate`] decides whether it is accepted.

use crate::{DocPromptError, Result};
use std::path::Path;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const EXCEL_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const EXCEL_BINARY_MIME_TYPE: &str = "application/vnd.ms-excel";
pub const JPEG_MIME_TYPE: &str = "image/jpeg";
pub const PNG_MIME_TYPE: &str = "image/png";
pub const TIFF_MIME_TYPE: &str = "image/tiff";
pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";
pub const LEGACY_WORD_MIME_TYPE: &str = "application/msword";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Reported for content with no signature that is not plain text either.
pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";
/// Reported for zero-length uploads.
pub const EMPTY_MIME_TYPE: &str = "application/x-empty";

const ZIP_MIME_TYPE: &str = "application/zip";

const DEFAULT_SUPPORTED: [&str; 9] = [
    PDF_MIME_TYPE,
    EXCEL_BINARY_MIME_TYPE,
    EXCEL_MIME_TYPE,
    JPEG_MIME_TYPE,
    PNG_MIME_TYPE,
    TIFF_MIME_TYPE,
    PLAIN_TEXT_MIME_TYPE,
    LEGACY_WORD_MIME_TYPE,
    DOCX_MIME_TYPE,
];

/// The allow-list of accepted MIME types.
///
/// Built once and shared read-only; order is preserved so error messages list
/// the types the same way every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedTypes {
    types: Vec<&'static str>,
}

impl Default for SupportedTypes {
    fn default() -> Self {
        Self {
            types: DEFAULT_SUPPORTED.to_vec(),
        }
    }
}

impl SupportedTypes {
    pub fn contains(&self, mime_type: &str) -> bool {
        self.types.contains(&mime_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Check a detected type against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `DocPromptError::UnsupportedFormat` carrying the detected type and
    /// the full allow-list when the type is not accepted.
    pub fn validate(&self, mime_type: &str) -> Result<()> {
        if self.contains(mime_type) {
            return Ok(());
        }

        Err(DocPromptError::UnsupportedFormat {
            mime_type: mime_type.to_string(),
            supported: self.iter().map(str::to_string).collect(),
        })
    }
}

/// Detect the MIME type of a file on disk from its content.
///
/// # Errors
///
/// Returns `DocPromptError::Io` if the file can't be read. An unrecognized
/// signature is not an error.
pub fn detect_mime_type(path: impl AsRef<Path>) -> Result<String> {
    let content = std::fs::read(path.as_ref())?;
    Ok(detect_mime_type_from_bytes(&content))
}

/// Detect a MIME type from raw bytes.
pub fn detect_mime_type_from_bytes(content: &[u8]) -> String {
    if content.is_empty() {
        return EMPTY_MIME_TYPE.to_string();
    }

    if let Some(kind) = infer::get(content) {
        let mime_type = kind.mime_type();
        if mime_type == ZIP_MIME_TYPE {
            return office_mime_type(content).unwrap_or(mime_type).to_string();
        }
        return mime_type.to_string();
    }

    if looks_like_text(content) {
        PLAIN_TEXT_MIME_TYPE.to_string()
    } else {
        OCTET_STREAM_MIME_TYPE.to_string()
    }
}

/// Identify an OOXML package from its central directory.
///
/// Signature sniffing only looks at the leading local headers, so packages whose
/// parts are not stored in the usual order come back as a plain zip.
fn office_mime_type(content: &[u8]) -> Option<&'static str> {
    let archive = zip::ZipArchive::new(std::io::Cursor::new(content)).ok()?;
    archive.file_names().find_map(|name| match name {
        "xl/workbook.xml" => Some(EXCEL_MIME_TYPE),
        "word/document.xml" => Some(DOCX_MIME_TYPE),
        _ => None,
    })
}

/// Text bytes are anything except NUL, DEL and C0 controls other than whitespace.
fn looks_like_text(content: &[u8]) -> bool {
    content.iter().all(|&byte| match byte {
        b'\t' | b'\n' | b'\r' | 0x0C | 0x1B => true,
        0x00..=0x1F | 0x7F => false,
        _ => true,
    })
}
