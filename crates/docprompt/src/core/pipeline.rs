//! Upload processing pipeline.
//!
//! Bytes are persisted to a uniquely named temporary file, sniffed, checked
//! against the allow-list, dispatched, merged with the file facts and rendered.
//! The temporary file is removed when it goes out of scope, on every path.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::config::ExtractionConfig;
use crate::core::dispatch::Dispatcher;
use crate::core::mime::{SupportedTypes, detect_mime_type};
use crate::core::prompt::render_prompt_context;
use crate::error::{DocPromptError, Result};
use crate::types::{FileFacts, ProcessedDocument, UploadMetadata};

const TEMP_FILE_PREFIX: &str = "docprompt-";

/// Process one uploaded document with the stock extractors.
///
/// This is blocking; async callers should run it on a blocking thread.
///
/// # Errors
///
/// - `DocPromptError::Validation` if the filename is empty
/// - `DocPromptError::UnsupportedFormat` if the sniffed type is not allowed
/// - `DocPromptError::Io` if the temporary copy can't be written
/// - PDF failures when `pdf.fail_on_error` is set
pub fn process_upload(
    filename: &str,
    bytes: &[u8],
    config: &ExtractionConfig,
    supported: &SupportedTypes,
) -> Result<ProcessedDocument> {
    process_upload_with(&Dispatcher::default(), filename, bytes, config, supported)
}

/// Like [`process_upload`], with a caller-provided dispatcher.
pub fn process_upload_with(
    dispatcher: &Dispatcher,
    filename: &str,
    bytes: &[u8],
    config: &ExtractionConfig,
    supported: &SupportedTypes,
) -> Result<ProcessedDocument> {
    if filename.is_empty() {
        return Err(DocPromptError::validation("No file provided"));
    }

    let file_extension = file_extension(filename);

    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_FILE_PREFIX).suffix(&file_extension);
    let mut temp_file = match &config.temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    temp_file.write_all(bytes)?;
    temp_file.flush()?;

    info!("Processing upload {} ({} bytes)", filename, bytes.len());

    let mime_type = detect_mime_type(temp_file.path())?;
    debug!("Detected {} for {}", mime_type, filename);
    supported.validate(&mime_type)?;

    let document = dispatcher.extract(temp_file.path(), &mime_type, config)?;
    let prompt_context = render_prompt_context(&document);

    release(temp_file);

    Ok(ProcessedDocument {
        metadata: UploadMetadata {
            document,
            file: FileFacts {
                filename: filename.to_string(),
                file_size: bytes.len(),
                mime_type,
                file_extension,
            },
        },
        prompt_context,
    })
}

/// Process a document from local storage, using its file name as the upload name.
pub fn process_file(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
    supported: &SupportedTypes,
) -> Result<ProcessedDocument> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DocPromptError::validation(format!("Invalid file name: {}", path.display())))?;

    process_upload(filename, &bytes, config, supported)
}

/// Extension of `filename` with its leading dot, or empty when it has none.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

fn release(temp_file: NamedTempFile) {
    if let Err(e) = temp_file.close() {
        debug!("Failed to remove temporary upload: {}", e);
    }
}
