//! Configuration loading and management.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock read bounds. Configuration can be loaded from TOML, YAML or JSON, or
//! discovered by walking up from the current directory.

use crate::{DocPromptError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the file looked up by [`ExtractionConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "docprompt.toml";

/// Main extraction configuration.
///
/// # Example
///
/// ```rust
/// use docprompt::core::config::ExtractionConfig;
///
/// let config = ExtractionConfig::default();
/// assert_eq!(config.limits.preview_chars, 500);
///
/// // let config = ExtractionConfig::from_toml_file("docprompt.toml")?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Bounded-prefix sizes used by the extractors
    #[serde(default)]
    pub limits: ReadLimits,

    /// PDF-specific behavior
    #[serde(default)]
    pub pdf: PdfConfig,

    /// Directory for temporary upload copies, the system default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

/// How much of each document is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadLimits {
    /// Leading pages read for text and image counts
    #[serde(default = "default_pdf_preview_pages")]
    pub pdf_preview_pages: usize,

    /// Preview bound for PDF, Word and text documents
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    #[serde(default = "default_spreadsheet_preview_chars")]
    pub spreadsheet_preview_chars: usize,

    #[serde(default = "default_spreadsheet_max_sheets")]
    pub spreadsheet_max_sheets: usize,

    /// Data rows read per sheet, not counting the header row
    #[serde(default = "default_spreadsheet_max_rows")]
    pub spreadsheet_max_rows: usize,

    /// Data rows written to the transcript per sheet
    #[serde(default = "default_spreadsheet_transcript_rows")]
    pub spreadsheet_transcript_rows: usize,

    #[serde(default = "default_fallback_max_sheets")]
    pub fallback_max_sheets: usize,

    #[serde(default = "default_fallback_max_rows")]
    pub fallback_max_rows: usize,

    #[serde(default = "default_fallback_max_columns")]
    pub fallback_max_columns: usize,

    /// Non-empty rows kept per sheet by the fallback reader
    #[serde(default = "default_fallback_kept_rows")]
    pub fallback_kept_rows: usize,

    #[serde(default = "default_docx_preview_paragraphs")]
    pub docx_preview_paragraphs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Surface PDF failures as request errors instead of placeholder records
    #[serde(default)]
    pub fail_on_error: bool,
}

fn default_pdf_preview_pages() -> usize {
    3
}
fn default_preview_chars() -> usize {
    500
}
fn default_spreadsheet_preview_chars() -> usize {
    1500
}
fn default_spreadsheet_max_sheets() -> usize {
    3
}
fn default_spreadsheet_max_rows() -> usize {
    100
}
fn default_spreadsheet_transcript_rows() -> usize {
    20
}
fn default_fallback_max_sheets() -> usize {
    2
}
fn default_fallback_max_rows() -> usize {
    50
}
fn default_fallback_max_columns() -> usize {
    20
}
fn default_fallback_kept_rows() -> usize {
    30
}
fn default_docx_preview_paragraphs() -> usize {
    10
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            pdf_preview_pages: default_pdf_preview_pages(),
            preview_chars: default_preview_chars(),
            spreadsheet_preview_chars: default_spreadsheet_preview_chars(),
            spreadsheet_max_sheets: default_spreadsheet_max_sheets(),
            spreadsheet_max_rows: default_spreadsheet_max_rows(),
            spreadsheet_transcript_rows: default_spreadsheet_transcript_rows(),
            fallback_max_sheets: default_fallback_max_sheets(),
            fallback_max_rows: default_fallback_max_rows(),
            fallback_max_columns: default_fallback_max_columns(),
            fallback_kept_rows: default_fallback_kept_rows(),
            docx_preview_paragraphs: default_docx_preview_paragraphs(),
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `DocPromptError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| DocPromptError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| DocPromptError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_json::from_str(&content)
            .map_err(|e| DocPromptError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, picking the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(DocPromptError::validation(format!(
                "Unsupported config file format: {}. Use .toml, .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    /// Discover `docprompt.toml` in the current directory or any parent.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(DocPromptError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| DocPromptError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
