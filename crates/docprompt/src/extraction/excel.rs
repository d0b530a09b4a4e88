//! Spreadsheet extraction using calamine.
//!
//! Extraction is two-tiered. The primary reader opens the workbook from disk,
//! letting calamine pick the format from the file extension, and writes a full
//! per-sheet transcript (columns, leading rows, row count). If it fails for any
//! reason the fallback reader reopens the in-memory bytes with the format chosen
//! from the sniffed MIME type and writes a shorter transcript of non-empty rows.
//! Only when both fail does the record carry an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use docprompt::core::config::ReadLimits;
//! use docprompt::extraction::excel::SpreadsheetExtractor;
//! use std::path::Path;
//!
//! let extractor = SpreadsheetExtractor::default();
//! let metadata = extractor.extract(
//!     Path::new("data.xlsx"),
//!     "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
//!     &ReadLimits::default(),
//! );
//! println!("{}", metadata.text_preview);
//! ```
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::fmt::{Display, Write as FmtWrite};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

use crate::core::config::ReadLimits;
use crate::core::mime::{EXCEL_BINARY_MIME_TYPE, EXCEL_MIME_TYPE};
use crate::error::{DocPromptError, Result};
use crate::text::truncate_preview;
use crate::types::{DocumentMetadata, DocumentType, FormatMetadata, SpreadsheetMetadata};

/// Marker reported in `sheet_names` when no reader could open the workbook.
pub const ERROR_SHEET_MARKER: &str = "Error";

/// Where a workbook comes from.
#[derive(Debug, Clone, Copy)]
pub struct WorkbookSource<'a> {
    pub path: &'a Path,
    /// Type sniffed from the content
    pub mime_type: &'a str,
}

/// Text rendering of a workbook produced by a [`WorkbookReader`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetTranscript {
    /// All sheet names in the workbook, not only the inspected ones
    pub sheet_names: Vec<String>,
    pub content: String,
    pub total_rows: usize,
}

/// One strategy for turning a workbook into a transcript.
pub trait WorkbookReader: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn read(&self, source: &WorkbookSource<'_>, limits: &ReadLimits) -> Result<SpreadsheetTranscript>;
}

/// Primary reader: calamine's auto-detection on the file path.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineAutoReader;

impl WorkbookReader for CalamineAutoReader {
    fn name(&self) -> &'static str {
        "calamine-auto"
    }

    fn read(&self, source: &WorkbookSource<'_>, limits: &ReadLimits) -> Result<SpreadsheetTranscript> {
        let mut workbook = open_workbook_auto(source.path)?;
        Ok(write_full_transcript(&mut workbook, limits))
    }
}

/// Fallback reader: a typed calamine reader over the file bytes, chosen from
/// the sniffed MIME type rather than the file name.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineTypedReader;

impl WorkbookReader for CalamineTypedReader {
    fn name(&self) -> &'static str {
        "calamine-typed"
    }

    fn read(&self, source: &WorkbookSource<'_>, limits: &ReadLimits) -> Result<SpreadsheetTranscript> {
        let bytes = std::fs::read(source.path)?;
        let mut workbook = open_by_mime(Cursor::new(bytes), source.mime_type)?;
        Ok(write_compact_transcript(&mut workbook, limits))
    }
}

fn open_by_mime<RS>(reader: RS, mime_type: &str) -> Result<Sheets<RS>>
where
    RS: Read + Seek + Clone,
{
    match mime_type {
        EXCEL_MIME_TYPE => calamine::Xlsx::new(reader)
            .map(Sheets::Xlsx)
            .map_err(|e| DocPromptError::parsing(format!("Failed to parse XLSX: {}", e))),
        EXCEL_BINARY_MIME_TYPE => calamine::Xls::new(reader)
            .map(Sheets::Xls)
            .map_err(|e| DocPromptError::parsing(format!("Failed to parse XLS: {}", e))),
        _ => Ok(open_workbook_auto_from_rs(reader)?),
    }
}

/// Spreadsheet extractor with primary/fallback failover.
pub struct SpreadsheetExtractor {
    primary: Box<dyn WorkbookReader>,
    fallback: Box<dyn WorkbookReader>,
}

impl Default for SpreadsheetExtractor {
    fn default() -> Self {
        Self::new(Box::new(CalamineAutoReader), Box::new(CalamineTypedReader))
    }
}

impl std::fmt::Debug for SpreadsheetExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadsheetExtractor")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl SpreadsheetExtractor {
    pub fn new(primary: Box<dyn WorkbookReader>, fallback: Box<dyn WorkbookReader>) -> Self {
        Self { primary, fallback }
    }

    /// Extract spreadsheet metadata. Never fails: when both readers fail the
    /// transcript holds the two error messages and `error` is set.
    pub fn extract(&self, path: &Path, mime_type: &str, limits: &ReadLimits) -> DocumentMetadata {
        let source = WorkbookSource { path, mime_type };

        let (transcript, error) = match self.primary.read(&source, limits) {
            Ok(transcript) => (transcript, None),
            Err(primary_err) => {
                warn!(
                    "Spreadsheet reader {} failed, retrying with {}: {}",
                    self.primary.name(),
                    self.fallback.name(),
                    primary_err
                );
                match self.fallback.read(&source, limits) {
                    Ok(transcript) => (transcript, None),
                    Err(fallback_err) => {
                        let message = format!("{} / {}", primary_err, fallback_err);
                        let transcript = SpreadsheetTranscript {
                            sheet_names: vec![ERROR_SHEET_MARKER.to_string()],
                            content: format!("Error processing spreadsheet: {}", message),
                            total_rows: 0,
                        };
                        (transcript, Some(message))
                    }
                }
            }
        };

        debug!(
            "Spreadsheet transcript: {} sheets, {} rows, {} chars",
            transcript.sheet_names.len(),
            transcript.total_rows,
            transcript.content.len()
        );

        let sheet_count = transcript.sheet_names.len();

        DocumentMetadata {
            document_type: DocumentType::Spreadsheet,
            page_count: sheet_count,
            text_preview: truncate_preview(&transcript.content, limits.spreadsheet_preview_chars).into_owned(),
            tables_count: sheet_count,
            images_count: 0,
            structure_elements: vec![
                "Spreadsheet".to_string(),
                "Worksheets".to_string(),
                "Data".to_string(),
            ],
            format: Some(FormatMetadata::Spreadsheet(SpreadsheetMetadata {
                sheet_names: transcript.sheet_names,
                total_rows: transcript.total_rows,
                full_content: transcript.content,
            })),
            error,
        }
    }
}

/// Transcript with a header line, a columns line and numbered leading rows per sheet.
fn write_full_transcript<RS, R>(workbook: &mut R, limits: &ReadLimits) -> SpreadsheetTranscript
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let sheet_names = workbook.sheet_names();
    let mut content = String::new();
    let mut total_rows = 0;

    for name in sheet_names.iter().take(limits.spreadsheet_max_sheets) {
        write!(content, "\n=== SHEET: {} ===\n", name).unwrap();

        let range = match workbook.worksheet_range(name) {
            Ok(range) => range,
            Err(e) => {
                write!(content, "Error reading sheet: {}\n", e).unwrap();
                continue;
            }
        };

        let mut rows = range.rows();
        let columns = rows.next().map(column_labels).unwrap_or_default();
        let data_rows: Vec<&[Data]> = rows.take(limits.spreadsheet_max_rows).collect();
        total_rows += data_rows.len();

        content.push_str("COLUMNS: ");
        content.push_str(&columns.join(" | "));
        content.push_str("\n\n");

        for (idx, row) in data_rows.iter().take(limits.spreadsheet_transcript_rows).enumerate() {
            write!(content, "Row {}: ", idx + 1).unwrap();
            write_row(&mut content, row, row.len());
            content.push('\n');
        }

        write!(content, "\n[{} rows in this sheet]\n", data_rows.len()).unwrap();
    }

    SpreadsheetTranscript {
        sheet_names,
        content,
        total_rows,
    }
}

/// Transcript of non-empty leading rows per sheet, bounded in rows and columns.
fn write_compact_transcript<RS, R>(workbook: &mut R, limits: &ReadLimits) -> SpreadsheetTranscript
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let sheet_names = workbook.sheet_names();
    let mut content = String::new();
    let mut total_rows = 0;

    for name in sheet_names.iter().take(limits.fallback_max_sheets) {
        write!(content, "\n=== SHEET: {} ===\n", name).unwrap();

        let range: Range<Data> = match workbook.worksheet_range(name) {
            Ok(range) => range,
            Err(e) => {
                debug!("Skipping unreadable sheet {}: {}", name, e);
                Range::empty()
            }
        };

        let kept: Vec<String> = range
            .rows()
            .take(limits.fallback_max_rows)
            .filter(|row| row.iter().take(limits.fallback_max_columns).any(|cell| !is_blank(cell)))
            .take(limits.fallback_kept_rows)
            .map(|row| {
                let mut line = String::new();
                write_row(&mut line, row, limits.fallback_max_columns);
                line
            })
            .collect();
        total_rows += kept.len();

        content.push_str(&kept.join("\n"));
        write!(content, "\n\n[Sheet {} processed]\n", name).unwrap();
    }

    SpreadsheetTranscript {
        sheet_names,
        content,
        total_rows,
    }
}

fn column_labels(header: &[Data]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            if is_blank(cell) {
                format!("Unnamed: {}", idx)
            } else {
                let mut label = String::new();
                format_cell_value_into(&mut label, cell);
                label
            }
        })
        .collect()
}

#[inline]
fn write_row(buffer: &mut String, row: &[Data], max_columns: usize) {
    for (i, cell) in row.iter().take(max_columns).enumerate() {
        if i > 0 {
            buffer.push_str(" | ");
        }
        format_cell_value_into(buffer, cell);
    }
}

#[inline]
fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[inline]
fn format_cell_value_into(buffer: &mut String, data: &Data) {
    match data {
        Data::Empty => {}
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => buffer.push_str(s),
        // whole numbers print without a fractional part, e.g. 12 rather than 12.0
        Data::Float(f) => {
            write!(buffer, "{}", f).unwrap();
        }
        Data::Int(i) => {
            write!(buffer, "{}", i).unwrap();
        }
        Data::Bool(b) => {
            buffer.push_str(if *b { "True" } else { "False" });
        }
        Data::DateTime(dt) => {
            if let Some(datetime) = dt.as_datetime() {
                write!(buffer, "{}", datetime.format("%Y-%m-%d %H:%M:%S")).unwrap();
            } else {
                write!(buffer, "{}", dt.as_f64()).unwrap();
            }
        }
        Data::Error(e) => {
            write!(buffer, "#{:?}", e).unwrap();
        }
    }
}
