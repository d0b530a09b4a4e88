//! Format-specific extraction routines.
//!
//! Each routine inspects a bounded prefix of one document family and builds a
//! [`DocumentMetadata`](crate::types::DocumentMetadata). Fault containment is
//! not done here: routines return `Err` and the dispatcher turns failures into
//! placeholder records.

pub mod docx;
pub mod excel;
pub mod image;
pub mod pdf;
pub mod text;

pub use docx::extract_docx_metadata;
pub use excel::{
    CalamineAutoReader, CalamineTypedReader, SpreadsheetExtractor, SpreadsheetTranscript, WorkbookReader,
    WorkbookSource,
};
pub use image::extract_image_metadata;
pub use pdf::extract_pdf_metadata;
pub use text::extract_text_metadata;
