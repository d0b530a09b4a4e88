//! Image metadata extraction.
//!
//! Only the image header is decoded: dimensions and color type come from the
//! decoder without reading pixel data.

use image::{ColorType, ImageDecoder, ImageReader};
use std::path::Path;

use crate::error::{DocPromptError, Result};
use crate::types::{DocumentMetadata, DocumentType, FormatMetadata, ImageMetadata};

/// Read dimensions, declared format and color mode of an image.
///
/// # Errors
///
/// Returns `DocPromptError::Parsing` if the format is unknown or the header
/// can't be decoded, `DocPromptError::Io` if the file can't be read.
pub fn extract_image_metadata(path: &Path) -> Result<DocumentMetadata> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;

    let format = reader
        .format()
        .ok_or_else(|| DocPromptError::parsing("Could not determine image format"))?;
    let format_str = format!("{:?}", format).to_uppercase();

    let decoder = reader
        .into_decoder()
        .map_err(|e| DocPromptError::parsing(format!("Failed to decode image: {}", e)))?;
    let (width, height) = decoder.dimensions();
    let mode = color_mode(decoder.color_type());

    Ok(DocumentMetadata {
        document_type: DocumentType::Image,
        page_count: 1,
        text_preview: format!("Image file ({}, {}x{}, {})", format_str, width, height, mode),
        tables_count: 0,
        images_count: 1,
        structure_elements: vec!["Image".to_string()],
        format: Some(FormatMetadata::Image(ImageMetadata {
            dimensions: format!("{}x{}", width, height),
            format: format_str,
            mode,
        })),
        error: None,
    })
}

/// Conventional short name for a color layout, e.g. `RGB` or `L` for grayscale.
fn color_mode(color_type: ColorType) -> String {
    match color_type {
        ColorType::L8 => "L".to_string(),
        ColorType::La8 | ColorType::La16 => "LA".to_string(),
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB".to_string(),
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA".to_string(),
        ColorType::L16 => "I;16".to_string(),
        other => format!("{:?}", other),
    }
}
