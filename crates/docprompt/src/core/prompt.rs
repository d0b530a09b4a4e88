//! Prompt context rendering.

use indexmap::IndexSet;
use std::fmt::Write as FmtWrite;

use crate::types::DocumentMetadata;

/// Render the fixed-template summary handed to a language model.
///
/// Structure elements are de-duplicated keeping first-seen order. The content
/// section is the full spreadsheet transcript when there is one, otherwise the
/// bounded preview.
pub fn render_prompt_context(metadata: &DocumentMetadata) -> String {
    let structure: IndexSet<&str> = metadata.structure_elements.iter().map(String::as_str).collect();
    let structure = structure.into_iter().collect::<Vec<_>>().join(", ");

    let content = metadata.full_content().unwrap_or(metadata.text_preview.as_str());

    let mut prompt = String::with_capacity(128 + content.len());
    write!(
        prompt,
        "Document Analysis:\n- Type: {}\n- Pages: {}\n- Tables: {}\n- Images: {}\n- Structure: {}\n\nContent:\n{}",
        metadata.document_type,
        metadata.page_count,
        metadata.tables_count,
        metadata.images_count,
        structure,
        content
    )
    .unwrap();
    prompt
}
