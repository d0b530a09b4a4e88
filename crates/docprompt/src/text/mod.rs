pub mod preview;

pub use preview::{TRUNCATION_MARKER, truncate_preview};
