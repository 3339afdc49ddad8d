//! Extraction boundary: typed CSV reading with row validation.

mod metadata;
mod reader;

pub use metadata::SourceMetadata;
pub use reader::{Extractor, ExtractorConfig};
