pub mod output_manager;
pub mod preview_extractor;

pub use output_manager::{ConfigSnapshot, ExtractionReport, ExtractionSummary, OutputManager};
pub use preview_extractor::{ExtractionProgress, FileReport, PreviewExtractor, SkipNotice};
