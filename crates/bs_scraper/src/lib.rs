pub mod extractor;
pub mod fetch;
pub mod logging;
pub mod manager;

pub use extractor::{extract, extract_document, extract_text, Extracted};
pub use fetch::{HttpFetcher, PageFetcher, StaticFetcher};
pub use logging::{init_logging, Logger};
pub use manager::{ExtractionFailurePolicy, SummaryManager};

pub mod prelude {
    pub use super::fetch::PageFetcher;
    pub use super::manager::SummaryManager;
    pub use bs_core::{Document, Error, ExtractionError, PipelineResult, Result};
}
