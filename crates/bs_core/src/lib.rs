pub mod error;
pub mod models;
pub mod storage;
pub mod text;
pub mod types;

pub use error::{CompletionError, Error, ExtractionError, PipelineError, Stage};
pub use models::CompletionBackend;
pub use storage::{DocumentStore, SummaryStore};
pub use text::{truncate, MAX_CHARS};
pub use types::{BoundedText, Document, DocumentRecord, PipelineResult, SummaryPair, SummaryRecord};

pub type Result<T> = std::result::Result<T, Error>;
