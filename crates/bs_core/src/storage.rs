use async_trait::async_trait;
use crate::types::{DocumentRecord, SummaryRecord};
use crate::Result;

#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Name of the backend, for log lines
    fn name(&self) -> &str;

    /// Insert a summary row. Rows are never updated.
    async fn insert_summary(&self, record: &SummaryRecord) -> Result<()>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the backend, for log lines
    fn name(&self) -> &str;

    /// Establish the backing connection if it does not exist yet.
    /// Calling this again once connected is a no-op.
    async fn ensure_connected(&self) -> Result<()>;

    /// Store the fetched content of a page
    async fn insert_document(&self, record: &DocumentRecord) -> Result<()>;
}
