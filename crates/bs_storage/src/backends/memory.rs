use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use tokio::sync::{OnceCell, RwLock};
use bs_core::{DocumentRecord, DocumentStore, Result, SummaryRecord, SummaryStore};

#[derive(Debug, Default)]
pub struct MemorySummaryStore {
    records: RwLock<Vec<SummaryRecord>>,
}

impl MemorySummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<SummaryRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl SummaryStore for MemorySummaryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert_summary(&self, record: &SummaryRecord) -> Result<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }
}

/// Document store kept in process memory. "Connecting" only flips a flag,
/// but goes through the same connect-once path as the real backends.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    connection: OnceCell<()>,
    connects: AtomicUsize,
    records: RwLock<Vec<DocumentRecord>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// How many times a connection was actually established
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub async fn records(&self) -> Vec<DocumentRecord> {
        self.records.read().await.clone()
    }

    pub async fn find_by_url(&self, url: &str) -> Vec<DocumentRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| record.url == url)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn ensure_connected(&self) -> Result<()> {
        self.connection
            .get_or_init(|| async {
                self.connects.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        Ok(())
    }

    async fn insert_document(&self, record: &DocumentRecord) -> Result<()> {
        self.ensure_connected().await?;
        self.records.write().await.push(record.clone());
        Ok(())
    }
}
