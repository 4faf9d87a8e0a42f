use std::sync::Arc;
use bs_core::{DocumentStore, Error, Result, SummaryStore};

pub mod backends;

pub use backends::*;

/// Connection details shared by the remote backends.
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
}

impl BackendConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

pub fn summary_store_names() -> Vec<&'static str> {
    vec!["memory", "supabase"]
}

pub fn document_store_names() -> Vec<&'static str> {
    let mut names = vec!["memory"];
    if cfg!(feature = "sqlite") {
        names.push("sqlite");
    }
    names
}

pub fn create_summary_store(name: &str, config: &BackendConfig) -> Result<Arc<dyn SummaryStore>> {
    match name {
        "memory" => Ok(Arc::new(MemorySummaryStore::new())),
        "supabase" => Ok(Arc::new(SupabaseSummaryStore::new(config)?)),
        other => Err(Error::Storage(format!(
            "Unknown summary store '{}'. Available: {}",
            other,
            summary_store_names().join(", ")
        ))),
    }
}

/// Build a document store. No connection is opened until first use.
#[cfg_attr(not(feature = "sqlite"), allow(unused_variables))]
pub fn create_document_store(name: &str, config: &BackendConfig) -> Result<Arc<dyn DocumentStore>> {
    match name {
        "memory" => Ok(Arc::new(MemoryDocumentStore::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(SQLiteDocumentStore::new(
            config
                .url
                .clone()
                .unwrap_or_else(|| sqlite::DEFAULT_DATABASE_URL.to_string()),
        ))),
        other => Err(Error::Storage(format!(
            "Unknown document store '{}'. Available: {}",
            other,
            document_store_names().join(", ")
        ))),
    }
}

pub mod prelude {
    pub use super::{create_document_store, create_summary_store, BackendConfig};
    pub use super::backends::*;
}
