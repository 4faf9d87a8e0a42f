pub mod memory;
pub mod supabase;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::{MemoryDocumentStore, MemorySummaryStore};
pub use supabase::SupabaseSummaryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteDocumentStore;
