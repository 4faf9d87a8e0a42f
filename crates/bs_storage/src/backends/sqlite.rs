use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tokio::sync::OnceCell;
use bs_core::{DocumentRecord, DocumentStore, Error, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://summariser.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS blogs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_blogs_url ON blogs (url)
    "#,
    // Add future migrations here
];

/// Document store on SQLite. The pool is opened on first use and then
/// shared by every request for the lifetime of the store.
pub struct SQLiteDocumentStore {
    database_url: String,
    db_path: Option<PathBuf>,
    pool: OnceCell<SqlitePool>,
    connects: AtomicUsize,
}

impl SQLiteDocumentStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_path: None,
            pool: OnceCell::new(),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn new_with_path(db_path: &Path) -> Self {
        let mut store = Self::new(format!("sqlite://{}", db_path.display()));
        store.db_path = Some(db_path.to_path_buf());
        store
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    async fn pool(&self) -> Result<&SqlitePool> {
        self.pool.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<SqlitePool> {
        if let Some(parent) = self.db_path.as_deref().and_then(Path::parent) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&self.database_url)
            .map_err(|e| Error::Database(format!("Invalid database URL {}: {}", self.database_url, e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        self.connects.fetch_add(1, Ordering::SeqCst);
        tracing::info!("🏦 Connected to document store at {}", self.database_url);
        Ok(pool)
    }

    pub async fn find_by_url(&self, url: &str) -> Result<Vec<DocumentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT url, content, created_at FROM blogs
            WHERE url = ?
            ORDER BY id ASC
            "#,
        )
        .bind(url)
        .fetch_all(self.pool().await?)
        .await
        .map_err(|e| Error::Database(format!("Failed to load documents: {}", e)))?;

        rows.into_iter()
            .map(|row| {
                let created_at: String = row.get("created_at");
                Ok(DocumentRecord {
                    url: row.get("url"),
                    content: row.get("content"),
                    created_at: DateTime::parse_from_rfc3339(&created_at)
                        .map_err(|e| Error::Database(format!("Failed to parse date: {}", e)))?
                        .with_timezone(&Utc),
                })
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for SQLiteDocumentStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn ensure_connected(&self) -> Result<()> {
        self.pool().await.map(|_| ())
    }

    async fn insert_document(&self, record: &DocumentRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blogs (url, content, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.url)
        .bind(&record.content)
        .bind(record.created_at.to_rfc3339())
        .execute(self.pool().await?)
        .await
        .map_err(|e| Error::Database(format!("Failed to store document: {}", e)))?;

        Ok(())
    }
}
