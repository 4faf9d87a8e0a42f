use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use bs_core::{Error, Result, SummaryRecord, SummaryStore};
use crate::BackendConfig;

pub const DEFAULT_TABLE: &str = "summriser";

/// Inserts summaries through Supabase's PostgREST endpoint.
pub struct SupabaseSummaryStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl fmt::Debug for SupabaseSummaryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseSummaryStore")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}

impl SupabaseSummaryStore {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = config
            .url
            .clone()
            .ok_or_else(|| Error::Storage("Supabase URL is required".to_string()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Storage("Supabase API key is required".to_string()))?;

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table: config.table.clone().unwrap_or_else(|| DEFAULT_TABLE.to_string()),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl SummaryStore for SupabaseSummaryStore {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn insert_summary(&self, record: &SummaryRecord) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::Storage(format!(
            "Supabase insert into {} failed with {}: {}",
            self.table, status, body
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> SupabaseSummaryStore {
        let config = BackendConfig::default()
            .with_url(server.uri())
            .with_api_key("anon-key");
        SupabaseSummaryStore::new(&config).unwrap()
    }

    fn record() -> SummaryRecord {
        SummaryRecord {
            url: "https://blog.test/post".to_string(),
            summary: "خلاصہ".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_posts_row_to_table() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/summriser"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(body_json(json!([{ "url": "https://blog.test/post", "summary": "خلاصہ" }])))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server).insert_summary(&record()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_insert_is_storage_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\":\"Invalid API key\"}"))
            .mount(&server)
            .await;

        let err = store_for(&server).insert_summary(&record()).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn test_requires_key() {
        let config = BackendConfig::default().with_url("https://project.supabase.co");
        let err = SupabaseSummaryStore::new(&config).unwrap_err();
        assert_eq!(err.to_string(), "Storage error: Supabase API key is required");
    }
}
