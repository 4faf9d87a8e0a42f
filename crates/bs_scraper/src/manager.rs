use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use bs_core::{
    BoundedText, DocumentRecord, DocumentStore, Error, ExtractionError, PipelineResult, Result,
    SummaryRecord, SummaryStore,
};
use bs_inference::SummaryPipeline;
use crate::extractor;
use crate::fetch::PageFetcher;
use crate::logging::Logger;

/// What happens when a page cannot be fetched or has no usable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionFailurePolicy {
    /// Summarise a placeholder describing the failure instead
    #[default]
    Degrade,
    /// Fail the request with the extraction error
    Abort,
}

impl FromStr for ExtractionFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "abort" => Ok(Self::Abort),
            other => Err(format!("Unknown extraction failure policy '{}' (expected degrade or abort)", other)),
        }
    }
}

pub fn placeholder_content(error: &ExtractionError) -> String {
    format!("Failed to scrape blog content. Original error: {}", error)
}

/// Runs one URL through fetch, extraction, summarisation and persistence.
pub struct SummaryManager {
    fetcher: Arc<dyn PageFetcher>,
    pipeline: SummaryPipeline,
    summaries: Arc<dyn SummaryStore>,
    documents: Arc<dyn DocumentStore>,
    policy: ExtractionFailurePolicy,
}

impl fmt::Debug for SummaryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryManager")
            .field("pipeline", &self.pipeline)
            .field("summaries", &self.summaries.name())
            .field("documents", &self.documents.name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl SummaryManager {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        pipeline: SummaryPipeline,
        summaries: Arc<dyn SummaryStore>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            fetcher,
            pipeline,
            summaries,
            documents,
            policy: ExtractionFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ExtractionFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ExtractionFailurePolicy {
        self.policy
    }

    /// Fetch `url` and return its capped text, applying the failure policy.
    pub async fn content_for(&self, url: &str) -> Result<BoundedText> {
        let extracted = match self.fetcher.fetch(url).await {
            Ok(html) => extractor::extract(&html),
            Err(e) => Err(e),
        };

        match (extracted, self.policy) {
            (Ok(text), _) => Ok(text),
            (Err(e), ExtractionFailurePolicy::Degrade) => {
                tracing::warn!("⚠️ Scraping {} failed, using placeholder content: {}", url, e);
                Ok(BoundedText::new(&placeholder_content(&e)))
            }
            (Err(e), ExtractionFailurePolicy::Abort) => Err(Error::Extraction(e)),
        }
    }

    pub async fn summarise_url(&self, url: &str) -> Result<PipelineResult> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidUrl("URL must not be empty".to_string()));
        }

        let log = Logger::new().with_prefix(format!("[{}]", url));
        log.info("🦗 Scraping blog post");
        let content = self.content_for(url).await?;
        log.debug(&format!("📄 {} characters of content", content.chars().count()));

        log.info(&format!("🧠 Summarising with {}", self.pipeline.model_name()));
        let pair = self.pipeline.summarize(&content).await?;

        let result = PipelineResult::new(content, pair);
        self.persist(url, &result, &log).await;
        log.info("✅ Summary ready");
        Ok(result)
    }

    /// Best-effort writes to both stores. Errors are logged, never returned.
    async fn persist(&self, url: &str, result: &PipelineResult, log: &Logger) {
        let summary = SummaryRecord {
            url: url.to_string(),
            summary: result.summary.clone(),
        };
        let document = DocumentRecord::new(url, result.content.clone());

        let store_summary = self.summaries.insert_summary(&summary);
        let store_document = async {
            self.documents.ensure_connected().await?;
            self.documents.insert_document(&document).await
        };
        let (summary_result, document_result) = tokio::join!(store_summary, store_document);

        match summary_result {
            Ok(()) => log.info(&format!("💾 Summary stored in {}", self.summaries.name())),
            Err(e) => log.error(&format!("❌ {} summary insert failed: {}", self.summaries.name(), e)),
        }
        match document_result {
            Ok(()) => log.info(&format!("💾 Content stored in {}", self.documents.name())),
            Err(e) => log.error(&format!("❌ {} document insert failed: {}", self.documents.name(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bs_core::{CompletionError, DocumentRecord, PipelineError};
    use bs_inference::models::ScriptedModel;
    use bs_inference::RetryPolicy;
    use bs_storage::backends::memory::{MemoryDocumentStore, MemorySummaryStore};
    use crate::fetch::StaticFetcher;

    const URL: &str = "https://blog.test/post";

    struct FailingSummaryStore;

    #[async_trait]
    impl SummaryStore for FailingSummaryStore {
        fn name(&self) -> &str {
            "failing"
        }

        async fn insert_summary(&self, _record: &SummaryRecord) -> Result<()> {
            Err(Error::Storage("insert rejected".to_string()))
        }
    }

    /// Fails either on connect or on insert.
    struct FailingDocumentStore {
        connect_fails: bool,
    }

    #[async_trait]
    impl DocumentStore for FailingDocumentStore {
        fn name(&self) -> &str {
            "failing"
        }

        async fn ensure_connected(&self) -> Result<()> {
            if self.connect_fails {
                return Err(Error::Database("connection refused".to_string()));
            }
            Ok(())
        }

        async fn insert_document(&self, _record: &DocumentRecord) -> Result<()> {
            Err(Error::Database("disk full".to_string()))
        }
    }

    fn article_html() -> String {
        let paragraphs: String = (0..35)
            .map(|i| format!("<p>Paragraph {} of a blog post with plenty of words in it.</p>", i))
            .collect();
        format!("<html><body><article>{}</article></body></html>", paragraphs)
    }

    fn replies() -> Vec<std::result::Result<String, CompletionError>> {
        vec![Ok("English summary.".to_string()), Ok("اردو خلاصہ".to_string())]
    }

    struct Fixture {
        manager: SummaryManager,
        model: Arc<ScriptedModel>,
        summaries: Arc<MemorySummaryStore>,
        documents: Arc<MemoryDocumentStore>,
    }

    fn fixture(fetcher: StaticFetcher, model: ScriptedModel) -> Fixture {
        let model = Arc::new(model);
        let summaries = Arc::new(MemorySummaryStore::new());
        let documents = Arc::new(MemoryDocumentStore::new());
        let manager = SummaryManager::new(
            Arc::new(fetcher),
            SummaryPipeline::new(model.clone(), RetryPolicy::default()),
            summaries.clone(),
            documents.clone(),
        );
        Fixture { manager, model, summaries, documents }
    }

    #[tokio::test]
    async fn test_summarise_url_persists_both_records() {
        let f = fixture(StaticFetcher::new().with_page(URL, article_html()), ScriptedModel::new(replies()));

        let result = f.manager.summarise_url(URL).await.unwrap();

        assert!(result.content.starts_with("Paragraph 0 of a blog post"));
        assert_eq!(result.summary_en, "English summary.");
        assert_eq!(result.summary, "اردو خلاصہ");
        assert_eq!(f.model.calls(), 2);

        let summaries = f.summaries.records().await;
        assert_eq!(summaries, vec![SummaryRecord { url: URL.to_string(), summary: "اردو خلاصہ".to_string() }]);
        let documents = f.documents.records().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].content, result.content);
        assert!(f.documents.is_connected());
    }

    #[tokio::test]
    async fn test_summary_store_failure_does_not_fail_request() {
        let model = Arc::new(ScriptedModel::new(replies()));
        let documents = Arc::new(MemoryDocumentStore::new());
        let manager = SummaryManager::new(
            Arc::new(StaticFetcher::new().with_page(URL, article_html())),
            SummaryPipeline::new(model, RetryPolicy::default()),
            Arc::new(FailingSummaryStore),
            documents.clone(),
        );

        let result = manager.summarise_url(URL).await.unwrap();
        assert_eq!(result.summary, "اردو خلاصہ");
        assert_eq!(documents.records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_document_store_failure_does_not_fail_request() {
        for connect_fails in [true, false] {
            let summaries = Arc::new(MemorySummaryStore::new());
            let manager = SummaryManager::new(
                Arc::new(StaticFetcher::new().with_page(URL, article_html())),
                SummaryPipeline::new(Arc::new(ScriptedModel::new(replies())), RetryPolicy::default()),
                summaries.clone(),
                Arc::new(FailingDocumentStore { connect_fails }),
            );

            let result = manager.summarise_url(URL).await.unwrap();
            assert_eq!(result.summary_en, "English summary.");
            assert_eq!(
                summaries.records().await,
                vec![SummaryRecord { url: URL.to_string(), summary: "اردو خلاصہ".to_string() }]
            );
        }
    }

    #[tokio::test]
    async fn test_degrade_policy_summarises_placeholder() {
        let f = fixture(StaticFetcher::new(), ScriptedModel::new(replies()));

        let result = f.manager.summarise_url(URL).await.unwrap();

        assert!(result.content.starts_with("Failed to scrape blog content. Original error: failed to fetch page"));
        assert!(f.model.prompts()[0].contains("Failed to scrape blog content"));
    }

    #[tokio::test]
    async fn test_abort_policy_returns_extraction_error() {
        let thin = "<html><body><p>Too little here to be worth summarising at all.</p></body></html>";
        let f = fixture(StaticFetcher::new().with_page(URL, thin), ScriptedModel::new(replies()));
        let manager = f.manager.with_policy(ExtractionFailurePolicy::Abort);

        let err = manager.summarise_url(URL).await.unwrap_err();

        assert!(matches!(err, Error::Extraction(ExtractionError::InsufficientContent)));
        assert_eq!(f.model.calls(), 0);
        assert!(f.summaries.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_failure_skips_persistence() {
        let f = fixture(
            StaticFetcher::new().with_page(URL, article_html()),
            ScriptedModel::failing(500, 2),
        );

        let err = f.manager.summarise_url(URL).await.unwrap_err();

        assert!(matches!(err, Error::Pipeline(PipelineError::Completion { .. })));
        assert!(f.summaries.records().await.is_empty());
        assert!(f.documents.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected_before_fetching() {
        let f = fixture(StaticFetcher::new(), ScriptedModel::new(replies()));
        let err = f.manager.summarise_url("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert_eq!(f.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_url_is_trimmed_before_fetch_and_store() {
        let f = fixture(StaticFetcher::new().with_page(URL, article_html()), ScriptedModel::new(replies()));

        f.manager.summarise_url(&format!("  {}\n", URL)).await.unwrap();

        assert_eq!(f.summaries.records().await[0].url, URL);
        assert_eq!(f.documents.find_by_url(URL).await.len(), 1);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Degrade".parse::<ExtractionFailurePolicy>(), Ok(ExtractionFailurePolicy::Degrade));
        assert_eq!("abort".parse::<ExtractionFailurePolicy>(), Ok(ExtractionFailurePolicy::Abort));
        assert!("ignore".parse::<ExtractionFailurePolicy>().is_err());
    }
}
