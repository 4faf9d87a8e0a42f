use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use bs_inference::{RetryPolicy, SummaryPipeline};
use bs_scraper::{init_logging, ExtractionFailurePolicy, HttpFetcher, SummaryManager};
use bs_storage::BackendConfig;
use bs_web::{AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarise blog posts in English and Urdu", long_about = None)]
pub struct Cli {
    #[arg(long, default_value = "openrouter", help = "Completion backend to use. Available models: openrouter (default), dummy")]
    model: String,
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Remote model identifier, e.g. google/gemma-3-27b-it:free
    #[arg(long, env = "OPENROUTER_MODEL")]
    model_id: Option<String>,
    #[arg(long, env = "OPENROUTER_BASE_URL")]
    base_url: Option<String>,
    #[arg(long, default_value = "memory", help = "Where Urdu summaries go: memory, supabase")]
    summary_store: String,
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    supabase_key: Option<String>,
    #[arg(long, default_value = "sqlite", help = "Where scraped content goes: memory, sqlite")]
    document_store: String,
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// What to do when a page yields no usable text: degrade or abort
    #[arg(long, default_value = "degrade")]
    extraction_policy: ExtractionFailurePolicy,
    /// Seconds to wait before restarting after a rate limit or outage
    #[arg(long, default_value_t = 3)]
    retry_backoff: u64,
    #[arg(long, default_value_t = 1)]
    max_retries: u32,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
        /// Return underlying error messages instead of a generic one
        #[arg(long, env = "VERBOSE_ERRORS")]
        verbose_errors: bool,
    },
    /// Summarise a single URL and print the result as JSON
    Summarise {
        url: String,
    },
}

impl Cli {
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            backoff: Duration::from_secs(self.retry_backoff),
            max_retries: self.max_retries,
        }
    }

    fn inference_config(&self) -> bs_inference::Config {
        bs_inference::Config {
            api_key: self.api_key.clone(),
            model_name: Some(self.model.clone()),
            model_id: self.model_id.clone(),
            base_url: self.base_url.clone(),
            retry: self.retry_policy(),
        }
    }

    fn summary_backend(&self) -> BackendConfig {
        BackendConfig {
            url: self.supabase_url.clone(),
            api_key: self.supabase_key.clone(),
            table: None,
        }
    }

    fn document_backend(&self) -> BackendConfig {
        BackendConfig {
            url: self.database_url.clone(),
            ..BackendConfig::default()
        }
    }
}

fn build_manager(cli: &Cli) -> anyhow::Result<SummaryManager> {
    let config = cli.inference_config();
    let retry = config.retry;
    let model = bs_inference::create_model(Some(config))?;
    info!("🧠 Inference model initialized successfully (using {})", model.name());

    let summaries = bs_storage::create_summary_store(&cli.summary_store, &cli.summary_backend())?;
    let documents = bs_storage::create_document_store(&cli.document_store, &cli.document_backend())?;
    info!("🏦 Storage initialized (summaries: {}, documents: {})", summaries.name(), documents.name());

    let manager = SummaryManager::new(
        Arc::new(HttpFetcher::new()?),
        SummaryPipeline::new(model, retry),
        summaries,
        documents,
    )
    .with_policy(cli.extraction_policy);
    Ok(manager)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();
    init_logging("info");
    let cli = Cli::parse();

    let manager = build_manager(&cli)?;

    match cli.command {
        Commands::Serve { bind, verbose_errors } => {
            let config = ServerConfig {
                bind,
                verbose_errors,
                extraction_policy: cli.extraction_policy,
            };
            bs_web::serve(AppState::new(manager, config)).await?;
        }
        Commands::Summarise { url } => {
            let result = manager.summarise_url(&url).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
