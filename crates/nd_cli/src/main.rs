use std::fs;
use std::path::Path;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use nd_core::{ArticleStorage, InferenceModel, RawArticle};
use nd_ingest::Pipeline;
use nd_scrapers::{BackendClient, Scraper, ScraperManager};
use nd_web::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{Cli, Commands, RuntimeArgs};

async fn open_storage(runtime: &RuntimeArgs) -> anyhow::Result<Arc<dyn ArticleStorage>> {
    let storage = nd_storage::create_storage(runtime.storage, &runtime.data_file).await?;
    info!("💾 Storage ready ({:?}, {})", runtime.storage, runtime.data_file.display());
    Ok(storage)
}

async fn build_pipeline(runtime: &RuntimeArgs) -> anyhow::Result<Pipeline> {
    let storage = open_storage(runtime).await?;
    let inference = nd_inference::create_model(runtime.model, runtime.inference_config()?)?;
    info!("🧠 Inference model initialized (using {})", inference.name());
    Ok(Pipeline::new(inference, storage).with_concurrency(runtime.concurrency))
}

fn read_batch(path: &Path) -> anyhow::Result<Vec<RawArticle>> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let pipeline = build_pipeline(&cli.runtime).await?;
            nd_web::serve(bind, AppState::new(pipeline)).await?;
        }
        Commands::Scrape { backend_url, sources } => {
            let mut manager = ScraperManager::new()?;
            if !sources.is_empty() {
                manager.retain(&sources)?;
            }
            let names: Vec<&str> = manager.scrapers().iter().map(|s| s.source()).collect();
            info!("🦗 Scraping {}", names.join(", "));

            let backend = BackendClient::new(backend_url)?;
            if let Some(report) = manager.run(&backend).await? {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Ingest { file } => {
            let batch = read_batch(&file)?;
            let pipeline = build_pipeline(&cli.runtime).await?;
            let outcome = pipeline.ingest(batch).await?;
            for failure in &outcome.failures {
                warn!("🚨 {} ({}): {}", failure.url, failure.source, failure.error);
            }
            println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        }
        Commands::List { limit } => {
            let storage = open_storage(&cli.runtime).await?;
            let articles = storage.list(limit).await?;
            println!("{}", serde_json::to_string_pretty(&articles)?);
        }
    }

    Ok(())
}
