use std::net::SocketAddr;
use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};
use nd_core::{Error, Result};
use nd_inference::{Config, ModelKind};
use nd_storage::{StorageKind, DEFAULT_DATA_FILE};

#[derive(Parser, Debug)]
#[command(name = "newsdesk", author, version, about = "Scrape, classify, summarize and serve news", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,
    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every command that touches the pipeline or the store.
#[derive(Args, Debug, Clone)]
pub struct RuntimeArgs {
    #[arg(long, env = "NEWSDESK_STORAGE", value_enum, default_value = "json", global = true)]
    pub storage: StorageKind,
    #[arg(long, env = "NEWSDESK_DATA_FILE", default_value = DEFAULT_DATA_FILE, global = true)]
    pub data_file: PathBuf,
    #[arg(long, env = "NEWSDESK_MODEL", value_enum, default_value = "huggingface", global = true)]
    pub model: ModelKind,
    #[arg(long, env = "HF_TOKEN", hide_env_values = true, global = true)]
    pub hf_token: Option<String>,
    /// Repository id of the classification model
    #[arg(long, env = "CLF_REPO", global = true)]
    pub classifier: Option<String>,
    /// Repository id of the summarization model
    #[arg(long, env = "SUM_REPO", global = true)]
    pub summarizer: Option<String>,
    #[arg(long, env = "INFERENCE_BASE_URL", global = true)]
    pub inference_base_url: Option<String>,
    /// Articles enriched at the same time during one ingest
    #[arg(long, env = "NEWSDESK_CONCURRENCY", default_value_t = 1, global = true)]
    pub concurrency: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        #[arg(long, env = "NEWSDESK_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },
    /// Scrape the top story of every source and post them to a backend
    Scrape {
        #[arg(long, env = "NEWSDESK_BACKEND_URL", default_value = "http://localhost:8000")]
        backend_url: String,
        /// Only scrape these sources (e.g. rta, tolonews)
        #[arg(long = "source")]
        sources: Vec<String>,
    },
    /// Run the pipeline locally on a JSON array of raw articles
    Ingest { file: PathBuf },
    /// Print stored articles, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl RuntimeArgs {
    /// Inference settings for the selected model. The hosted model needs a
    /// token and both repository ids.
    pub fn inference_config(&self) -> Result<Option<Config>> {
        if self.model == ModelKind::Dummy {
            return Ok(None);
        }

        let token = required(&self.hf_token, "HF_TOKEN")?;
        let classifier = required(&self.classifier, "CLF_REPO")?;
        let summarizer = required(&self.summarizer, "SUM_REPO")?;

        let mut config = Config::new(token, classifier, summarizer);
        if let Some(base_url) = &self.inference_base_url {
            config = config.with_base_url(base_url.clone());
        }
        Ok(Some(config))
    }
}

fn required<'a>(value: &'a Option<String>, var: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{} must be set to use the huggingface model", var)))
}
