use std::sync::Arc;
use nd_core::{Error, RawArticle, Result};
use nd_ingest::IngestReport;
use tracing::{info, warn};
use crate::backend::BackendClient;
use crate::fetch::Fetcher;
use crate::scrapers::{afghanistan, Scraper};

pub struct ScraperManager {
    scrapers: Vec<Box<dyn Scraper>>,
}

impl ScraperManager {
    /// A manager over every built-in source.
    pub fn new() -> Result<Self> {
        let fetcher = Arc::new(Fetcher::new()?);
        Ok(Self::with_scrapers(afghanistan::get_scrapers(fetcher)))
    }

    pub fn with_scrapers(scrapers: Vec<Box<dyn Scraper>>) -> Self {
        Self { scrapers }
    }

    pub fn scrapers(&self) -> &[Box<dyn Scraper>] {
        &self.scrapers
    }

    /// Keeps only the scrapers whose CLI name is listed. Fails without
    /// dropping anything when a name matches no scraper.
    pub fn retain(&mut self, cli_names: &[String]) -> Result<()> {
        let unknown: Vec<&str> = cli_names
            .iter()
            .map(String::as_str)
            .filter(|name| !self.scrapers.iter().any(|scraper| scraper.cli_name() == *name))
            .collect();
        if !unknown.is_empty() {
            let known: Vec<&str> = self.scrapers.iter().map(|scraper| scraper.cli_name()).collect();
            return Err(Error::Config(format!(
                "Unknown source(s): {}. Available: {}",
                unknown.join(", "),
                known.join(", ")
            )));
        }

        self.scrapers
            .retain(|scraper| cli_names.iter().any(|name| name == scraper.cli_name()));
        Ok(())
    }

    async fn scrape_one(scraper: &dyn Scraper) -> Result<RawArticle> {
        let link = scraper.top_link().await?;
        scraper.scrape_article(&link).await
    }

    /// Scrapes the top story of every source in order. Failing sources are
    /// logged and skipped.
    pub async fn scrape_all(&self) -> Vec<RawArticle> {
        let mut collected = Vec::with_capacity(self.scrapers.len());
        for scraper in &self.scrapers {
            match Self::scrape_one(scraper.as_ref()).await {
                Ok(article) => {
                    info!("✔ scraped {}", scraper.source());
                    collected.push(article);
                }
                Err(e) => warn!("✖ {}: {}", scraper.source(), e),
            }
        }
        collected
    }

    /// Scrapes every source and posts the batch. Returns `None` when nothing
    /// could be scraped.
    pub async fn run(&self, backend: &BackendClient) -> Result<Option<IngestReport>> {
        let collected = self.scrape_all().await;
        if collected.is_empty() {
            warn!("Nothing scraped; aborting.");
            return Ok(None);
        }
        backend.submit(&collected).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_by_cli_name() {
        let mut manager = ScraperManager::new().unwrap();
        assert_eq!(manager.scrapers().len(), 4);

        manager.retain(&["rta".to_string(), "tolonews".to_string()]).unwrap();
        let names: Vec<&str> = manager.scrapers().iter().map(|s| s.cli_name()).collect();
        assert_eq!(names, vec!["tolonews", "rta"]);
    }

    #[test]
    fn test_retain_rejects_unknown_names() {
        let mut manager = ScraperManager::new().unwrap();

        let err = manager.retain(&["rta".to_string(), "tolo".to_string()]).unwrap_err();
        match err {
            Error::Config(msg) => {
                assert!(msg.contains("tolo"));
                assert!(msg.contains("tolonews, ariananews, rta, bbcpersian"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(manager.scrapers().len(), 4);
    }

    #[tokio::test]
    async fn test_run_without_scrapers_aborts() {
        let manager = ScraperManager::with_scrapers(Vec::new());
        let backend = BackendClient::new("http://127.0.0.1:9").unwrap();
        assert!(manager.run(&backend).await.unwrap().is_none());
    }
}
