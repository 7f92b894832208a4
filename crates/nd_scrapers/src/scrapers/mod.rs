use std::sync::Arc;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use nd_core::{Error, RawArticle, Result};
use tracing::{debug, warn};
use url::Url;
use crate::fetch::Fetcher;

pub mod afghanistan;
pub mod extract;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the name of the news source
    fn source(&self) -> &str;

    /// Short name used on the command line
    fn cli_name(&self) -> &str;

    /// Returns the url of the current top story
    async fn top_link(&self) -> Result<Url>;

    /// Scrapes an article from the given URL
    async fn scrape_article(&self, url: &Url) -> Result<RawArticle>;
}

/// Where to find a source's top story.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub cli_name: String,
    pub home_url: String,
    /// CSS selector of the top story link on the home page.
    pub link_selector: String,
    pub referer: Option<String>,
    /// RSS feed whose first entry stands in when the home page fails.
    pub feed_url: Option<String>,
}

impl Source {
    pub fn new(name: &str, cli_name: &str, home_url: &str, link_selector: &str) -> Self {
        Self {
            name: name.to_string(),
            cli_name: cli_name.to_string(),
            home_url: home_url.to_string(),
            link_selector: link_selector.to_string(),
            referer: None,
            feed_url: None,
        }
    }

    pub fn with_referer(mut self, referer: &str) -> Self {
        self.referer = Some(referer.to_string());
        self
    }

    pub fn with_feed(mut self, feed_url: &str) -> Self {
        self.feed_url = Some(feed_url.to_string());
        self
    }
}

/// A [`Scraper`] driven entirely by a [`Source`] description.
pub struct SourceScraper {
    source: Source,
    fetcher: Arc<Fetcher>,
}

impl SourceScraper {
    pub fn new(source: Source, fetcher: Arc<Fetcher>) -> Self {
        Self { source, fetcher }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(referer) = &self.source.referer {
            let value = HeaderValue::from_str(referer)
                .map_err(|e| Error::Scraping(format!("Invalid referer {}: {}", referer, e)))?;
            headers.insert(REFERER, value);
        }
        Ok(headers)
    }

    async fn top_link_from_page(&self) -> Result<Url> {
        let home_url = &self.source.home_url;
        let base = Url::parse(home_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", home_url, e)))?;
        let html = self.fetcher.get_html(home_url, &self.headers()?).await?;
        extract::select_link(&html, &self.source.link_selector, &base)
    }

    async fn top_link_from_feed(&self, feed_url: &str) -> Result<Url> {
        let bytes = self.fetcher.get_bytes(feed_url, &self.headers()?).await?;
        let feed = feed_rs::parser::parse(bytes.as_slice())
            .map_err(|e| Error::Scraping(format!("Failed to parse feed {}: {}", feed_url, e)))?;
        let href = feed
            .entries
            .first()
            .and_then(|entry| entry.links.first())
            .map(|link| link.href.clone())
            .ok_or_else(|| Error::Scraping(format!("Feed {} has no entries", feed_url)))?;
        Url::parse(&href).map_err(|e| Error::InvalidUrl(format!("{}: {}", href, e)))
    }
}

#[async_trait]
impl Scraper for SourceScraper {
    fn source(&self) -> &str {
        &self.source.name
    }

    fn cli_name(&self) -> &str {
        &self.source.cli_name
    }

    async fn top_link(&self) -> Result<Url> {
        match self.top_link_from_page().await {
            Ok(url) => Ok(url),
            Err(e) => match &self.source.feed_url {
                Some(feed_url) => {
                    warn!("{}: home page failed ({}), falling back to {}", self.source.name, e, feed_url);
                    self.top_link_from_feed(feed_url).await
                }
                None => Err(e),
            },
        }
    }

    async fn scrape_article(&self, url: &Url) -> Result<RawArticle> {
        debug!("Fetching article {}", url);
        let html = self.fetcher.get_html(url.as_str(), &self.headers()?).await?;
        extract::extract_article(&html, url, &self.source.name)
    }
}
