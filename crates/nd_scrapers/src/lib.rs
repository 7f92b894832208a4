pub mod backend;
pub mod fetch;
pub mod manager;
pub mod scrapers;

pub use backend::BackendClient;
pub use fetch::Fetcher;
pub use manager::ScraperManager;
pub use scrapers::{Scraper, Source, SourceScraper};

pub mod prelude {
    pub use super::scrapers::{Scraper, Source};
    pub use super::{BackendClient, ScraperManager};
    pub use nd_core::{Error, RawArticle, Result};
}
