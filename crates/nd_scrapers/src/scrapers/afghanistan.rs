use std::sync::Arc;
use crate::fetch::Fetcher;
use super::{Scraper, Source, SourceScraper};

pub fn tolo_news() -> Source {
    Source::new("Tolo News", "tolonews", "https://tolonews.com/fa/", "h2.title-top-post-tolonews a")
}

pub fn ariana_news() -> Source {
    // The trailing slash matters, the bare path redirects to the English site.
    Source::new(
        "Ariana News",
        "ariananews",
        "https://www.ariananews.af/fa/",
        "section#mvp-feat5-wrap a[rel='bookmark']",
    )
}

pub fn rta() -> Source {
    Source::new("RTA", "rta", "https://rta.af/fa/home/", "a[rel='bookmark']")
        .with_referer("https://rta.af/")
        .with_feed("https://rta.af/fa/feed/")
}

pub fn bbc_persian() -> Source {
    Source::new(
        "BBC Persian (افغانستان)",
        "bbcpersian",
        "https://www.bbc.com/persian",
        "ul[data-testid='topic-promos'] li:first-child h3 a",
    )
}

pub fn sources() -> Vec<Source> {
    vec![tolo_news(), ariana_news(), rta(), bbc_persian()]
}

/// Returns a scraper for every known Afghan source, sharing one fetcher
pub fn get_scrapers(fetcher: Arc<Fetcher>) -> Vec<Box<dyn Scraper>> {
    sources()
        .into_iter()
        .map(|source| Box::new(SourceScraper::new(source, fetcher.clone())) as Box<dyn Scraper>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_get_scrapers() {
        let scrapers = get_scrapers(Arc::new(Fetcher::new().unwrap()));
        assert_eq!(scrapers.len(), 4);

        let names: HashSet<&str> = scrapers.iter().map(|s| s.cli_name()).collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains("rta"));
    }

    #[test]
    fn test_only_rta_has_fallbacks() {
        for source in sources() {
            assert_eq!(source.feed_url.is_some(), source.cli_name == "rta");
            assert_eq!(source.referer.is_some(), source.cli_name == "rta");
            assert!(url::Url::parse(&source.home_url).is_ok());
        }
    }
}
