use std::collections::HashSet;
use chrono::{DateTime, Utc};
use nd_core::{EnrichedArticle, ProcessedArticle};
use url::Url;

/// Newest-first list of processed articles, unique by url.
#[derive(Debug, Clone, Default)]
pub struct ArticleSet {
    articles: Vec<ProcessedArticle>,
}

impl ArticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already ordered list, e.g. one read back from disk.
    pub fn from_articles(articles: Vec<ProcessedArticle>) -> Self {
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.articles.iter().any(|a| a.url() == url)
    }

    pub fn as_slice(&self) -> &[ProcessedArticle] {
        &self.articles
    }

    /// Stamps every candidate with an unseen url, newest first: the last
    /// novel candidate comes out at index 0. Repeats inside `candidates` count
    /// as seen after their first occurrence. The set itself is not touched.
    pub fn novel(&self, candidates: Vec<EnrichedArticle>, now: DateTime<Utc>) -> Vec<ProcessedArticle> {
        let known: HashSet<&Url> = self.articles.iter().map(|a| a.url()).collect();
        let mut batch: HashSet<Url> = HashSet::new();
        let fresh: Vec<EnrichedArticle> = candidates
            .into_iter()
            .filter(|candidate| !known.contains(candidate.url()) && batch.insert(candidate.url().clone()))
            .collect();

        fresh
            .into_iter()
            .rev()
            .map(|article| ProcessedArticle::stamp(article, now))
            .collect()
    }

    /// Puts an already ordered batch from [`ArticleSet::novel`] on top.
    pub fn prepend(&mut self, fresh: Vec<ProcessedArticle>) {
        self.articles.splice(0..0, fresh);
    }

    /// [`ArticleSet::novel`] followed by [`ArticleSet::prepend`]. Returns the
    /// number inserted.
    pub fn insert_novel(&mut self, candidates: Vec<EnrichedArticle>, now: DateTime<Utc>) -> usize {
        let fresh = self.novel(candidates, now);
        let added = fresh.len();
        self.prepend(fresh);
        added
    }

    /// The first `limit` entries; `None` and `Some(0)` mean everything.
    pub fn newest(&self, limit: Option<usize>) -> Vec<ProcessedArticle> {
        match limit {
            Some(limit) if limit > 0 => self.articles.iter().take(limit).cloned().collect(),
            _ => self.articles.clone(),
        }
    }
}
