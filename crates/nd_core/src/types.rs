use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// An article as produced by a scraper, before any inference ran on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    /// Deduplication key.
    pub url: Url,
    pub title: String,
    pub text: String,
    pub source: String,
    #[serde(default)]
    pub top_img: Option<Url>,
    /// ISO-8601 as published by the source, kept verbatim.
    #[serde(default)]
    pub publish_dt: Option<String>,
}

/// A raw article plus the category and summary computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedArticle {
    #[serde(flatten)]
    pub raw: RawArticle,
    pub category: String,
    pub summary: String,
}

impl EnrichedArticle {
    pub fn new(raw: RawArticle, category: String, summary: String) -> Self {
        Self { raw, category, summary }
    }

    pub fn url(&self) -> &Url {
        &self.raw.url
    }
}

/// An enriched article once the store accepted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedArticle {
    #[serde(flatten)]
    pub article: EnrichedArticle,
    #[serde(with = "utc_seconds")]
    pub ingested_at: DateTime<Utc>,
}

impl ProcessedArticle {
    /// Stamps `article` with `now`, dropping sub-second precision.
    pub fn stamp(article: EnrichedArticle, now: DateTime<Utc>) -> Self {
        Self {
            article,
            ingested_at: now.trunc_subsecs(0),
        }
    }

    pub fn url(&self) -> &Url {
        self.article.url()
    }
}

/// `YYYY-MM-DDTHH:MM:SSZ` on the wire.
pub mod utc_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
