//! Best-effort cover and detail-page lookup against the Open Library search API
//!
//! Every failure (transport error, timeout, non-200, bad JSON, no docs)
//! degrades to [`BookLinks::default`]; nothing is surfaced to the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str = "https://openlibrary.org";
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// Base of `/search.json` and of detail-page keys
    pub base_url: String,
    /// Base of `/b/id/{cover}-M.jpg`
    pub covers_url: String,
    pub timeout: Duration,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            covers_url: DEFAULT_COVERS_URL.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Cover image and detail page for a title; either may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLinks {
    pub cover_url: Option<String>,
    pub book_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    cover_i: Option<i64>,
    key: Option<String>,
}

pub struct MetadataClient {
    http: reqwest::Client,
    config: MetadataConfig,
}

impl MetadataClient {
    pub fn new(config: MetadataConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Look up `title`, never failing
    pub async fn lookup(&self, title: &str) -> BookLinks {
        match self.fetch(title).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!(title, error = %e, "Metadata lookup failed");
                BookLinks::default()
            }
        }
    }

    async fn fetch(&self, title: &str) -> reqwest::Result<BookLinks> {
        let url = format!("{}/search.json", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[("title", title)])
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            tracing::warn!(title, status = %response.status(), "Metadata service returned non-200");
            return Ok(BookLinks::default());
        }

        let body: SearchResponse = response.json().await?;
        Ok(self.links_from(&body))
    }

    fn links_from(&self, body: &SearchResponse) -> BookLinks {
        let Some(doc) = body.docs.first() else {
            return BookLinks::default();
        };

        let cover_url = doc.cover_i.filter(|id| *id != 0).map(|id| {
            format!("{}/b/id/{}-M.jpg", self.config.covers_url.trim_end_matches('/'), id)
        });
        let book_url = doc
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| format!("{}{}", self.config.base_url.trim_end_matches('/'), key));

        BookLinks { cover_url, book_url }
    }
}
