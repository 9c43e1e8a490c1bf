//! DuckDuckGo Search Source
//!
//! Query lookups against the DuckDuckGo Instant Answer API. No API key
//! required. The abstract (when present) becomes the first hit, followed
//! by related topics, flattened out of their category groupings.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{http_client, send_with_retry, SearchSource, DEFAULT_TIMEOUT};
use crate::error::{ProviderError, Result};
use crate::model::SearchHit;

const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com/";

/// Hits returned per query, best first
const MAX_HITS: usize = 5;

pub struct DuckDuckGoSource {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoSource {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Override the endpoint (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchSource for DuckDuckGoSource {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let request = self.client.get(&self.base_url).query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ]);

        let response = send_with_retry(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!(
                "search service returned HTTP {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_hits(&body)
    }
}

fn parse_hits(body: &str) -> Result<Vec<SearchHit>> {
    let api: ApiResponse = serde_json::from_str(body)?;
    let mut hits = Vec::new();

    if !api.abstract_text.is_empty() {
        hits.push(SearchHit {
            title: if api.heading.is_empty() {
                api.abstract_text.clone()
            } else {
                api.heading.clone()
            },
            snippet: api.abstract_text.clone(),
            url: non_empty(api.abstract_url.clone()),
        });
    }

    flatten_topics(&api.related_topics, &mut hits);
    hits.truncate(MAX_HITS);

    if hits.is_empty() {
        return Err(ProviderError::EmptyResult);
    }
    Ok(hits)
}

fn flatten_topics(topics: &[ApiTopic], hits: &mut Vec<SearchHit>) {
    for topic in topics {
        if hits.len() >= MAX_HITS {
            return;
        }
        match topic {
            ApiTopic::Leaf { text, first_url } => {
                if text.is_empty() {
                    continue;
                }
                // Topic text reads "Title - description"
                let title = text.split(" - ").next().unwrap_or(text).to_string();
                hits.push(SearchHit {
                    title,
                    snippet: text.clone(),
                    url: non_empty(first_url.clone()),
                });
            }
            ApiTopic::Group { topics } => flatten_topics(topics, hits),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(rename = "Heading", default)]
    heading: String,

    #[serde(rename = "AbstractText", default)]
    abstract_text: String,

    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,

    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<ApiTopic>,
}

/// Related topics arrive either as results or as named groups of results
#[derive(Deserialize)]
#[serde(untagged)]
enum ApiTopic {
    Leaf {
        #[serde(rename = "Text")]
        text: String,

        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<ApiTopic>,
    },
}
