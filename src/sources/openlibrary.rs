//! Open Library catalog source implementation.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::models::{Book, SearchQuery, SearchResponse, WorkSummary};
use crate::sources::{Source, SourceError};
use crate::utils::HttpClient;

/// Public Open Library host
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Open Library catalog source
///
/// Uses the public `search.json` endpoint and the per-work JSON documents.
/// No authentication is needed.
#[derive(Debug, Clone)]
pub struct OpenLibrarySource {
    client: HttpClient,
    base_url: String,
}

impl OpenLibrarySource {
    /// Create a source against the public Open Library host
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a source against a different host (mirrors, local mocks)
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Result<Self, SourceError> {
        let parsed = Url::parse(base_url).map_err(|e| {
            SourceError::InvalidRequest(format!("Invalid base URL '{}': {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::InvalidRequest(format!(
                "Unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Host this source talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the search URL for one remote page
    fn search_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}/search.json?q={}&limit={}&page={}",
            self.base_url,
            urlencoding::encode(query.query.trim()),
            query.limit,
            query.page
        )
    }

    /// Build the work document URL. Bare ids are treated as work ids.
    fn work_url(&self, key: &str) -> String {
        let key = key.trim();
        if key.starts_with('/') {
            format!("{}{}.json", self.base_url, key)
        } else {
            format!("{}/works/{}.json", self.base_url, key)
        }
    }
}

#[async_trait]
impl Source for OpenLibrarySource {
    fn id(&self) -> &str {
        "openlibrary"
    }

    fn name(&self) -> &str {
        "Open Library"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        if query.is_blank() {
            return Err(SourceError::InvalidRequest("Empty query".to_string()));
        }

        let url = self.search_url(query);
        tracing::debug!(%url, page = query.page, "Requesting search page");

        let response = self
            .client
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search Open Library: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "Open Library API returned status: {}",
                response.status()
            )));
        }

        let data: SearchDocument = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        Ok(
            SearchResponse::new(data.docs, query.query.trim(), query.page)
                .total_results(data.num_found),
        )
    }

    async fn work_summary(&self, key: &str) -> Result<WorkSummary, SourceError> {
        if key.trim().is_empty() {
            return Err(SourceError::InvalidRequest("Empty work key".to_string()));
        }

        let url = self.work_url(key);
        tracing::debug!(%url, "Requesting work document");

        let response = self
            .client
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch work: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(format!("Work not found: {}", key)));
        }
        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "Open Library API returned status: {}",
                response.status()
            )));
        }

        let data: WorkDocument = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        Ok(WorkSummary {
            key: data.key.unwrap_or_else(|| key.to_string()),
            title: data.title,
            description: data.description.and_then(Description::into_text),
        })
    }
}

// ===== Open Library API Types =====

#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(default)]
    docs: Vec<Book>,
    #[serde(default, rename = "numFound")]
    num_found: usize,
}

#[derive(Debug, Deserialize)]
struct WorkDocument {
    key: Option<String>,
    title: Option<String>,
    description: Option<Description>,
}

/// Work descriptions come either as a bare string or as a typed text value
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Description {
    Plain(String),
    Typed { value: String },
}

impl Description {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Description::Plain(text) => text,
            Description::Typed { value } => value,
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
