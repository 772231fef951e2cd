//! Search request and response models.

use serde::{Deserialize, Serialize};

use crate::models::Book;

/// One request for a single remote page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query (sent URL-encoded)
    pub query: String,

    /// Page size requested from the catalog
    pub limit: usize,

    /// 1-based remote page number
    pub page: usize,
}

impl SearchQuery {
    /// Create a query for the first page with a limit of 100
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: 100,
            page: 1,
        }
    }

    /// Set the page size
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the 1-based page number
    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Whether the query text is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// One remote page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Entries on this page, in catalog order
    pub books: Vec<Book>,

    /// Total matches reported by the catalog across all pages
    pub total_results: usize,

    /// Query that was executed
    pub query: String,

    /// Page number this response belongs to
    pub page: usize,
}

impl SearchResponse {
    /// Create a new search response
    pub fn new(books: Vec<Book>, query: impl Into<String>, page: usize) -> Self {
        Self {
            books,
            total_results: 0,
            query: query.into(),
            page,
        }
    }

    /// Set total results
    pub fn total_results(mut self, total: usize) -> Self {
        self.total_results = total;
        self
    }
}

/// Long-form description of a work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSummary {
    /// Work key the summary belongs to
    pub key: String,

    /// Work title, when the catalog has one
    pub title: Option<String>,

    /// Description text, `None` when the work has none
    pub description: Option<String>,
}

impl WorkSummary {
    /// Text shown when a work carries no description
    pub const MISSING: &'static str = "No summary available.";

    /// Description or the fallback text
    pub fn text(&self) -> &str {
        self.description.as_deref().unwrap_or(Self::MISSING)
    }
}
