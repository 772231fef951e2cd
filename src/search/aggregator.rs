//! Multi-page result aggregation.
//!
//! A search fetches remote pages one after another and concatenates them
//! into a single bounded collection. The first page decides the total; any
//! later page that fails ends the loop early and the pages already fetched
//! are kept.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{Book, SearchQuery};
use crate::sources::{Source, SourceError};

/// Most remote pages one search may request
pub const MAX_PAGES: usize = 5;

/// Most books one search may keep
pub const MAX_ITEMS: usize = 500;

/// Bounds applied to a single aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationLimits {
    /// Items requested per remote page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum number of remote pages fetched for one search
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of items kept
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            max_items: default_max_items(),
        }
    }
}

impl AggregationLimits {
    /// These limits with pages and items held within [`MAX_PAGES`] and [`MAX_ITEMS`].
    ///
    /// Smaller values are kept as they are.
    pub fn clamped(self) -> Self {
        Self {
            page_size: self.page_size.max(1),
            max_pages: self.max_pages.clamp(1, MAX_PAGES),
            max_items: self.max_items.min(MAX_ITEMS),
        }
    }
}

fn default_page_size() -> usize {
    100
}

fn default_max_pages() -> usize {
    MAX_PAGES
}

fn default_max_items() -> usize {
    MAX_ITEMS
}

/// Result of one aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    /// Query the results belong to (trimmed)
    pub query: String,

    /// Aggregated entries in fetch order, never longer than `max_items`
    pub books: Vec<Book>,

    /// Total matches reported by the catalog on the first page
    pub total_results: usize,

    /// Number of remote pages requested, including a failed one
    pub pages_fetched: usize,

    /// Whether a later page failed and the collection is incomplete
    pub partial: bool,
}

/// Errors that abort an aggregation
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// The query was empty or whitespace only; nothing was requested
    #[error("Empty search query")]
    EmptyQuery,

    /// The first page could not be fetched
    #[error(transparent)]
    FirstPage(SourceError),
}

/// Fetches and concatenates result pages from a [`Source`]
#[derive(Debug, Clone)]
pub struct Aggregator {
    source: Arc<dyn Source>,
    limits: AggregationLimits,
}

impl Aggregator {
    /// Create an aggregator with the default limits (100 per page, 5 pages, 500 items)
    pub fn new(source: Arc<dyn Source>) -> Self {
        Self::with_limits(source, AggregationLimits::default())
    }

    /// Create an aggregator with custom limits, clamped to the hard ceilings
    pub fn with_limits(source: Arc<dyn Source>, limits: AggregationLimits) -> Self {
        let clamped = limits.clamped();
        if clamped != limits {
            tracing::warn!(
                requested_pages = limits.max_pages,
                requested_items = limits.max_items,
                max_pages = clamped.max_pages,
                max_items = clamped.max_items,
                "Aggregation limits clamped"
            );
        }
        Self {
            source,
            limits: clamped,
        }
    }

    /// Source the aggregator reads from
    pub fn source(&self) -> &Arc<dyn Source> {
        &self.source
    }

    /// Run one aggregation for `query`.
    ///
    /// Blank queries return [`AggregateError::EmptyQuery`] without touching
    /// the network. Requests are issued strictly one after another.
    pub async fn aggregate(&self, query: &str) -> Result<Aggregation, AggregateError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AggregateError::EmptyQuery);
        }

        let AggregationLimits {
            page_size,
            max_pages,
            max_items,
        } = self.limits;

        let first = self
            .source
            .search(&SearchQuery::new(query).limit(page_size).page(1))
            .await
            .map_err(AggregateError::FirstPage)?;

        let total_results = first.total_results;
        let remote_pages = total_results.div_ceil(page_size);
        let page_cap = remote_pages.clamp(1, max_pages);

        tracing::debug!(
            query,
            total_results,
            remote_pages,
            page_cap,
            "Fetched first page"
        );

        let mut books = first.books;
        let mut pages_fetched = 1;
        let mut partial = false;

        for page in 2..=page_cap {
            if books.len() >= max_items {
                break;
            }

            pages_fetched += 1;
            match self
                .source
                .search(&SearchQuery::new(query).limit(page_size).page(page))
                .await
            {
                Ok(response) => {
                    tracing::debug!(query, page, count = response.books.len(), "Fetched page");
                    // The catalog ran out before its reported total.
                    if response.books.is_empty() {
                        break;
                    }
                    books.extend(response.books);
                }
                Err(e) => {
                    tracing::warn!(
                        query,
                        page,
                        kept = books.len(),
                        "Stopping aggregation early: {}",
                        e
                    );
                    partial = true;
                    break;
                }
            }
        }

        books.truncate(max_items);

        tracing::info!(
            query,
            count = books.len(),
            total_results,
            pages_fetched,
            partial,
            "Aggregated search results"
        );

        Ok(Aggregation {
            query: query.to_string(),
            books,
            total_results,
            pages_fetched,
            partial,
        })
    }
}
