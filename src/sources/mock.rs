//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{Book, SearchQuery, SearchResponse, WorkSummary};
use crate::sources::{Source, SourceError};

#[derive(Debug)]
enum Catalog {
    Fixed(Vec<Book>),
    Generated(usize),
}

/// A mock source that serves pages out of an in-memory catalog.
///
/// Every query sees the same catalog. Pages are sliced with the requested
/// limit, so the mock behaves like a real paginated endpoint. Individual
/// pages can be scripted to fail.
#[derive(Debug)]
pub struct MockSource {
    catalog: Catalog,
    reported_total: Option<usize>,
    failing_pages: HashSet<usize>,
    summaries: HashMap<String, String>,
    requests: AtomicUsize,
    requested_pages: Mutex<Vec<usize>>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create a mock source with an empty catalog.
    pub fn new() -> Self {
        Self::with_books(Vec::new())
    }

    /// Serve exactly these books.
    pub fn with_books(books: Vec<Book>) -> Self {
        Self::from_catalog(Catalog::Fixed(books))
    }

    /// Serve `total` generated books titled "Book 1", "Book 2", ...
    pub fn with_generated(total: usize) -> Self {
        Self::from_catalog(Catalog::Generated(total))
    }

    fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            reported_total: None,
            failing_pages: HashSet::new(),
            summaries: HashMap::new(),
            requests: AtomicUsize::new(0),
            requested_pages: Mutex::new(Vec::new()),
        }
    }

    /// Report a different total than the catalog actually holds.
    pub fn reported_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Make requests for this page fail with a network error.
    pub fn fail_on_page(mut self, page: usize) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// Register a description for a work key.
    pub fn with_summary(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.summaries.insert(key.into(), text.into());
        self
    }

    /// Number of search requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Page numbers requested so far, in order.
    pub fn requested_pages(&self) -> Vec<usize> {
        self.requested_pages
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }

    fn catalog_len(&self) -> usize {
        match &self.catalog {
            Catalog::Fixed(books) => books.len(),
            Catalog::Generated(total) => *total,
        }
    }

    fn page_books(&self, start: usize, end: usize) -> Vec<Book> {
        match &self.catalog {
            Catalog::Fixed(books) => books[start..end].to_vec(),
            Catalog::Generated(_) => (start..end).map(generated_book).collect(),
        }
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut pages) = self.requested_pages.lock() {
            pages.push(query.page);
        }

        if self.failing_pages.contains(&query.page) {
            return Err(SourceError::Network(format!(
                "Scripted failure on page {}",
                query.page
            )));
        }

        let len = self.catalog_len();
        let start = query.page.saturating_sub(1).saturating_mul(query.limit).min(len);
        let end = start.saturating_add(query.limit).min(len);

        Ok(
            SearchResponse::new(self.page_books(start, end), &query.query, query.page)
                .total_results(self.reported_total.unwrap_or(len)),
        )
    }

    async fn work_summary(&self, key: &str) -> Result<WorkSummary, SourceError> {
        self.summaries
            .get(key)
            .map(|text| WorkSummary {
                key: key.to_string(),
                title: None,
                description: Some(text.clone()),
            })
            .ok_or_else(|| SourceError::NotFound(format!("Work not found: {}", key)))
    }
}

/// Helper function to create the n-th (0-based) generated book.
pub fn generated_book(index: usize) -> Book {
    Book::builder()
        .key(format!("/works/OL{}W", index + 1))
        .title(format!("Book {}", index + 1))
        .build()
}

/// Helper function to create a set of books from titles.
pub fn books_titled(titles: &[&str]) -> Vec<Book> {
    titles.iter().map(|t| Book::new(*t)).collect()
}
