//! Application state snapshots and the pure functions that advance them.
//!
//! Every user action takes the current [`AppState`] by reference and returns
//! a new one. Collections are shared through `Arc`, so a snapshot is cheap to
//! clone and old snapshots stay valid.
//!
//! Searches are split in two steps. [`AppState::begin_search`] bumps the
//! request generation and hands out a [`SearchTicket`];
//! [`AppState::complete_search`] applies a result only if its ticket still
//! belongs to the latest generation, so a slow response for an older search
//! cannot overwrite newer results.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{Book, Category};
use crate::search::aggregator::{AggregateError, Aggregation};
use crate::search::filter::filter_books;
use crate::search::pagination::{total_pages, PageView, BOOKS_PER_PAGE};

/// Proof that a search was started from a given generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    /// Generation this ticket was issued for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Trimmed query to run
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// What happened when a search result was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results replaced the previous collection
    Replaced {
        count: usize,
        total_results: usize,
        partial: bool,
    },

    /// The first page failed; previous results were kept
    Failed(String),

    /// The query was blank; nothing changed
    Ignored,

    /// A newer search had started; the result was dropped
    Stale,
}

/// Immutable snapshot of everything the result view needs
#[derive(Debug, Clone)]
pub struct AppState {
    query: String,
    results_query: Option<String>,
    category: Category,
    page: usize,
    books_per_page: usize,
    aggregated: Arc<Vec<Book>>,
    filtered: Arc<Vec<Book>>,
    total_results: usize,
    partial: bool,
    loading: bool,
    generation: u64,
    last_error: Option<String>,
    favorites: Arc<HashSet<String>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(BOOKS_PER_PAGE)
    }
}

impl AppState {
    /// Empty state showing `books_per_page` books per page
    pub fn new(books_per_page: usize) -> Self {
        Self {
            query: String::new(),
            results_query: None,
            category: Category::All,
            page: 1,
            books_per_page: books_per_page.max(1),
            aggregated: Arc::new(Vec::new()),
            filtered: Arc::new(Vec::new()),
            total_results: 0,
            partial: false,
            loading: false,
            generation: 0,
            last_error: None,
            favorites: Arc::new(HashSet::new()),
        }
    }

    // ========== ACCESSORS ==========

    /// Last submitted query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Query the current results belong to
    pub fn results_query(&self) -> Option<&str> {
        self.results_query.as_deref()
    }

    /// Active category
    pub fn category(&self) -> Category {
        self.category
    }

    /// Current 1-based page index
    pub fn page(&self) -> usize {
        self.page
    }

    /// Books shown per page
    pub fn books_per_page(&self) -> usize {
        self.books_per_page
    }

    /// Aggregated results of the latest successful search
    pub fn aggregated(&self) -> &[Book] {
        &self.aggregated
    }

    /// Aggregated results narrowed to the active category
    pub fn filtered(&self) -> &[Book] {
        &self.filtered
    }

    /// Total matches reported by the catalog for the latest successful search
    pub fn total_results(&self) -> usize {
        self.total_results
    }

    /// Whether the latest results are incomplete because a later page failed
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Whether a search is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current request generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Message of the latest failed search, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the book with this stable key is marked as a favourite
    pub fn is_favorite(&self, key: &str) -> bool {
        self.favorites.contains(key)
    }

    /// Number of favourites marked in this session
    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    /// Number of pages over the filtered collection
    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.books_per_page)
    }

    /// The page currently on screen
    pub fn page_view(&self) -> PageView<'_> {
        PageView::new(&self.filtered, self.books_per_page, self.page)
    }

    // ========== TRANSITIONS ==========

    /// Start a search for `query`.
    ///
    /// Returns `None` for blank queries, which leave the state untouched.
    pub fn begin_search(&self, query: &str) -> Option<(AppState, SearchTicket)> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let generation = self.generation + 1;
        let next = AppState {
            query: query.to_string(),
            loading: true,
            generation,
            ..self.clone()
        };
        let ticket = SearchTicket {
            generation,
            query: query.to_string(),
        };

        Some((next, ticket))
    }

    /// Apply the result of the search started with `ticket`
    pub fn complete_search(
        &self,
        ticket: &SearchTicket,
        result: Result<Aggregation, AggregateError>,
    ) -> (AppState, SearchOutcome) {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                query = ticket.query.as_str(),
                "Discarding stale search result"
            );
            return (self.clone(), SearchOutcome::Stale);
        }

        match result {
            Ok(aggregation) => {
                let outcome = SearchOutcome::Replaced {
                    count: aggregation.books.len(),
                    total_results: aggregation.total_results,
                    partial: aggregation.partial,
                };
                let aggregated = Arc::new(aggregation.books);
                let filtered = Arc::new(filter_books(&aggregated, self.category));

                let next = AppState {
                    results_query: Some(aggregation.query),
                    page: 1,
                    aggregated,
                    filtered,
                    total_results: aggregation.total_results,
                    partial: aggregation.partial,
                    loading: false,
                    last_error: None,
                    ..self.clone()
                };
                (next, outcome)
            }
            Err(AggregateError::EmptyQuery) => (
                AppState {
                    loading: false,
                    ..self.clone()
                },
                SearchOutcome::Ignored,
            ),
            Err(e) => {
                tracing::warn!(query = ticket.query.as_str(), "Search failed: {}", e);
                let message = e.to_string();
                let next = AppState {
                    loading: false,
                    last_error: Some(message.clone()),
                    ..self.clone()
                };
                (next, SearchOutcome::Failed(message))
            }
        }
    }

    /// Switch category, recomputing the filtered collection and resetting to page 1
    pub fn with_category(&self, category: Category) -> AppState {
        AppState {
            category,
            page: 1,
            filtered: Arc::new(filter_books(&self.aggregated, category)),
            ..self.clone()
        }
    }

    /// Jump to a 1-based page, clamped into range
    pub fn go_to_page(&self, page: usize) -> AppState {
        AppState {
            page: PageView::new(&self.filtered, self.books_per_page, page).page,
            ..self.clone()
        }
    }

    /// Flip the favourite mark of the result numbered `number` (1-based, as on its card).
    ///
    /// Marks are keyed by [`Book::stable_key`] and last for the session, across
    /// searches and category changes. Returns `None` when no such result exists.
    pub fn toggle_favorite(&self, number: usize) -> Option<(AppState, bool)> {
        let position = number.checked_sub(1)?;
        let key = self.filtered.get(position)?.stable_key(position);

        let mut favorites = (*self.favorites).clone();
        let marked = if favorites.remove(&key) {
            false
        } else {
            favorites.insert(key);
            true
        };

        let next = AppState {
            favorites: Arc::new(favorites),
            ..self.clone()
        };
        Some((next, marked))
    }

    /// Next page, staying on the last page
    pub fn next_page(&self) -> AppState {
        self.go_to_page(self.page.saturating_add(1))
    }

    /// Previous page, staying on the first page
    pub fn previous_page(&self) -> AppState {
        self.go_to_page(self.page.saturating_sub(1))
    }
}
