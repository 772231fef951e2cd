//! Single-threaded driver that turns user actions into state snapshots.

use std::sync::Arc;

use crate::models::{Category, WorkSummary};
use crate::search::aggregator::{AggregationLimits, Aggregator};
use crate::search::state::{AppState, SearchOutcome};
use crate::sources::{Source, SourceError};

/// A user action on the result view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    SelectCategory(Category),
    NextPage,
    PreviousPage,
    GoToPage(usize),
    ToggleFavorite(usize),
}

/// Owns the current [`AppState`] and the [`Aggregator`] feeding it.
///
/// Actions run one at a time; a search holds the session until every page
/// request for it has finished.
#[derive(Debug)]
pub struct Session {
    aggregator: Aggregator,
    state: AppState,
}

impl Session {
    /// Create a session with default limits and page size
    pub fn new(source: Arc<dyn Source>) -> Self {
        Self::with_settings(source, AggregationLimits::default(), AppState::default())
    }

    /// Create a session with explicit limits and an initial state
    pub fn with_settings(source: Arc<dyn Source>, limits: AggregationLimits, state: AppState) -> Self {
        Self {
            aggregator: Aggregator::with_limits(source, limits),
            state,
        }
    }

    /// Current snapshot
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one action and return what a search did, if the action was a search
    pub async fn dispatch(&mut self, action: Action) -> Option<SearchOutcome> {
        match action {
            Action::Search(query) => return Some(self.search(&query).await),
            Action::SelectCategory(category) => self.state = self.state.with_category(category),
            Action::NextPage => self.state = self.state.next_page(),
            Action::PreviousPage => self.state = self.state.previous_page(),
            Action::GoToPage(page) => self.state = self.state.go_to_page(page),
            Action::ToggleFavorite(number) => {
                self.toggle_favorite(number);
            }
        }
        None
    }

    /// Run a full aggregation for `query` and apply it.
    ///
    /// Blank queries return [`SearchOutcome::Ignored`] without any request.
    /// Failures never escape: they are logged and reported in the outcome.
    pub async fn search(&mut self, query: &str) -> SearchOutcome {
        let Some((searching, ticket)) = self.state.begin_search(query) else {
            tracing::debug!("Ignoring blank query");
            return SearchOutcome::Ignored;
        };
        self.state = searching;

        let result = self.aggregator.aggregate(ticket.query()).await;
        let (next, outcome) = self.state.complete_search(&ticket, result);
        self.state = next;
        outcome
    }

    /// Flip the favourite mark of a result, returning whether it is now marked
    pub fn toggle_favorite(&mut self, number: usize) -> Option<bool> {
        let (next, marked) = self.state.toggle_favorite(number)?;
        self.state = next;
        Some(marked)
    }

    /// Fetch the description of a work
    pub async fn summary(&self, key: &str) -> Result<WorkSummary, SourceError> {
        self.aggregator.source().work_summary(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;

    #[tokio::test]
    async fn test_dispatch_search_then_navigate() {
        let source = Arc::new(MockSource::with_generated(250));
        let mut session = Session::new(source.clone());

        let outcome = session.dispatch(Action::Search("dune".into())).await;
        assert_eq!(
            outcome,
            Some(SearchOutcome::Replaced {
                count: 250,
                total_results: 250,
                partial: false
            })
        );
        assert_eq!(session.state().total_pages(), 21);

        assert_eq!(session.dispatch(Action::GoToPage(21)).await, None);
        assert_eq!(session.state().page_view().items.len(), 10);

        session.dispatch(Action::NextPage).await;
        assert_eq!(session.state().page(), 21);

        session.dispatch(Action::PreviousPage).await;
        assert_eq!(session.state().page(), 20);

        session
            .dispatch(Action::SelectCategory(Category::Science))
            .await;
        assert_eq!(session.state().page(), 1);
        assert!(session.state().filtered().is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_touches_nothing() {
        let source = Arc::new(MockSource::with_generated(20));
        let mut session = Session::new(source.clone());
        session.search("first").await;
        let generation = session.state().generation();

        assert_eq!(session.search("  ").await, SearchOutcome::Ignored);
        assert_eq!(session.state().generation(), generation);
        assert_eq!(session.state().aggregated().len(), 20);
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let source = Arc::new(MockSource::with_generated(20));
        let mut session = Session::new(source);
        session.search("marks").await;

        assert_eq!(session.toggle_favorite(3), Some(true));
        assert!(session.state().is_favorite("/works/OL3W"));

        assert_eq!(session.dispatch(Action::ToggleFavorite(3)).await, None);
        assert!(!session.state().is_favorite("/works/OL3W"));

        assert_eq!(session.toggle_favorite(21), None);
    }

    #[tokio::test]
    async fn test_summary_goes_to_source() {
        let source = Arc::new(MockSource::new().with_summary("/works/OL9W", "Sand."));
        let session = Session::new(source);
        assert_eq!(session.summary("/works/OL9W").await.unwrap().text(), "Sand.");
    }
}
