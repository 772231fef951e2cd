//! Integration tests for BookFinder
//!
//! These drive a full [`Session`] against scripted sources and against a
//! local HTTP server speaking the Open Library wire format.

use bookfinder::models::{Book, Category};
use bookfinder::search::{
    Action, AggregationLimits, AppState, Aggregator, SearchOutcome, Session, BOOKS_PER_PAGE,
};
use bookfinder::sources::mock::books_titled;
use bookfinder::sources::{MockSource, OpenLibrarySource, Source};
use bookfinder::utils::HttpClient;
use mockito::Matcher;
use std::sync::Arc;
use std::time::Duration;

fn titles(books: &[Book]) -> Vec<&str> {
    books.iter().filter_map(|b| b.title()).collect()
}

#[tokio::test]
async fn test_dune_aggregates_three_pages() {
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
    assert_eq!(source.requested_pages(), vec![1, 2, 3]);

    let state = session.state();
    assert_eq!(state.aggregated().len(), 250);
    assert_eq!(state.total_results(), 250);
    assert_eq!(state.total_pages(), 21);
    assert_eq!(state.page(), 1);
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_first_page_failure_on_empty_state() {
    let source = Arc::new(MockSource::with_generated(50).fail_on_page(1));
    let mut session = Session::new(source.clone());

    let outcome = session.search("x").await;

    assert!(matches!(outcome, SearchOutcome::Failed(_)));
    assert!(session.state().aggregated().is_empty());
    assert!(session.state().last_error().is_some());
    assert!(!session.state().is_loading());
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn test_first_page_failure_keeps_previous_results() {
    // Serve good results first, then swap in a failing source with the same state.
    let good = Arc::new(MockSource::with_generated(30));
    let mut session = Session::new(good);
    session.search("dune").await;
    let before = session.state().clone();

    let failing = Arc::new(MockSource::with_generated(30).fail_on_page(1));
    let mut session = Session::with_settings(failing, AggregationLimits::default(), before);
    session.dispatch(Action::NextPage).await;

    let outcome = session.search("x").await;

    assert!(matches!(outcome, SearchOutcome::Failed(_)));
    let state = session.state();
    assert_eq!(state.aggregated().len(), 30);
    assert_eq!(state.results_query(), Some("dune"));
    assert_eq!(state.page(), 2);
    assert_eq!(state.query(), "x");
}

#[tokio::test]
async fn test_fiction_filter_keeps_order() {
    let source = Arc::new(MockSource::with_books(books_titled(&[
        "Dune",
        "A Novel Approach",
        "Cooking at Home",
        "The Story of Art",
        "Foundation",
        "Gardening Basics",
        "Untitled Notes",
        "Bedtime Story Collection",
        "Linear Algebra",
        "Travel Guide",
    ])));
    let mut session = Session::new(source);
    session.search("mixed").await;

    session
        .dispatch(Action::SelectCategory(Category::Fiction))
        .await;

    let state = session.state();
    assert_eq!(
        titles(state.filtered()),
        vec!["A Novel Approach", "The Story of Art", "Bedtime Story Collection"]
    );
    assert_eq!(state.aggregated().len(), 10);
    assert_eq!(state.total_pages(), 1);
    assert!(!state.page_view().show_controls());
}

#[tokio::test]
async fn test_caps_at_five_pages_and_500_books() {
    let source = Arc::new(MockSource::with_generated(10_000));
    let mut session = Session::new(source.clone());

    let outcome = session.search("the").await;

    assert_eq!(
        outcome,
        SearchOutcome::Replaced {
            count: 500,
            total_results: 10_000,
            partial: false
        }
    );
    assert_eq!(source.request_count(), 5);
    assert_eq!(session.state().aggregated().len(), 500);
    assert_eq!(session.state().total_results(), 10_000);
    assert_eq!(session.state().total_pages(), 42);
}

#[tokio::test]
async fn test_config_cannot_raise_fetch_caps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookfinder.toml");
    std::fs::write(&path, "[limits]\nmax_pages = 20\nmax_items = 2000\n").unwrap();
    let config = bookfinder::config::load_config(Some(&path)).unwrap();
    assert_eq!(config.limits.max_pages, 20);

    let source = Arc::new(MockSource::with_generated(10_000));
    let mut session =
        Session::with_settings(source.clone(), config.limits, AppState::default());
    session.search("the").await;

    assert_eq!(session.state().aggregated().len(), 500);
    assert_eq!(source.request_count(), 5);
}

#[tokio::test]
async fn test_later_page_failure_keeps_fetched_pages() {
    let source = Arc::new(MockSource::with_generated(450).fail_on_page(3));
    let mut session = Session::new(source.clone());

    let outcome = session.search("war").await;

    assert_eq!(
        outcome,
        SearchOutcome::Replaced {
            count: 200,
            total_results: 450,
            partial: true
        }
    );
    assert_eq!(source.requested_pages(), vec![1, 2, 3]);
    assert!(session.state().is_partial());
}

#[tokio::test]
async fn test_category_and_search_reset_page() {
    let source = Arc::new(MockSource::with_generated(250));
    let mut session = Session::new(source);
    session.search("dune").await;

    session.dispatch(Action::GoToPage(7)).await;
    assert_eq!(session.state().page(), 7);

    session
        .dispatch(Action::SelectCategory(Category::History))
        .await;
    assert_eq!(session.state().page(), 1);
    assert!(session.state().filtered().is_empty());
    assert!(session.state().page_view().items.is_empty());

    session.dispatch(Action::SelectCategory(Category::All)).await;
    session.dispatch(Action::GoToPage(99)).await;
    assert_eq!(session.state().page(), 21);

    session.search("dune again").await;
    assert_eq!(session.state().page(), 1);
}

#[tokio::test]
async fn test_paging_walks_the_collection() {
    let source = Arc::new(MockSource::with_generated(30));
    let mut session = Session::new(source);
    session.search("short").await;

    let mut seen = Vec::new();
    loop {
        let view = session.state().page_view();
        seen.extend(view.items.iter().cloned());
        if !view.has_next() {
            break;
        }
        session.dispatch(Action::NextPage).await;
    }

    assert_eq!(seen.as_slice(), session.state().filtered());
    assert_eq!(session.state().page_view().items.len(), 30 - 2 * BOOKS_PER_PAGE);

    session.dispatch(Action::NextPage).await;
    assert_eq!(session.state().page(), 3);
}

#[tokio::test]
async fn test_stale_result_is_discarded() {
    let source: Arc<dyn Source> = Arc::new(MockSource::with_generated(40));
    let aggregator = Aggregator::new(source);

    let (first, first_ticket) = AppState::default().begin_search("first").unwrap();
    let (second, second_ticket) = first.begin_search("second").unwrap();

    let first_result = aggregator.aggregate(first_ticket.query()).await;
    let (after_stale, outcome) = second.complete_search(&first_ticket, first_result);
    assert_eq!(outcome, SearchOutcome::Stale);
    assert!(after_stale.is_loading());
    assert!(after_stale.aggregated().is_empty());

    let second_result = aggregator.aggregate(second_ticket.query()).await;
    let (done, outcome) = after_stale.complete_search(&second_ticket, second_result);
    assert!(matches!(outcome, SearchOutcome::Replaced { count: 40, .. }));
    assert_eq!(done.results_query(), Some("second"));
}

#[tokio::test]
async fn test_blank_query_makes_no_request() {
    let source = Arc::new(MockSource::with_generated(10));
    let mut session = Session::new(source.clone());

    assert_eq!(session.search("   ").await, SearchOutcome::Ignored);
    assert_eq!(source.request_count(), 0);
    assert!(!session.state().is_loading());
}

fn page_body(start: usize, count: usize, total: usize) -> String {
    let docs: Vec<serde_json::Value> = (start..start + count)
        .map(|i| {
            serde_json::json!({
                "key": format!("/works/OL{}W", i + 1),
                "title": format!("Dune Volume {}", i + 1),
                "author_name": ["Frank Herbert"],
                "first_publish_year": 1965,
                "cover_i": 1000 + i,
            })
        })
        .collect();
    serde_json::json!({ "numFound": total, "start": start, "docs": docs }).to_string()
}

#[tokio::test]
async fn test_open_library_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let mut mocks = Vec::new();
    for (page, count) in [(1usize, 100usize), (2, 100), (3, 50)] {
        let mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "dune".into()),
                Matcher::UrlEncoded("limit".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), page.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body((page - 1) * 100, count, 250))
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    let summary_mock = server
        .mock("GET", "/works/OL1W.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"key": "/works/OL1W", "title": "Dune Volume 1", "description": {"type": "/type/text", "value": "Desert planet."}}"#)
        .create_async()
        .await;

    let client = HttpClient::new("bookfinder-tests", Duration::from_secs(5)).unwrap();
    let source = OpenLibrarySource::with_base_url(client, &server.url()).unwrap();
    let mut session = Session::new(Arc::new(source));

    let outcome = session.search(" dune ").await;
    assert_eq!(
        outcome,
        SearchOutcome::Replaced {
            count: 250,
            total_results: 250,
            partial: false
        }
    );

    let state = session.state();
    assert_eq!(state.total_pages(), 21);
    let first = &state.page_view().items[0];
    assert_eq!(first.title(), Some("Dune Volume 1"));
    assert_eq!(first.author_line(), "Frank Herbert");
    assert_eq!(
        first.cover_url_at("https://covers.openlibrary.org", bookfinder::models::CoverSize::Medium),
        Some("https://covers.openlibrary.org/b/id/1000-M.jpg".to_string())
    );

    let summary = session.summary("/works/OL1W").await.unwrap();
    assert_eq!(summary.text(), "Desert planet.");

    for mock in mocks {
        mock.assert_async().await;
    }
    summary_mock.assert_async().await;
}

#[tokio::test]
async fn test_open_library_server_error_surfaces_as_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = HttpClient::new("bookfinder-tests", Duration::from_secs(5)).unwrap();
    let source = OpenLibrarySource::with_base_url(client, &server.url()).unwrap();
    let mut session = Session::new(Arc::new(source));

    let outcome = session.search("x").await;

    assert!(matches!(outcome, SearchOutcome::Failed(_)));
    assert!(session.state().aggregated().is_empty());
    mock.assert_async().await;
}
