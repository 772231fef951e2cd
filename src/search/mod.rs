//! Result aggregation, category filtering and paging.
//!
//! - [`Aggregator`]: fetches up to five remote pages sequentially and keeps at most 500 books
//! - [`filter_books`]: narrows aggregated books to a [`Category`](crate::models::Category)
//! - [`PageView`]: the fixed-size slice of filtered books currently shown
//! - [`AppState`]: immutable snapshot tying the three together
//! - [`Session`]: applies user actions to the snapshot one at a time

mod aggregator;
mod filter;
mod pagination;
mod session;
mod state;

pub use aggregator::{
    AggregateError, Aggregation, AggregationLimits, Aggregator, MAX_ITEMS, MAX_PAGES,
};
pub use filter::{filter_books, matches_category};
pub use pagination::{clamp_page, page_numbers, total_pages, PageMarker, PageView, BOOKS_PER_PAGE};
pub use session::{Action, Session};
pub use state::{AppState, SearchOutcome, SearchTicket};
