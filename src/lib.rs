//! # bookfinder
//!
//! Search the Open Library catalog, aggregate several result pages into one
//! bounded collection, narrow it by client-side category and page through
//! it twelve books at a time.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (Book, Category, SearchQuery, ...)
//! - [`sources`]: Catalog source trait, Open Library client and a mock
//! - [`search`]: Aggregation, category filtering, paging and state snapshots
//! - [`config`]: Layered configuration (defaults, TOML file, environment)
//! - [`ui`]: Terminal rendering of cards, tables and paging controls
//! - [`utils`]: HTTP client and display helpers

pub mod config;
pub mod models;
pub mod search;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Book, Category};
pub use search::{AppState, Aggregator, Session};
pub use sources::{OpenLibrarySource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
