//! Core data models for catalog entries and search operations.

mod book;
mod category;
mod search;

pub use book::{Book, BookBuilder, CoverSize, DEFAULT_COVERS_URL};
pub use category::{Category, UnknownCategory};
pub use search::{SearchQuery, SearchResponse, WorkSummary};
