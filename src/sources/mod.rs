//! Catalog source plugins.
//!
//! This module defines the [`Source`] trait that the aggregation layer talks
//! to. [`OpenLibrarySource`] is the production implementation and
//! [`MockSource`] serves scripted pages for tests.
//!
//! # Implementing a New Source
//!
//! 1. Create a new struct that implements `Source`
//! 2. Implement `id`, `name` and `search`
//! 3. Implement `work_summary` if the catalog exposes long descriptions

pub mod mock;
mod openlibrary;

pub use mock::MockSource;
pub use openlibrary::{OpenLibrarySource, DEFAULT_BASE_URL};

use crate::models::{SearchQuery, SearchResponse, WorkSummary};
use async_trait::async_trait;

/// The Source trait defines the interface to a remote book catalog.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch one remote page of results for the query
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError>;

    /// Fetch the long description of a work by its key
    async fn work_summary(&self, _key: &str) -> Result<WorkSummary, SourceError> {
        Err(SourceError::NotImplemented)
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The requested operation is not implemented for this source
    #[error("Operation not implemented for this source")]
    NotImplemented,

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Work not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SourceError::Api("status 503".to_string()).to_string(),
            "API error: status 503"
        );
        let err: SourceError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SourceError::Parse(msg) if msg.starts_with("JSON:")));
    }
}
