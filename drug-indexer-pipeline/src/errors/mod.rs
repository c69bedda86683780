//! Error types for the drug indexer pipeline.

use drug_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur in the drug indexer pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The registry download answered with something other than 200.
    #[error("Registry download returned status {status}")]
    RegistryUnavailable { status: u16 },

    /// The registry download could not be completed.
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// An HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClientError(String),

    /// The search engine did not answer the ping.
    #[error("Search engine unavailable: {0}")]
    SearchUnavailable(SearchIndexError),

    /// The index could not be recreated, so nothing was loaded.
    #[error("Index not ready: {0}")]
    IndexNotReady(SearchIndexError),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),
}

impl PipelineError {
    /// Create a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchError(msg.into())
    }

    /// Create an HTTP client error.
    pub fn http_client(msg: impl Into<String>) -> Self {
        Self::HttpClientError(msg.into())
    }
}
