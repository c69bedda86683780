//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;
use drug_indexer_shared::DrugRecord;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into `SearchIndexClient` to enable dependency
/// injection and easy testing with mock implementations.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check if the search engine is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the engine answered the ping
    /// * `Ok(false)` - If the engine answered with a failure status
    /// * `Err(SearchIndexError)` - If the ping could not be sent
    async fn health_check(&self) -> Result<bool, SearchIndexError>;

    /// Check whether an index with the given name exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Delete the given index.
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Create an index from a settings-and-mappings body.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the index to create
    /// * `body` - JSON object with `settings` and `mappings` keys
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchIndexError>;

    /// Index documents in a single bulk request and report per-document outcomes.
    ///
    /// # Arguments
    ///
    /// * `index` - Target index
    /// * `documents` - Slice of drug records to index
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - One result per document, in input order
    /// * `Err(SearchIndexError)` - If the bulk request fails entirely
    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[DrugRecord],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Make recently indexed documents visible to search.
    async fn refresh_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Count the documents stored in the index.
    async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError>;
}
