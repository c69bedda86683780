//! Configuration types for the SearchIndexClient.

use crate::opensearch::index_config::INDEX_NAME;

/// Configuration for the SearchIndexClient.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// Name of the index that is recreated and loaded on every run.
    pub index_name: String,
    /// Maximum number of documents accepted by a single `bulk_load` call.
    /// `None` disables the limit.
    pub max_batch_size: Option<usize>,
    /// Number of documents sent per `_bulk` request.
    pub bulk_chunk_size: usize,
    /// Number of `_bulk` requests in flight at once.
    pub bulk_concurrency: usize,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            index_name: INDEX_NAME.to_string(),
            max_batch_size: None,
            bulk_chunk_size: 500,
            bulk_concurrency: 4,
        }
    }
}

impl SearchIndexConfig {
    /// Create a config targeting the given index, with default bulk settings.
    pub fn for_index(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            ..Self::default()
        }
    }

    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = Some(max_batch_size);
        self
    }

    /// Set the number of documents per bulk request.
    pub fn with_bulk_chunk_size(mut self, bulk_chunk_size: usize) -> Self {
        self.bulk_chunk_size = bulk_chunk_size;
        self
    }

    /// Set how many bulk requests may run concurrently.
    pub fn with_bulk_concurrency(mut self, bulk_concurrency: usize) -> Self {
        self.bulk_concurrency = bulk_concurrency;
        self
    }
}
