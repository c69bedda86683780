//! Search index client implementation.
//!
//! This module provides the main client for interacting with the drug index.
//! Application code uses this to check the engine, recreate the index and
//! bulk load documents.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument, warn};

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::get_index_settings;
use crate::types::BatchOperationSummary;
use drug_indexer_shared::DrugRecord;

/// The main client for interacting with the drug index.
pub struct SearchIndexClient {
    provider: Arc<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    /// Name of the index this client manages.
    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Ping the search engine.
    ///
    /// An engine that answers with a failure status is reported as a
    /// connection error.
    pub async fn health_check(&self) -> Result<(), SearchIndexError> {
        if self.provider.health_check().await? {
            Ok(())
        } else {
            Err(SearchIndexError::connection("search engine ping failed"))
        }
    }

    /// Drop the index if it exists and create it again with the drug mappings.
    ///
    /// Calling this twice leaves exactly one freshly created index.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The index exists, empty, with the expected mappings
    /// * `Err(SearchIndexError)` - The existence check, deletion or creation failed;
    ///   the index must be considered unavailable
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    pub async fn recreate_index(&self) -> Result<(), SearchIndexError> {
        let index = self.config.index_name.as_str();

        if self.provider.index_exists(index).await? {
            info!("Deleting existing index");
            self.provider.delete_index(index).await?;
        }

        self.provider
            .create_index(index, &get_index_settings())
            .await?;

        info!("Index created");
        Ok(())
    }

    /// Bulk load drug records into the index.
    ///
    /// Records are split into chunks of `bulk_chunk_size`, and up to
    /// `bulk_concurrency` chunks are sent at once. A chunk whose request
    /// fails entirely is reported with every document failed. Nothing is
    /// retried.
    ///
    /// The batch size is limited by the configured max_batch_size.
    #[instrument(skip(self, records), fields(index = %self.config.index_name, count = records.len()))]
    pub async fn bulk_load(
        &self,
        records: &[DrugRecord],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if records.is_empty() {
            return Ok(BatchOperationSummary::empty());
        }

        self.validate_batch_size(records.len())?;

        let provider = &self.provider;
        let index = self.config.index_name.as_str();
        let chunk_size = self.config.bulk_chunk_size.max(1);
        let concurrency = self.config.bulk_concurrency.max(1);

        let summaries: Vec<BatchOperationSummary> = stream::iter(records.chunks(chunk_size))
            .map(|chunk| async move {
                match provider.bulk_index_documents(index, chunk).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        error!(error = %e, count = chunk.len(), "Bulk chunk failed");
                        BatchOperationSummary::all_failed(chunk, &e)
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let summary = BatchOperationSummary::merge(summaries);

        if summary.has_failures() {
            warn!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk load completed with failures"
            );
        } else {
            info!(succeeded = summary.succeeded, "Bulk load completed");
        }

        Ok(summary)
    }

    /// Refresh the index and return the number of searchable documents.
    pub async fn document_count(&self) -> Result<u64, SearchIndexError> {
        let index = self.config.index_name.as_str();
        self.provider.refresh_index(index).await?;
        self.provider.count_documents(index).await
    }
}
