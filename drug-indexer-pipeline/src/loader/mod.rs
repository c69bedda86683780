//! Loader module for the drug indexer pipeline.
//!
//! Recreates the drug index and loads enriched records into it.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use drug_indexer_repository::{BatchOperationSummary, SearchIndexClient};
use drug_indexer_shared::DrugRecord;

/// Outcome of a bulk load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Per-document results of the bulk write.
    pub summary: BatchOperationSummary,
    /// Documents searchable after the load, when the count succeeded.
    pub document_count: Option<u64>,
}

/// Loader that indexes drug records into the search engine.
///
/// The loader is responsible for:
/// - Checking that the engine is reachable
/// - Recreating the index before each load
/// - Reporting documents the engine rejected
pub struct IndexLoader {
    client: Arc<SearchIndexClient>,
}

impl IndexLoader {
    /// Create a new loader with the given client.
    pub fn new(client: Arc<SearchIndexClient>) -> Self {
        Self { client }
    }

    /// Check that the search engine answers.
    pub async fn health_check(&self) -> Result<(), PipelineError> {
        self.client.health_check().await.map_err(|e| {
            error!(error = %e, "Search engine health check failed");
            PipelineError::SearchUnavailable(e)
        })
    }

    /// Recreate the index from scratch.
    ///
    /// A failure means the index is not ready and nothing must be loaded.
    #[instrument(skip(self), fields(index = %self.client.index_name()))]
    pub async fn create_index(&self) -> Result<(), PipelineError> {
        self.client.recreate_index().await.map_err(|e| {
            error!(error = %e, "Failed to create index");
            PipelineError::IndexNotReady(e)
        })
    }

    /// Bulk load records into the index.
    ///
    /// Rejected documents are logged and reported, not retried; the
    /// documents that were accepted stay in the index.
    #[instrument(skip(self, records), fields(index = %self.client.index_name(), count = records.len()))]
    pub async fn load(&self, records: &[DrugRecord]) -> Result<LoadReport, PipelineError> {
        let summary = self.client.bulk_load(records).await?;

        for failure in summary.failures() {
            let reason = failure
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            error!(drug_id = failure.drug_id, error = %reason, "Document rejected");
        }

        let document_count = match self.client.document_count().await {
            Ok(count) => {
                info!(documents = count, "Index refreshed");
                Some(count)
            }
            Err(e) => {
                warn!(error = %e, "Failed to count indexed documents");
                None
            }
        };

        Ok(LoadReport {
            summary,
            document_count,
        })
    }
}
