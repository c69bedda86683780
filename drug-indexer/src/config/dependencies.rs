//! Dependency initialization and wiring for the drug indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::IndexerSettings;
use crate::IndexingError;
use drug_indexer_pipeline::{
    enricher::{EnricherConfig, RecordEnricher},
    fetcher::{FetcherConfig, RegistryFetcher},
    loader::IndexLoader,
    orchestrator::Orchestrator,
};
use drug_indexer_repository::{OpenSearchClient, SearchIndexClient, SearchIndexConfig};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from the given settings.
    ///
    /// Nothing is contacted here; the search engine is first reached when
    /// the orchestrator runs, after the registry download.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If a client cannot be built
    pub async fn new(settings: &IndexerSettings) -> Result<Self, IndexingError> {
        info!(
            registry_url = %settings.registry_url,
            price_lookup_url = %settings.price_lookup_url,
            opensearch_url = %settings.opensearch_url,
            index = %settings.index_name,
            column_mode = %settings.column_mode,
            "Initializing dependencies"
        );

        let search_client = OpenSearchClient::new(&settings.opensearch_url, settings.http_timeout)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        let index_config = SearchIndexConfig::for_index(settings.index_name.clone())
            .with_bulk_chunk_size(settings.bulk_chunk_size)
            .with_bulk_concurrency(settings.bulk_concurrency);
        let index_client = SearchIndexClient::with_config(Arc::new(search_client), index_config);

        let fetcher = RegistryFetcher::new(FetcherConfig {
            registry_url: settings.registry_url.clone(),
            timeout: settings.http_timeout,
        })?;

        let enricher = RecordEnricher::new(EnricherConfig {
            price_lookup_url: settings.price_lookup_url.clone(),
            timeout: settings.http_timeout,
            concurrency: settings.enrich_concurrency,
            column_mode: settings.column_mode,
        })?;

        let loader = IndexLoader::new(Arc::new(index_client));

        let orchestrator = Orchestrator::new(fetcher, enricher, loader);

        Ok(Self { orchestrator })
    }
}
