//! Orchestrator module for the drug indexer pipeline.
//!
//! Coordinates the fetcher, enricher, and loader components.

use tracing::{info, instrument, warn};

use crate::enricher::RecordEnricher;
use crate::errors::PipelineError;
use crate::fetcher::RegistryFetcher;
use crate::loader::IndexLoader;
use drug_indexer_repository::BatchOperationResult;

/// Summary of one indexing run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Lines in the downloaded registry.
    pub lines: usize,
    /// Records sent to the index.
    pub records: usize,
    /// Non-blank lines that could not become a record.
    pub skipped: usize,
    /// Records whose price lookup failed and kept zero pricing.
    pub pricing_degraded: usize,
    /// Documents the engine accepted.
    pub indexed: usize,
    /// Documents the engine rejected.
    pub failed: Vec<BatchOperationResult>,
    /// Documents searchable after the run, when the count succeeded.
    pub document_count: Option<u64>,
}

impl RunReport {
    /// Whether any document was rejected.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Orchestrator that runs the pipeline once, end to end.
///
/// The orchestrator:
/// - Downloads the registry before touching the search engine
/// - Recreates the index before enriching any record
/// - Loads the enriched records and reports the outcome
pub struct Orchestrator {
    fetcher: RegistryFetcher,
    enricher: RecordEnricher,
    loader: IndexLoader,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(fetcher: RegistryFetcher, enricher: RecordEnricher, loader: IndexLoader) -> Self {
        Self {
            fetcher,
            enricher,
            loader,
        }
    }

    /// Run the pipeline.
    ///
    /// A failed registry download aborts before the search engine is
    /// contacted. A failed index creation aborts before any record is
    /// enriched or loaded.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        info!("Starting drug indexer");

        let lines = self.fetcher.fetch_registry().await?;

        self.loader.health_check().await?;
        self.loader.create_index().await?;

        let batch = self.enricher.enrich_all(&lines).await;
        let load = self.loader.load(&batch.records).await?;

        let failed: Vec<BatchOperationResult> = load.summary.failures().cloned().collect();
        let report = RunReport {
            lines: lines.len(),
            records: batch.records.len(),
            skipped: batch.skipped,
            pricing_degraded: batch.pricing_degraded,
            indexed: load.summary.succeeded,
            failed,
            document_count: load.document_count,
        };

        if report.has_failures() {
            warn!(
                indexed = report.indexed,
                failed = report.failed.len(),
                "Drug indexer finished with rejected documents"
            );
        } else {
            info!(
                lines = report.lines,
                indexed = report.indexed,
                skipped = report.skipped,
                pricing_degraded = report.pricing_degraded,
                "Drug indexer finished"
            );
        }

        Ok(report)
    }
}
