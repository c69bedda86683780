//! Record enricher implementation.
//!
//! Turns registry lines into drug records and adds the price and
//! reimbursement rate found on the price lookup page.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::StatusCode;
use tracing::{debug, info, instrument, warn};

use crate::enricher::price_page::{parse_price_page, PriceInfo};
use crate::enricher::registry_line::{parse_registry_line, ColumnMode, LineError};
use crate::errors::PipelineError;
use drug_indexer_shared::DrugRecord;

/// Default base URL of the price lookup page.
pub const DEFAULT_PRICE_LOOKUP_URL: &str =
    "https://base-donnees-publique.medicaments.gouv.fr/extrait.php";

/// Configuration for the record enricher.
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Base URL of the price page, queried with `?specid=<drug id>`.
    pub price_lookup_url: String,
    /// Timeout for each price lookup.
    pub timeout: Duration,
    /// Number of price lookups in flight at once.
    pub concurrency: usize,
    /// How empty registry columns are mapped.
    pub column_mode: ColumnMode,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            price_lookup_url: DEFAULT_PRICE_LOOKUP_URL.to_string(),
            timeout: Duration::from_secs(30),
            concurrency: 4,
            column_mode: ColumnMode::default(),
        }
    }
}

/// Outcome of the price lookup for one record.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceLookup {
    /// Pricing was found on the page.
    Found(PriceInfo),
    /// The page has no pricing element.
    NotListed,
    /// The page answered with a status other than 200.
    Unavailable(u16),
    /// The request could not be completed.
    Failed(String),
    /// The pricing element did not have the expected shape.
    Malformed(String),
}

impl PriceLookup {
    /// Whether the record keeps the zero defaults because of a failure.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Failed(_) | Self::Malformed(_)
        )
    }
}

/// A record together with the outcome of its price lookup.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub record: DrugRecord,
    pub pricing: PriceLookup,
}

/// Records produced from a whole registry.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentBatch {
    /// Records in registry order.
    pub records: Vec<DrugRecord>,
    /// Non-blank lines that could not become a record.
    pub skipped: usize,
    /// Records whose price lookup failed and kept zero pricing.
    pub pricing_degraded: usize,
}

/// Enriches registry lines with pricing.
pub struct RecordEnricher {
    client: reqwest::Client,
    config: EnricherConfig,
}

impl RecordEnricher {
    /// Create a new enricher.
    ///
    /// # Returns
    ///
    /// * `Ok(RecordEnricher)` - A new enricher instance
    /// * `Err(PipelineError)` - If the HTTP client cannot be built
    pub fn new(config: EnricherConfig) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::http_client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Enrich a single registry line.
    ///
    /// Issues one price lookup keyed by the first column. Any failure of the
    /// lookup leaves the price and rate at zero.
    ///
    /// # Returns
    ///
    /// * `Ok(Enrichment)` - The record and how its pricing was obtained
    /// * `Err(LineError)` - If the line cannot be mapped onto a record; no lookup is made
    pub async fn enrich(&self, line: &str) -> Result<Enrichment, LineError> {
        let parsed = parse_registry_line(line, self.config.column_mode)?;

        if parsed.has_empty_fields {
            warn!(
                drug_id = parsed.record.drug_id,
                column_mode = %self.config.column_mode,
                "Registry line has empty fields"
            );
        }
        if parsed.record.circulation_date().is_none() {
            warn!(
                drug_id = parsed.record.drug_id,
                date = %parsed.record.date_of_circulation,
                "Circulation date is not dd/MM/yyyy"
            );
        }

        let pricing = self.lookup_price(&parsed.raw_id).await;
        let record = match &pricing {
            PriceLookup::Found(info) => parsed
                .record
                .with_pricing(info.price_with_honorary, info.repayment_rate),
            _ => parsed.record,
        };

        debug!(record = ?record, "Recovered drug");
        Ok(Enrichment { record, pricing })
    }

    /// Enrich every line of the registry.
    ///
    /// Up to `concurrency` lookups run at once; records come out in line
    /// order. Lines that cannot become a record are logged and skipped.
    #[instrument(skip(self, lines), fields(count = lines.len()))]
    pub async fn enrich_all(&self, lines: &[String]) -> EnrichmentBatch {
        let outcomes: Vec<(usize, Result<Enrichment, LineError>)> =
            stream::iter(lines.iter().enumerate())
                .map(|(number, line)| async move { (number, self.enrich(line).await) })
                .buffered(self.config.concurrency.max(1))
                .collect()
                .await;

        let mut batch = EnrichmentBatch {
            records: Vec::with_capacity(outcomes.len()),
            ..Default::default()
        };

        for (number, outcome) in outcomes {
            match outcome {
                Ok(enrichment) => {
                    if enrichment.pricing.is_degraded() {
                        batch.pricing_degraded += 1;
                    }
                    batch.records.push(enrichment.record);
                }
                Err(LineError::Blank) => {
                    debug!(line = number + 1, "Skipping blank line");
                }
                Err(e) => {
                    warn!(line = number + 1, error = %e, "Skipping registry line");
                    batch.skipped += 1;
                }
            }
        }

        info!(
            records = batch.records.len(),
            skipped = batch.skipped,
            pricing_degraded = batch.pricing_degraded,
            "Enrichment completed"
        );
        batch
    }

    /// Fetch and parse the price page for one drug.
    async fn lookup_price(&self, raw_id: &str) -> PriceLookup {
        let response = match self
            .client
            .get(&self.config.price_lookup_url)
            .query(&[("specid", raw_id)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(specid = %raw_id, error = %e, "Price lookup failed");
                return PriceLookup::Failed(e.to_string());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!(specid = %raw_id, status = %status, "Price lookup returned failure status");
            return PriceLookup::Unavailable(status.as_u16());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(specid = %raw_id, error = %e, "Price page body could not be read");
                return PriceLookup::Failed(e.to_string());
            }
        };

        match parse_price_page(&body) {
            Ok(Some(info)) => PriceLookup::Found(info),
            Ok(None) => PriceLookup::NotListed,
            Err(e) => {
                warn!(specid = %raw_id, error = %e, "Price page is malformed");
                PriceLookup::Malformed(e.to_string())
            }
        }
    }
}
