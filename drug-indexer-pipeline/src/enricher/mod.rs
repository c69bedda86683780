//! Enricher module for the drug indexer pipeline.
//!
//! Maps registry lines onto drug records and adds pricing scraped from the
//! price lookup page.

pub mod price_page;
pub mod registry_line;
mod record_enricher;

pub use price_page::{parse_price_page, parse_price_text, PriceInfo, PriceParseError};
pub use record_enricher::{
    EnricherConfig, Enrichment, EnrichmentBatch, PriceLookup, RecordEnricher,
    DEFAULT_PRICE_LOOKUP_URL,
};
pub use registry_line::{parse_registry_line, ColumnMode, LineError, RegistryLine};
