//! # Drug Indexer Pipeline
//!
//! This crate provides the pipeline components for downloading the drug
//! registry, enriching it with prices, and indexing it into OpenSearch.
//!
//! ## Architecture
//!
//! The pipeline follows the Fetcher-Enricher-Loader pattern:
//!
//! 1. **Fetcher**: Downloads the tab-delimited registry file
//! 2. **Enricher**: Turns each line into a record and adds price data
//! 3. **Loader**: Recreates the index and bulk loads the records
//! 4. **Orchestrator**: Runs the stages in order

pub mod enricher;
pub mod errors;
pub mod fetcher;
pub mod loader;
pub mod orchestrator;

#[cfg(test)]
mod test_support;

pub use errors::PipelineError;
