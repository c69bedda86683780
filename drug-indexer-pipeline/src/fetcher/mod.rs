//! Fetcher module for the drug indexer pipeline.
//!
//! Downloads the drug registry file.

mod registry_fetcher;

pub use registry_fetcher::{FetcherConfig, RegistryFetcher, DEFAULT_REGISTRY_URL};
