//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend. The REST calls it issues are the ones
//! Elasticsearch exposes as well.

mod client;
pub mod index_config;

pub use client::OpenSearchClient;
pub use index_config::{get_index_settings, INDEX_NAME};
