//! Settings read from the environment.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use drug_indexer_pipeline::enricher::{ColumnMode, DEFAULT_PRICE_LOOKUP_URL};
use drug_indexer_pipeline::fetcher::DEFAULT_REGISTRY_URL;
use drug_indexer_repository::opensearch::index_config::INDEX_NAME;

use crate::IndexingError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default timeout for every outbound HTTP request, in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default number of price lookups in flight.
const DEFAULT_ENRICH_CONCURRENCY: usize = 4;

/// Default number of documents per bulk request.
const DEFAULT_BULK_CHUNK_SIZE: usize = 500;

/// Default number of bulk requests in flight.
const DEFAULT_BULK_CONCURRENCY: usize = 4;

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Settings of one indexing run.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerSettings {
    pub registry_url: String,
    pub price_lookup_url: String,
    pub opensearch_url: String,
    pub index_name: String,
    pub http_timeout: Duration,
    pub enrich_concurrency: usize,
    pub bulk_chunk_size: usize,
    pub bulk_concurrency: usize,
    pub column_mode: ColumnMode,
    pub log_format: LogFormat,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            price_lookup_url: DEFAULT_PRICE_LOOKUP_URL.to_string(),
            opensearch_url: DEFAULT_OPENSEARCH_URL.to_string(),
            index_name: INDEX_NAME.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
            bulk_chunk_size: DEFAULT_BULK_CHUNK_SIZE,
            bulk_concurrency: DEFAULT_BULK_CONCURRENCY,
            column_mode: ColumnMode::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl IndexerSettings {
    /// Read the settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REGISTRY_URL`: Registry file URL
    /// - `PRICE_LOOKUP_URL`: Price page URL, queried with `?specid=<id>`
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_NAME`: Index to recreate (default: drugs)
    /// - `HTTP_TIMEOUT_SECS`: Timeout of every HTTP request (default: 30)
    /// - `ENRICH_CONCURRENCY`: Price lookups in flight (default: 4)
    /// - `BULK_CHUNK_SIZE`: Documents per bulk request (default: 500)
    /// - `BULK_CONCURRENCY`: Bulk requests in flight (default: 4)
    /// - `COLUMN_MODE`: `positional` or `compact` (default: positional)
    /// - `LOG_FORMAT`: `text` or `json` (default: text)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the settings through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs: u64 = parse_var(&var, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(IndexingError::config("HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        let settings = Self {
            registry_url: var("REGISTRY_URL").unwrap_or(defaults.registry_url),
            price_lookup_url: var("PRICE_LOOKUP_URL").unwrap_or(defaults.price_lookup_url),
            opensearch_url: var("OPENSEARCH_URL").unwrap_or(defaults.opensearch_url),
            index_name: var("INDEX_NAME").unwrap_or(defaults.index_name),
            http_timeout: Duration::from_secs(timeout_secs),
            enrich_concurrency: parse_positive(&var, "ENRICH_CONCURRENCY", defaults.enrich_concurrency)?,
            bulk_chunk_size: parse_positive(&var, "BULK_CHUNK_SIZE", defaults.bulk_chunk_size)?,
            bulk_concurrency: parse_positive(&var, "BULK_CONCURRENCY", defaults.bulk_concurrency)?,
            column_mode: parse_var(&var, "COLUMN_MODE", defaults.column_mode)?,
            log_format: parse_var(&var, "LOG_FORMAT", defaults.log_format)?,
        };

        Ok(settings)
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T, IndexingError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| IndexingError::config(format!("Invalid {} '{}': {}", key, value, e))),
        None => Ok(default),
    }
}

fn parse_positive<F>(var: &F, key: &str, default: usize) -> Result<usize, IndexingError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_var(var, key, default)?;
    if value == 0 {
        return Err(IndexingError::config(format!("{} must be greater than 0", key)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<IndexerSettings, IndexingError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IndexerSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings, IndexerSettings::default());
        assert_eq!(settings.index_name, "drugs");
        assert_eq!(settings.http_timeout, Duration::from_secs(30));
        assert_eq!(settings.column_mode, ColumnMode::Positional);
        assert_eq!(settings.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("REGISTRY_URL", "http://registry.local/CIS_bdpm.txt"),
            ("OPENSEARCH_URL", "http://search:9200"),
            ("INDEX_NAME", "drugs_v2"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("ENRICH_CONCURRENCY", "16"),
            ("BULK_CHUNK_SIZE", " 1000 "),
            ("COLUMN_MODE", "Compact"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(settings.registry_url, "http://registry.local/CIS_bdpm.txt");
        assert_eq!(settings.opensearch_url, "http://search:9200");
        assert_eq!(settings.index_name, "drugs_v2");
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
        assert_eq!(settings.enrich_concurrency, 16);
        assert_eq!(settings.bulk_chunk_size, 1000);
        assert_eq!(settings.bulk_concurrency, 4);
        assert_eq!(settings.column_mode, ColumnMode::Compact);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_value_uses_default() {
        let settings = settings_from(&[("INDEX_NAME", "  ")]).unwrap();
        assert_eq!(settings.index_name, "drugs");
    }

    #[test]
    fn test_invalid_number() {
        let result = settings_from(&[("BULK_CHUNK_SIZE", "many")]);
        assert!(matches!(result, Err(IndexingError::ConfigError(msg)) if msg.contains("BULK_CHUNK_SIZE")));
    }

    #[test]
    fn test_zero_is_rejected() {
        assert!(settings_from(&[("ENRICH_CONCURRENCY", "0")]).is_err());
        assert!(settings_from(&[("HTTP_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_unknown_column_mode() {
        let result = settings_from(&[("COLUMN_MODE", "sparse")]);
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }
}
