//! Registry fetcher implementation.
//!
//! Issues a single GET for the registry file and splits the body into lines.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{error, info, instrument};

use crate::errors::PipelineError;

/// Default download URL of the registry file.
pub const DEFAULT_REGISTRY_URL: &str =
    "http://prod-bdm.ansm.integra.fr/telechargement.php?fichier=CIS_bdpm.txt";

/// Encoding of the registry body when the response declares no charset.
const REGISTRY_FALLBACK_CHARSET: &str = "windows-1252";

/// Configuration for the registry fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// URL of the tab-delimited registry file.
    pub registry_url: String,
    /// Timeout for the whole download.
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Downloads the drug registry.
pub struct RegistryFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl RegistryFetcher {
    /// Create a new fetcher.
    ///
    /// # Returns
    ///
    /// * `Ok(RegistryFetcher)` - A new fetcher instance
    /// * `Err(PipelineError)` - If the HTTP client cannot be built
    pub fn new(config: FetcherConfig) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::http_client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Download the registry and return its lines.
    ///
    /// Lines are returned as-is, one per drug; no structure is checked here.
    /// The body is decoded with the charset of its `Content-Type`, or as
    /// Windows-1252 when none is declared.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - The lines of the registry file
    /// * `Err(PipelineError::RegistryUnavailable)` - If the server answered with a status other than 200
    /// * `Err(PipelineError::FetchError)` - If the request or body download failed
    #[instrument(skip(self), fields(url = %self.config.registry_url))]
    pub async fn fetch_registry(&self) -> Result<Vec<String>, PipelineError> {
        let response = self
            .client
            .get(&self.config.registry_url)
            .send()
            .await
            .map_err(|e| PipelineError::fetch(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(status = %status, "Registry download failed");
            return Err(PipelineError::RegistryUnavailable {
                status: status.as_u16(),
            });
        }

        let body = response
            .text_with_charset(REGISTRY_FALLBACK_CHARSET)
            .await
            .map_err(|e| PipelineError::fetch(e.to_string()))?;

        let lines: Vec<String> = body.lines().map(str::to_string).collect();

        info!(count = lines.len(), "Fetched registry");
        Ok(lines)
    }
}
