//! # Drug Indexer
//!
//! Main library for the drug registry indexer.
//!
//! This crate provides the entry point and configuration for running
//! the drug indexer pipeline.

pub mod config;

pub use config::{Dependencies, IndexerSettings, LogFormat};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] drug_indexer_pipeline::PipelineError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drug_indexer_pipeline::PipelineError;
    use drug_indexer_repository::SearchIndexError;

    fn fail_index() -> Result<(), IndexingError> {
        Err::<(), _>(PipelineError::IndexNotReady(SearchIndexError::index_management("refused")))?;
        Ok(())
    }

    #[test]
    fn test_search_failures_surface_through_pipeline_error() {
        let err = fail_index().unwrap_err();
        assert!(matches!(
            err,
            IndexingError::PipelineError(PipelineError::IndexNotReady(_))
        ));
        assert!(err.to_string().contains("refused"));
    }
}
