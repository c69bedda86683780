//! Result types for search index operations.

use crate::errors::SearchIndexError;
use drug_indexer_shared::DrugRecord;

/// Result of a batch operation for a single document.
///
/// Indicates whether indexing one drug record succeeded and carries the
/// engine's reason when it did not.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// Registry identifier of the document.
    pub drug_id: i32,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

impl BatchOperationResult {
    /// A successful result for the given document.
    pub fn succeeded(drug_id: i32) -> Self {
        Self {
            drug_id,
            success: true,
            error: None,
        }
    }

    /// A failed result for the given document.
    pub fn failed(drug_id: i32, error: SearchIndexError) -> Self {
        Self {
            drug_id,
            success: false,
            error: Some(error),
        }
    }
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// A bulk write is not transactional: when `failed > 0` the documents listed
/// as successful are already in the index.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each document.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// An empty summary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a summary from individual results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Mark every document of a chunk as failed with the same error.
    pub fn all_failed(documents: &[DrugRecord], error: &SearchIndexError) -> Self {
        Self::from_results(
            documents
                .iter()
                .map(|doc| BatchOperationResult::failed(doc.drug_id, error.clone()))
                .collect(),
        )
    }

    /// Concatenate summaries, preserving result order.
    pub fn merge(summaries: impl IntoIterator<Item = BatchOperationSummary>) -> Self {
        Self::from_results(summaries.into_iter().flat_map(|s| s.results).collect())
    }

    /// Whether some, but not necessarily all, documents were rejected.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Results of the rejected documents.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_results_counts() {
        let summary = BatchOperationSummary::from_results(vec![
            BatchOperationResult::succeeded(1),
            BatchOperationResult::failed(2, SearchIndexError::index("mapper_parsing_exception")),
            BatchOperationResult::succeeded(3),
        ]);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
        let failed: Vec<i32> = summary.failures().map(|r| r.drug_id).collect();
        assert_eq!(failed, vec![2]);
    }

    #[test]
    fn test_merge_preserves_order() {
        let first = BatchOperationSummary::from_results(vec![
            BatchOperationResult::succeeded(1),
            BatchOperationResult::succeeded(2),
        ]);
        let second = BatchOperationSummary::from_results(vec![BatchOperationResult::failed(
            3,
            SearchIndexError::bulk_operation("timeout"),
        )]);

        let merged = BatchOperationSummary::merge(vec![first, second]);

        assert_eq!(merged.total, 3);
        assert_eq!(merged.failed, 1);
        let ids: Vec<i32> = merged.results.iter().map(|r| r.drug_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty() {
        let summary = BatchOperationSummary::empty();
        assert_eq!(summary.total, 0);
        assert!(!summary.has_failures());
    }
}
