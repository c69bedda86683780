//! In-memory search provider shared by the loader and orchestrator tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use drug_indexer_repository::{
    BatchOperationResult, BatchOperationSummary, SearchIndexError, SearchIndexProvider,
};
use drug_indexer_shared::DrugRecord;

#[derive(Default)]
pub(crate) struct Engine {
    calls: Vec<String>,
    indices: HashMap<String, Vec<DrugRecord>>,
}

/// Provider that keeps indices in memory and logs the stage-level calls
/// (`ping`, `exists`, `delete`, `create`, `bulk`).
#[derive(Default)]
pub struct MockProvider {
    pub(crate) engine: Mutex<Engine>,
    pub rejected_ids: HashSet<i32>,
    pub fail_create: bool,
    pub unhealthy: bool,
}

impl MockProvider {
    pub async fn calls(&self) -> Vec<String> {
        self.engine.lock().await.calls.clone()
    }

    pub async fn stored(&self, index: &str) -> Vec<DrugRecord> {
        let engine = self.engine.lock().await;
        engine.indices.get(index).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl SearchIndexProvider for MockProvider {
    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.engine.lock().await.calls.push("ping".to_string());
        Ok(!self.unhealthy)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let mut engine = self.engine.lock().await;
        engine.calls.push(format!("exists {}", index));
        Ok(engine.indices.contains_key(index))
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let mut engine = self.engine.lock().await;
        engine.calls.push(format!("delete {}", index));
        engine.indices.remove(index);
        Ok(())
    }

    async fn create_index(&self, index: &str, _body: &Value) -> Result<(), SearchIndexError> {
        let mut engine = self.engine.lock().await;
        engine.calls.push(format!("create {}", index));
        if self.fail_create {
            return Err(SearchIndexError::index_management("create refused"));
        }
        engine.indices.insert(index.to_string(), Vec::new());
        Ok(())
    }

    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[DrugRecord],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let mut engine = self.engine.lock().await;
        engine.calls.push(format!("bulk {}", index));

        let stored = engine.indices.entry(index.to_string()).or_default();
        let mut results = Vec::with_capacity(documents.len());
        for doc in documents {
            if self.rejected_ids.contains(&doc.drug_id) {
                results.push(BatchOperationResult::failed(
                    doc.drug_id,
                    SearchIndexError::index("mapper_parsing_exception"),
                ));
            } else {
                stored.push(doc.clone());
                results.push(BatchOperationResult::succeeded(doc.drug_id));
            }
        }

        Ok(BatchOperationSummary::from_results(results))
    }

    async fn refresh_index(&self, _index: &str) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError> {
        Ok(self.stored(index).await.len() as u64)
    }
}

pub fn test_record(drug_id: i32) -> DrugRecord {
    DrugRecord::new(
        drug_id,
        format!("Drug {}", drug_id),
        "comprimé",
        "orale",
        "Autorisation active",
        "Procédure nationale",
        "Commercialisée",
        "01/01/2000",
    )
}
