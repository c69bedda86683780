//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesRefreshParts},
    BulkParts, CountParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BatchOperationResult, BatchOperationSummary};
use drug_indexer_shared::DrugRecord;

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200", Duration::from_secs(30)).await?;
/// if client.health_check().await? {
///     client.create_index("drugs", &get_index_settings()).await?;
/// }
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `timeout` - Timeout applied to every request
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, timeout: Duration) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, timeout_secs = timeout.as_secs(), "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Match the items of a `_bulk` response to the documents that were sent.
    ///
    /// Items come back in request order. A document without a matching item
    /// is reported as failed.
    fn parse_bulk_response(documents: &[DrugRecord], body: &Value) -> BatchOperationSummary {
        let items = body
            .get("items")
            .and_then(|i| i.as_array())
            .map(|items| items.as_slice())
            .unwrap_or(&[]);

        let results = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| match items.get(position) {
                Some(item) => Self::parse_bulk_item(doc.drug_id, item),
                None => BatchOperationResult::failed(
                    doc.drug_id,
                    SearchIndexError::parse("missing item in bulk response"),
                ),
            })
            .collect();

        BatchOperationSummary::from_results(results)
    }

    fn parse_bulk_item(drug_id: i32, item: &Value) -> BatchOperationResult {
        let Some(action) = item.get("index") else {
            return BatchOperationResult::failed(
                drug_id,
                SearchIndexError::parse("bulk item without index action"),
            );
        };

        if let Some(err) = action.get("error") {
            let error_type = err.get("type").and_then(|t| t.as_str()).unwrap_or("unknown");
            let reason = err.get("reason").and_then(|r| r.as_str()).unwrap_or_default();
            return BatchOperationResult::failed(
                drug_id,
                SearchIndexError::index(format!("{}: {}", error_type, reason)),
            );
        }

        match action.get("status").and_then(|s| s.as_u64()) {
            Some(status) if (200..300).contains(&status) => BatchOperationResult::succeeded(drug_id),
            Some(status) => BatchOperationResult::failed(
                drug_id,
                SearchIndexError::index(format!("status {}", status)),
            ),
            None => BatchOperationResult::failed(
                drug_id,
                SearchIndexError::parse("bulk item without status"),
            ),
        }
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            warn!(status = %status, "OpenSearch ping returned failure status");
        }
        Ok(status.is_success())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_management(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchIndexError::index_management(format!(
                "Existence check for '{}' returned status {}",
                index, status
            ))),
        }
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_management(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete index request failed");
            return Err(SearchIndexError::index_management(format!(
                "Delete of '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        debug!(index = %index, "Index deleted");
        Ok(())
    }

    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_management(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchIndexError::index_management(format!(
                "Creation of '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        debug!(index = %index, "Index created");
        Ok(())
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[DrugRecord],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BatchOperationSummary::empty());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for doc in documents {
            body.push(json!({"index": {"_id": doc.document_id()}}).into());
            let source = serde_json::to_value(doc)
                .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
            body.push(source.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_operation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_operation(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let summary = Self::parse_bulk_response(documents, &response_body);
        debug!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk request completed"
        );
        Ok(summary)
    }

    async fn refresh_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_management(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::index_management(format!(
                "Refresh of '{}' failed with status {}",
                index, status
            )));
        }
        Ok(())
    }

    async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::index_management(format!(
                "Count on '{}' failed with status {}",
                index, status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        body.get("count")
            .and_then(|c| c.as_u64())
            .ok_or_else(|| SearchIndexError::parse("count response without count"))
    }
}
