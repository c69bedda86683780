//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the drug index.

use serde_json::{json, Value};

/// Default name of the search index.
pub const INDEX_NAME: &str = "drugs";

/// Get the index settings and mappings for the drug index.
///
/// The configuration includes:
/// - **integer** id and reimbursement rate
/// - **text** fields for the descriptive registry columns
/// - a **date** field in the registry's `dd/MM/yyyy` format
/// - a **float** price
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 0 replicas
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0
        },
        "mappings": {
            "properties": {
                "drug_id": {
                    "type": "integer"
                },
                "drug_name": {
                    "type": "text"
                },
                "drug_type": {
                    "type": "text"
                },
                "drug_administration": {
                    "type": "text"
                },
                "authorization_status": {
                    "type": "text"
                },
                "authorization_type": {
                    "type": "text"
                },
                "commercial_status": {
                    "type": "text"
                },
                "date_of_circulation": {
                    "type": "date",
                    "format": "dd/MM/yyyy"
                },
                "price_with_honorary": {
                    "type": "float"
                },
                "repayment_rate": {
                    "type": "integer"
                }
            }
        }
    })
}
