//! Drug record as stored in the search index.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Names of the registry columns, in file order.
///
/// The registry file has no header row; the first eight columns of every
/// line map onto these names positionally.
pub const REGISTRY_FIELDS: [&str; 8] = [
    "drug_id",
    "drug_name",
    "drug_type",
    "drug_administration",
    "authorization_status",
    "authorization_type",
    "commercial_status",
    "date_of_circulation",
];

/// `chrono` format of `date_of_circulation` (`dd/MM/yyyy` on the index side).
pub const CIRCULATION_DATE_FORMAT: &str = "%d/%m/%Y";

/// One enriched row of the drug registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Registry identifier (first column).
    pub drug_id: i32,
    /// Commercial name of the drug.
    pub drug_name: String,
    /// Pharmaceutical form.
    pub drug_type: String,
    /// Administration route(s).
    pub drug_administration: String,
    /// Marketing authorization status.
    pub authorization_status: String,
    /// Marketing authorization procedure type.
    pub authorization_type: String,
    /// Commercialisation status.
    pub commercial_status: String,
    /// Date the drug entered circulation, `dd/MM/yyyy`.
    pub date_of_circulation: String,
    /// Price including the dispensing fee. `0` when unknown.
    pub price_with_honorary: f64,
    /// Reimbursement rate in percent. `0` when unknown.
    pub repayment_rate: i32,
}

impl DrugRecord {
    /// Create a record from its registry columns, with no price information.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        drug_id: i32,
        drug_name: impl Into<String>,
        drug_type: impl Into<String>,
        drug_administration: impl Into<String>,
        authorization_status: impl Into<String>,
        authorization_type: impl Into<String>,
        commercial_status: impl Into<String>,
        date_of_circulation: impl Into<String>,
    ) -> Self {
        Self {
            drug_id,
            drug_name: drug_name.into(),
            drug_type: drug_type.into(),
            drug_administration: drug_administration.into(),
            authorization_status: authorization_status.into(),
            authorization_type: authorization_type.into(),
            commercial_status: commercial_status.into(),
            date_of_circulation: date_of_circulation.into(),
            price_with_honorary: 0.0,
            repayment_rate: 0,
        }
    }

    /// Set the price and reimbursement rate scraped from the price page.
    pub fn with_pricing(mut self, price_with_honorary: f64, repayment_rate: i32) -> Self {
        self.price_with_honorary = price_with_honorary;
        self.repayment_rate = repayment_rate;
        self
    }

    /// Parse `date_of_circulation`.
    ///
    /// Returns `None` when the value does not follow `dd/MM/yyyy`; the search
    /// engine rejects such documents.
    pub fn circulation_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date_of_circulation, CIRCULATION_DATE_FORMAT).ok()
    }

    /// Document id used in the search index.
    pub fn document_id(&self) -> String {
        self.drug_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DrugRecord {
        DrugRecord::new(
            60002283,
            "ANASTROZOLE ACCORD 1 mg, comprimé pelliculé",
            "comprimé enrobé",
            "orale",
            "Autorisation active",
            "Procédure nationale",
            "Commercialisée",
            "16/03/2011",
        )
    }

    #[test]
    fn test_new_has_zero_pricing() {
        let record = sample();
        assert_eq!(record.price_with_honorary, 0.0);
        assert_eq!(record.repayment_rate, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let record = sample().with_pricing(12.5, 65);
        let value = serde_json::to_value(&record).unwrap();

        for field in REGISTRY_FIELDS {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(value["drug_id"], 60002283);
        assert_eq!(value["price_with_honorary"], 12.5);
        assert_eq!(value["repayment_rate"], 65);
        assert_eq!(value.as_object().unwrap().len(), 10);
    }

    #[test]
    fn test_circulation_date() {
        let record = sample();
        assert_eq!(
            record.circulation_date(),
            NaiveDate::from_ymd_opt(2011, 3, 16)
        );

        let mut bad = sample();
        bad.date_of_circulation = "2011-03-16".to_string();
        assert!(bad.circulation_date().is_none());
    }

    #[test]
    fn test_document_id() {
        assert_eq!(sample().document_id(), "60002283");
    }
}
