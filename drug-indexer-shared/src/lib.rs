//! # Drug Indexer Shared
//!
//! Types shared by the repository, pipeline and binary crates of the drug
//! registry indexer.

mod drug;

pub use drug::{DrugRecord, CIRCULATION_DATE_FORMAT, REGISTRY_FIELDS};
