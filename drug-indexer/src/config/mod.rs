//! Configuration and dependency wiring for the drug indexer.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{IndexerSettings, LogFormat};
