//! Configuration and dependency wiring for the media indexer.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::IndexerConfig;
