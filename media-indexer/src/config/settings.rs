//! Environment configuration.

use std::env;
use std::time::Duration;

use crate::IndexingError;
use media_indexer_ingest::LoaderConfig;
use media_indexer_repository::ClientTuning;

/// Search domain endpoint, a bare host or a full URL.
const ES_ENDPOINT: &str = "EsEndpoint";
/// Bucket holding operator results.
const DATAPLANE_BUCKET: &str = "DataplaneBucket";
/// JSON blob of AWS client tuning.
const CLIENT_TUNING: &str = "botoConfig";
/// Bulk payload ceiling in bytes.
const MAX_PAYLOAD_SIZE: &str = "MAX_BULK_INDEX_PAYLOAD_SIZE";
/// Timeout for single-document writes, in seconds.
const REQUEST_TIMEOUT: &str = "INDEX_REQUEST_TIMEOUT_SECONDS";

/// Process-wide configuration, read once at cold start.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerConfig {
    /// Search domain endpoint.
    pub es_endpoint: String,
    /// Bucket holding operator results.
    pub dataplane_bucket: String,
    /// AWS client tuning.
    pub client_tuning: ClientTuning,
    /// Bulk indexer settings.
    pub loader: LoaderConfig,
}

impl IndexerConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `EsEndpoint`: search domain host or URL (required)
    /// - `DataplaneBucket`: bucket holding operator results (required)
    /// - `botoConfig`: AWS client tuning JSON (default: `{}`)
    /// - `MAX_BULK_INDEX_PAYLOAD_SIZE`: bulk payload ceiling in bytes (default: 5000000)
    /// - `INDEX_REQUEST_TIMEOUT_SECONDS`: single-document write timeout (default: 30)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| IndexingError::config(format!("{} is not set", key)))
        };

        let es_endpoint = required(ES_ENDPOINT)?;
        let dataplane_bucket = required(DATAPLANE_BUCKET)?;

        let client_tuning = match lookup(CLIENT_TUNING) {
            Some(raw) => ClientTuning::from_json(&raw)
                .map_err(|e| IndexingError::config(format!("{} is not valid: {}", CLIENT_TUNING, e)))?,
            None => ClientTuning::default(),
        };

        let defaults = LoaderConfig::default();
        let max_payload_bytes = match lookup(MAX_PAYLOAD_SIZE) {
            Some(raw) => parse_positive(MAX_PAYLOAD_SIZE, &raw)?,
            None => defaults.max_payload_bytes,
        };
        let request_timeout = match lookup(REQUEST_TIMEOUT) {
            Some(raw) => Duration::from_secs(parse_positive(REQUEST_TIMEOUT, &raw)? as u64),
            None => defaults.request_timeout,
        };

        Ok(Self {
            es_endpoint,
            dataplane_bucket,
            client_tuning,
            loader: LoaderConfig {
                max_payload_bytes,
                request_timeout,
            },
        })
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<usize, IndexingError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(IndexingError::config(format!(
            "{} must be a positive integer, got {:?}",
            key, raw
        ))),
    }
}
