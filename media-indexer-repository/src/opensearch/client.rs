//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust client with SigV4 request signing.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use opensearch::{
    auth::Credentials,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    http::response::Response,
    BulkParts, DeleteByQueryParts, IndexParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchBackend;
use crate::types::BatchOperationSummary;
use media_indexer_shared::Document;

/// Signing name of the managed search service.
const SIGNING_SERVICE: &str = "es";

/// Resolve the configured endpoint to a URL.
///
/// Deployments usually pass the bare domain host; it is reached over HTTPS on
/// port 443. Values that already carry a scheme are used as-is.
pub fn endpoint_url(endpoint: &str) -> Result<Url, SearchError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(SearchError::connection("search endpoint is empty"));
    }

    let raw = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{}:443", endpoint.trim_end_matches('/'))
    };

    Url::parse(&raw).map_err(|e| SearchError::connection(format!("{}: {}", raw, e)))
}

/// OpenSearch backend.
///
/// Requests are signed with the credentials and region of the shared AWS SDK
/// configuration; the credentials provider refreshes them as needed.
///
/// # Example
///
/// ```ignore
/// let sdk_config = load_sdk_config(&ClientTuning::default()).await;
/// let backend = OpenSearchBackend::new("search-domain.us-west-2.es.amazonaws.com", &sdk_config)?;
/// backend.delete_by_query("_all", &delete_asset_query("asset-1")).await?;
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
}

impl OpenSearchBackend {
    /// Create a new backend connected to `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Domain host or full URL
    /// * `sdk_config` - Source of signing credentials and region
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(SearchError)` - If the endpoint or credentials are unusable
    pub fn new(endpoint: &str, sdk_config: &SdkConfig) -> Result<Self, SearchError> {
        let url = endpoint_url(endpoint)?;

        let credentials = Credentials::try_from(sdk_config)
            .map_err(|e| SearchError::connection(format!("Failed to set up signing: {}", e)))?;

        let conn_pool = SingleNodeConnectionPool::new(url.clone());
        let transport = TransportBuilder::new(conn_pool)
            .auth(credentials)
            .service_name(SIGNING_SERVICE)
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch backend");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Turn a non-2xx response into an error carrying the response body.
    async fn check_status(
        response: Response,
        to_error: fn(String) -> SearchError,
    ) -> Result<Response, SearchError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, "Search backend request failed");
        Err(to_error(format!("status {}: {}", status, body)))
    }
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn bulk(
        &self,
        index: &str,
        payload: String,
    ) -> Result<BatchOperationSummary, SearchError> {
        let bytes = payload.len();

        // The transport terminates every body element with a newline, which
        // also supplies the final newline the bulk API requires.
        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(vec![payload])
            .send()
            .await
            .map_err(|e| SearchError::bulk_index(e.to_string()))?;

        let response = Self::check_status(response, SearchError::BulkIndexError).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let summary = BatchOperationSummary::from_bulk_response(&body);
        debug!(
            index = %index,
            bytes = bytes,
            total = summary.total,
            failed = summary.failed,
            "Bulk request completed"
        );
        Ok(summary)
    }

    async fn index(
        &self,
        index: &str,
        document: &Document,
        timeout: Duration,
    ) -> Result<(), SearchError> {
        let response = self
            .client
            .index(IndexParts::Index(index))
            .body(document)
            .request_timeout(timeout)
            .send()
            .await
            .map_err(|e| SearchError::index(e.to_string()))?;

        Self::check_status(response, SearchError::IndexError).await?;

        debug!(index = %index, "Document indexed");
        Ok(())
    }

    async fn delete_by_query(&self, index: &str, query: &Value) -> Result<u64, SearchError> {
        let indices = [index];
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&indices))
            .body(query)
            .send()
            .await
            .map_err(|e| SearchError::delete(e.to_string()))?;

        let response = Self::check_status(response, SearchError::DeleteError).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let deleted = body.get("deleted").and_then(Value::as_u64).unwrap_or(0);
        debug!(index = %index, deleted = deleted, "Delete by query completed");
        Ok(deleted)
    }
}
