//! Lambda entry point.
//!
//! Dependencies are built on the first invocation and reused while the
//! execution environment stays warm.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{error, info};

use media_indexer::telemetry::init_tracing;
use media_indexer::{Dependencies, IndexerConfig, IndexingError};

static DEPENDENCIES: OnceCell<Dependencies> = OnceCell::const_new();

async fn init_dependencies() -> Result<Dependencies, IndexingError> {
    let config = IndexerConfig::from_env()?;
    Dependencies::init(config).await
}

async fn dependencies() -> Result<&'static Dependencies, IndexingError> {
    DEPENDENCIES.get_or_try_init(init_dependencies).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("Starting media indexer");
    let result = lambda_runtime::run(service_fn(handler)).await;

    if let Some(dependencies) = DEPENDENCIES.get() {
        dependencies.shutdown();
    }
    result
}

async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    info!(request_id = %event.context.request_id, "Received invocation");

    let dependencies = dependencies().await.map_err(|e| {
        error!(error = %e, "Failed to initialize dependencies");
        e
    })?;

    let report = dependencies
        .orchestrator
        .handle_batch(&event.payload)
        .await
        .map_err(|e| {
            error!(error = %e, "Rejected invocation payload");
            IndexingError::from(e)
        })?;

    Ok(json!({
        "records": report.records,
        "undecodable": report.undecodable,
    }))
}
