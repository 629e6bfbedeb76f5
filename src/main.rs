//! Plantify API server
//!
//! Reads configuration from the environment (and `.env` if present),
//! connects to MongoDB and serves the catalog routes. Any failure before the
//! listener is up terminates the process.

use anyhow::Result;
use plantify::config::AppConfig;
use plantify::core::{PlantStore, StorageError, StoreOperation};
use plantify::seed;
use plantify::server::ServerBuilder;
use plantify::storage::MongoPlantStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("plantify=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;

    let store = connect(&config)
        .await
        .map_err(|e| StorageError::new(StoreOperation::Connect, &e))
        .inspect_err(|e| tracing::error!(error = %e, "MongoDB connection failed"))?;

    tracing::info!(
        database = %config.database,
        collection = %config.collection,
        "Connected to MongoDB"
    );

    ServerBuilder::new()
        .with_store(store)
        .with_seed(seed::default_plants()?)
        .with_allowed_origins(config.allowed_origins.clone())
        .serve(&config.bind_addr())
        .await
}

/// Build the client and verify the deployment answers a ping
async fn connect(config: &AppConfig) -> Result<MongoPlantStore> {
    let store =
        MongoPlantStore::connect(&config.mongodb_uri, &config.database, &config.collection).await?;
    store.ping().await?;
    Ok(store)
}
