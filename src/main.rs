//! `foods-server`: serves the foods resource over HTTP
//!
//! Configuration comes from the YAML file named by `FOODS_CONFIG`
//! (`config/foods.yaml` when present), then environment overrides.
//! Log levels follow `RUST_LOG`.

use foods::config::AppConfig;
use foods::server::ServerBuilder;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "config/foods.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?.with_env_overrides()?;
    let builder = ServerBuilder::new().with_config(config.clone());
    let builder = with_backend(builder, &config).await?;

    builder.serve_configured().await
}

fn load_config() -> anyhow::Result<AppConfig> {
    match std::env::var("FOODS_CONFIG") {
        Ok(path) => {
            tracing::info!(path = %path, "loading configuration");
            Ok(AppConfig::from_yaml_file(path)?)
        }
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "loading configuration");
            Ok(AppConfig::from_yaml_file(DEFAULT_CONFIG_PATH)?)
        }
        Err(_) => Ok(AppConfig::default()),
    }
}

#[cfg(feature = "mongodb_backend")]
async fn with_backend(builder: ServerBuilder, config: &AppConfig) -> anyhow::Result<ServerBuilder> {
    use foods::storage::{InMemoryCollection, MongoCollection};

    if config.database.uri.is_none() {
        tracing::warn!("no MONGO_URI configured, using the in-memory collection");
        return Ok(builder.with_collection(InMemoryCollection::new()));
    }

    let collection = MongoCollection::connect(&config.database).await?;
    collection.ensure_indexes().await?;
    Ok(builder.with_collection(collection))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn with_backend(builder: ServerBuilder, config: &AppConfig) -> anyhow::Result<ServerBuilder> {
    use foods::storage::InMemoryCollection;

    if config.database.uri.is_some() {
        tracing::warn!("built without mongodb_backend, ignoring the configured URI");
    }
    tracing::info!("using the in-memory collection");
    Ok(builder.with_collection(InMemoryCollection::new()))
}
