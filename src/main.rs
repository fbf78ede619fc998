//! Enrolment Ingestion & Analytics Engine
//!
//! HTTP service that:
//! - ingests enrolment CSVs in any of the known column dialects
//! - syncs pages from the public open-data registry
//! - serves summary, trend, age and anomaly analytics over the stored records

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AppState};
use clickhouse_client::{ClickHouseClient, ClickHouseConfig, ClickHouseStore};
use engine_core::{MemoryStore, RecordStore};
use registry::{RegistryClient, RegistryConfig};
use telemetry::{health, init_tracing_from_env};

/// Where records are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StoreBackend {
    #[default]
    Clickhouse,
    Memory,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    store: StoreBackend,

    #[serde(default)]
    clickhouse: ClickHouseConfig,

    #[serde(default)]
    registry: RegistryConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreBackend::default(),
            clickhouse: ClickHouseConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Enrolment Engine v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        store = ?config.store,
        registry = %config.registry.base_url,
        api_key_set = config.registry.has_api_key(),
        "Loaded configuration"
    );

    let store = build_store(&config).await?;

    let registry = Arc::new(
        RegistryClient::new(&config.registry).context("Failed to create registry client")?,
    );

    check_health(&config, store.as_ref()).await;

    let state = AppState::new(store, registry);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Builds the configured record store, creating the ClickHouse schema if asked.
async fn build_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    match config.store {
        StoreBackend::Memory => {
            warn!("Using in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Clickhouse => {
            let client = ClickHouseClient::new(config.clickhouse.clone());

            if config.clickhouse.init_schema {
                if let Err(e) = clickhouse_client::init_schema(&client).await {
                    // The table may already exist under a user without DDL rights.
                    error!("Failed to initialize ClickHouse schema: {}", e);
                }
            }

            Ok(Arc::new(ClickHouseStore::new(client)))
        }
    }
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("ENROLMENT")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Nested keys with underscores don't survive the `__` separator, so the
    // common ones are read explicitly.
    if let Ok(backend) = std::env::var("ENROLMENT_STORE") {
        config.store = match backend.to_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "clickhouse" => StoreBackend::Clickhouse,
            other => anyhow::bail!("Unknown store backend: {}", other),
        };
    }

    if let Ok(url) = std::env::var("ENROLMENT_CLICKHOUSE_URL") {
        config.clickhouse.url = url;
    }
    if let Ok(database) = std::env::var("ENROLMENT_CLICKHOUSE_DATABASE") {
        config.clickhouse.database = database;
    }
    if let Ok(username) = std::env::var("ENROLMENT_CLICKHOUSE_USERNAME") {
        config.clickhouse.username = Some(username);
    }
    if let Ok(password) = std::env::var("ENROLMENT_CLICKHOUSE_PASSWORD") {
        config.clickhouse.password = Some(password);
    }

    if let Ok(base_url) = std::env::var("ENROLMENT_REGISTRY_BASE_URL") {
        config.registry.base_url = base_url;
    }
    if let Ok(resource_id) = std::env::var("ENROLMENT_REGISTRY_RESOURCE_ID") {
        config.registry.resource_id = resource_id;
    }
    if let Some(key) = std::env::var("ENROLMENT_REGISTRY_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .ok()
    {
        config.registry.api_key = Some(key);
    }

    Ok(config)
}

/// Check component health on startup.
async fn check_health(config: &Config, store: &dyn RecordStore) {
    if store.ping().await {
        health().store.set_healthy();
        info!("Record store: healthy");
    } else {
        health().store.set_unhealthy("Connection failed");
        error!("Record store: unhealthy");
    }

    // Reachability is confirmed by the first successful page fetch.
    if config.registry.has_api_key() {
        health().registry.set_healthy();
    } else {
        health().registry.set_unhealthy("API key not configured");
        warn!("Registry API key missing; sync requests may be rejected upstream");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
