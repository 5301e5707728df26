//! Social Collector
//!
//! Background enrichment service:
//! - Cursor scan over users that have no social profile row yet
//! - FullContact person lookups, paced by the rate-limit headers
//! - Valid results written to `social.users`
//! - Supervised producer/consumer loops that restart on a fault

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use fullcontact::{FullcontactClient, FullcontactConfig};
use postgres_store::{DatabaseConfig, PgStore};
use telemetry::{health, init_tracing_from_env};
use worker::{Supervisor, WorkerConfig};

/// Built-in config path; the only one allowed to be missing.
const DEFAULT_CONFIG: &str = "config/default";

/// Command line flags.
#[derive(Debug, Parser)]
#[command(name = "social-collector", version, about = "Enriches users with social profiles")]
struct Args {
    /// Config file path; the extension picks the format and may be omitted
    #[arg(long, env = "SOCIAL_COLLECTOR_CONFIG", default_value = DEFAULT_CONFIG)]
    config: String,

    /// Create the schemas and tables if they do not exist
    #[arg(long)]
    init_schema: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    fullcontact: FullcontactConfig,

    #[serde(default)]
    database: DatabaseConfig,

    #[serde(default)]
    worker: WorkerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    let args = Args::parse();

    info!("Starting Social Collector v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    info!(
        fullcontact_url = %config.fullcontact.url,
        database = %config.database.dsn(),
        batch_size = config.worker.batch_size,
        "Loaded config"
    );
    if config.fullcontact.api_key.is_empty() {
        warn!("FullContact API key is empty, lookups will be rejected");
    }

    let store = Arc::new(
        PgStore::connect(&config.database)
            .await
            .context("Failed to connect to PostgreSQL")?,
    );

    if args.init_schema {
        postgres_store::schema::init_schema(&store)
            .await
            .context("Failed to initialize PostgreSQL schema")?;
        info!("PostgreSQL schema initialized");
    }

    if !postgres_store::health::check_connection(&store).await {
        error!("PostgreSQL connection: unhealthy");
    }

    let client = Arc::new(
        FullcontactClient::new(config.fullcontact.clone())
            .context("Failed to create FullContact client")?,
    );

    let supervisor = Arc::new(Supervisor::new(
        config.worker.clone(),
        store.clone(),
        store.clone(),
        client,
    ));

    let shutdown = CancellationToken::new();
    let supervisor_handle = supervisor.start(shutdown.clone());

    shutdown_signal().await;

    info!(ready = health().is_ready(), "Shutting down...");
    shutdown.cancel();

    if let Err(e) = supervisor_handle.await {
        error!("Supervisor task failed: {}", e);
    }

    store.close().await;

    let report = health().report();
    info!(status = ?report.status, "Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config(path: &str) -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Config file, format from the extension; an explicit path must exist
        .add_source(config::File::with_name(path).required(path != DEFAULT_CONFIG))
        // Override with environment variables, e.g. SOCIAL_COLLECTOR_DATABASE__HOST
        .add_source(
            config::Environment::with_prefix("SOCIAL_COLLECTOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat names for the secrets, as deployments usually inject them
    if let Ok(key) = std::env::var("SOCIAL_COLLECTOR_FULLCONTACT_KEY") {
        config.fullcontact.api_key = key;
    }
    if let Ok(password) = std::env::var("SOCIAL_COLLECTOR_DATABASE_PASSWORD") {
        config.database.password = password;
    }

    config
        .database
        .validate()
        .context("Invalid database configuration")?;

    Ok(config)
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
