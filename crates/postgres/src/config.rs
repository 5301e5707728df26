//! PostgreSQL configuration.

use collector_core::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Database connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQL driver name; only PostgreSQL is supported
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Pool acquire timeout in seconds
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_driver() -> String {
    "postgres".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            host: default_host(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            database: default_database(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    /// Rejects drivers other than PostgreSQL.
    pub fn validate(&self) -> Result<()> {
        match self.driver.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(()),
            other => Err(Error::config(format!(
                "unsupported database driver: {}",
                other
            ))),
        }
    }

    /// Connection options equivalent to the libpq string from [`Self::dsn`].
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .ssl_mode(PgSslMode::Disable);

        if !self.username.is_empty() {
            options = options.username(&self.username);
        }
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        options
    }

    /// libpq key/value form with the password masked, for logs.
    pub fn dsn(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode=disable",
            self.host,
            self.port,
            self.username,
            if self.password.is_empty() { "" } else { "***" },
            self.database
        )
    }
}
