//! Runtime configuration, read from an optional `config.toml` and the environment.
//!
//! Only the environment variables in [`ENV_KEYS`] are read; the rest of the process environment
//! is ignored.

use crate::error::Result;
use config::{Config, Environment, File, Map, Source};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// The environment variables that can override `config.toml`.
pub const ENV_KEYS: [&str; 3] = ["DATABASE_URL", "BUSY_TIMEOUT_MS", "LOG_FILTER"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path of the `sqlite3` database, usually taken from `DATABASE_URL`.
    pub database_url: String,

    /// How long a connection waits on another writer before giving up.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Fallback `tracing` filter directive, used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Settings {
    /// Loads the settings. Values in the environment (including a `.env` file) take precedence
    /// over `config.toml`.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let variables: Map<String, String> = ENV_KEYS
            .iter()
            .filter_map(|&key| env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect();

        Self::from_sources(File::with_name("config").required(false), variables)
    }

    /// Builds the settings from a file source overlaid with the given environment variables.
    fn from_sources<S>(file: S, variables: Map<String, String>) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::default()
                    .source(Some(variables))
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
