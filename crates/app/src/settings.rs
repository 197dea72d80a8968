//! Application settings.
//!
//! Loaded from an optional `corebank.toml` next to the binary, overridden by
//! `COREBANK_*` environment variables (e.g. `COREBANK_SERVER__PORT=9000`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    /// Transfer ceiling override in minor units.
    pub max_transfer_minor: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 8000)?
            .set_default("server.database", "memory")?
            .add_source(File::with_name("corebank").required(false))
            .add_source(Environment::with_prefix("COREBANK").separator("__"))
            .build()?
            .try_deserialize()
    }
}
