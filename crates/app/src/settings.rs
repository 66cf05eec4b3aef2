//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite { path: String },
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter, e.g. `info` or `debug`.
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    /// Store connect/acquire timeout in seconds (default 5).
    pub database_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Schedulers {
    /// Refresh crypto prices every N minutes; absent disables the
    /// refresher.
    pub price_refresh_minutes: Option<u64>,
    /// Base URL of the price feed, e.g. `https://prices.example.com`.
    pub price_feed_url: Option<String>,
    /// Process due subscriptions every N hours; absent disables the
    /// processor.
    pub subscription_run_hours: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
    pub schedulers: Option<Schedulers>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
