use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use snafu::ResultExt as _;

use crate::database::DatabaseConfig;
use crate::error::{ApplicationError, ConfigLoadSnafu};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address")]
    pub host: SocketAddr,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// `tracing` directives used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Bearer token that unlocks `/admin/api`.
    pub admin_token: String,
    #[serde(flatten)]
    pub database: DatabaseConfig,
    #[serde(flatten)]
    pub ticker: TickerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickerConfig {
    #[serde(rename = "dexscreener_endpoint", default = "default_endpoint")]
    pub endpoint: String,
    #[serde(rename = "token_pair_address", default = "default_pair_address")]
    pub pair_address: String,
    #[serde(rename = "token_address", default = "default_token_address")]
    pub token_address: String,
    /// How often the price is refreshed, as a humantime string such as `30s`.
    #[serde(
        rename = "ticker_interval",
        default = "default_interval",
        deserialize_with = "interval"
    )]
    pub interval: Duration,
}

pub fn load() -> Result<Config, ApplicationError> {
    envy::from_env::<Config>().context(ConfigLoadSnafu)
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_filter() -> String {
    "info,tower_http=info,surrealdb=warn".to_string()
}

fn default_endpoint() -> String {
    "https://api.dexscreener.com/latest/dex/pairs/bsc".to_string()
}

fn default_pair_address() -> String {
    "0x5bbF5Ce11531c16929fac62e0391caae1cce4674".to_string()
}

fn default_token_address() -> String {
    "0x7f890a4a575558307826c82e4cb6e671f3178bfc".to_string()
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

fn interval<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    let duration = humantime::parse_duration(&text).map_err(serde::de::Error::custom)?;

    if duration.is_zero() {
        return Err(serde::de::Error::custom("ticker interval must be greater than zero"));
    }

    Ok(duration)
}
