//! Configuration types for pop-scanner

use crate::market::{DeribitConfig, DERIBIT_API_URL};
use crate::scan::ScanSettings;
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Exchange API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Underlying currency whose options are scanned
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Timeout for spot and ticker lookups (seconds)
    #[serde(default = "default_ticker_timeout_secs")]
    pub ticker_timeout_secs: u64,

    /// Timeout for the instrument list (seconds)
    #[serde(default = "default_instruments_timeout_secs")]
    pub instruments_timeout_secs: u64,
}

fn default_base_url() -> String {
    DERIBIT_API_URL.to_string()
}
fn default_currency() -> String {
    "BTC".to_string()
}
fn default_ticker_timeout_secs() -> u64 {
    15
}
fn default_instruments_timeout_secs() -> u64 {
    30
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            currency: default_currency(),
            ticker_timeout_secs: default_ticker_timeout_secs(),
            instruments_timeout_secs: default_instruments_timeout_secs(),
        }
    }
}

impl From<&ExchangeConfig> for DeribitConfig {
    fn from(config: &ExchangeConfig) -> Self {
        DeribitConfig {
            base_url: config.base_url.clone(),
            currency: config.currency.to_uppercase(),
            ticker_timeout: Duration::from_secs(config.ticker_timeout_secs),
            instruments_timeout: Duration::from_secs(config.instruments_timeout_secs),
        }
    }
}

/// Scan execution configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Ticker requests in flight at once (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    4
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl From<&ScanConfig> for ScanSettings {
    fn from(config: &ScanConfig) -> Self {
        ScanSettings {
            concurrency: config.concurrency.max(1),
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port, used by `serve`
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
