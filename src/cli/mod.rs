//! CLI interface for pop-scanner
//!
//! Provides subcommands for:
//! - `scan`: Run one scan and print the ranked contracts
//! - `serve`: Serve scans over HTTP
//! - `config`: Show the effective configuration

mod scan;
mod serve;

pub use scan::ScanArgs;
pub use serve::ServeArgs;

use crate::config::Config;
use crate::market::{DeribitClient, DeribitConfig};
use crate::scan::{ScanSettings, Scanner};
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pop-scanner")]
#[command(about = "Probability-of-profit scanner for Deribit BTC options")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one scan and print the results
    Scan(ScanArgs),
    /// Serve scans over HTTP
    Serve(ServeArgs),
    /// Show configuration
    Config,
}

/// Scanner over the live Deribit API
pub(crate) fn deribit_scanner(config: &Config, currency: Option<&str>) -> anyhow::Result<Scanner> {
    let mut deribit = DeribitConfig::from(&config.exchange);
    if let Some(currency) = currency {
        deribit.currency = currency.to_uppercase();
    }
    let client = DeribitClient::with_config(deribit)?;
    Ok(Scanner::new(Arc::new(client), ScanSettings::from(&config.scan)))
}
