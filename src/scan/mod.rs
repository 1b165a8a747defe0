//! Scan pipeline module
//!
//! Turns a validated request into ranked contract rows:
//! listing filters, ticker fetch, premium and POP computation, quote
//! filters, sort and limit.

mod filter;
mod rank;
mod request;
mod scanner;

pub use filter::{ContractFilter, FilterResult, RejectReason};
pub use rank::{sort_rows, truncate};
pub use request::{
    Band, ExpiryFilter, ScanParams, ScanRequest, SideFilter, SortDirection, SortKey,
    ValidationError, DEFAULT_LIMIT,
};
pub use scanner::{ScanSettings, Scanner};

use crate::instrument::OptionType;
use crate::market::MarketDataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scan failures surfaced to the caller
#[derive(Debug, Error)]
pub enum ScanError {
    /// Request rejected before any network call
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("fetching spot price: {0}")]
    Spot(#[source] MarketDataError),
    #[error("fetching instruments: {0}")]
    Instruments(#[source] MarketDataError),
}

/// A single instrument's ticker could not be fetched; the scan skips it
#[derive(Debug, Error)]
#[error("ticker fetch failed for {instrument}: {source}")]
pub struct TickerFetchError {
    pub instrument: String,
    #[source]
    pub source: MarketDataError,
}

/// One scanned option contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRow {
    pub instrument: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub expiry: NaiveDate,
    #[serde(rename = "dte")]
    pub days_to_expiry: i64,
    pub spot: f64,
    pub strike: f64,
    #[serde(rename = "iv")]
    pub implied_vol: Option<f64>,
    pub delta: Option<f64>,
    pub premium_native: Option<f64>,
    pub premium_usd: Option<f64>,
    pub breakeven: Option<f64>,
    pub pop_delta: Option<f64>,
    #[serde(rename = "pop_logN")]
    pub pop_lognormal: Option<f64>,
}

/// Ranked rows plus the context they were computed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub data: Vec<ContractRow>,
    /// Spot price used for every row
    pub spot: f64,
    /// Rows that passed all filters, before the limit
    pub total_count: usize,
}

impl ScanResult {
    pub fn empty(spot: f64) -> Self {
        Self {
            data: Vec::new(),
            spot,
            total_count: 0,
        }
    }
}
