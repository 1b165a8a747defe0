//! Market data module
//!
//! Read-only access to the exchange's public market data: spot price,
//! listed option instruments, and per-instrument tickers.

mod deribit;

pub use deribit::{DeribitClient, DeribitConfig, DERIBIT_API_URL};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Market data errors
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// Connection, timeout or body decoding failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// JSON-RPC error envelope returned by the exchange
    #[error("exchange error {code}: {message}")]
    Api { code: i64, message: String },
    /// Response parsed but did not carry the expected payload
    #[error("malformed response: {0}")]
    Malformed(String),
    /// Spot ticker had no usable index, mark or last price
    #[error("no usable spot price for {0}")]
    NoSpotPrice(String),
}

/// A listed instrument as returned by the instrument list endpoint
///
/// Expiry, strike and type are all read from the name, so the rest of the
/// listing payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstrumentDescriptor {
    /// Exchange identifier, e.g. `BTC-27SEP24-60000-C`
    #[serde(default)]
    pub instrument_name: String,
}

/// Point-in-time quote for one instrument
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerSnapshot {
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub mark_price: Option<f64>,
    pub last_price: Option<f64>,
    pub index_price: Option<f64>,
    /// Annualized mark implied volatility as a fraction (0.6 = 60%)
    pub mark_iv: Option<f64>,
    pub delta: Option<f64>,
}

impl TickerSnapshot {
    /// Reference price of a spot/perpetual ticker: index, then mark, then last.
    ///
    /// Missing, zero, negative and non-finite values are skipped.
    pub fn reference_price(&self) -> Option<f64> {
        [self.index_price, self.mark_price, self.last_price]
            .into_iter()
            .flatten()
            .find(|p| p.is_finite() && *p > 0.0)
    }
}

/// Source of market data for a scan
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Current price of the underlying
    async fn fetch_spot_price(&self) -> Result<f64, MarketDataError>;
    /// Non-expired option instruments for the configured base asset
    async fn fetch_instruments(&self) -> Result<Vec<InstrumentDescriptor>, MarketDataError>;
    /// Fresh ticker for a single instrument
    async fn fetch_ticker(&self, instrument: &str) -> Result<TickerSnapshot, MarketDataError>;
}
