//! Deribit public API client
//!
//! All endpoints are unauthenticated JSON-RPC-over-HTTP GETs under
//! `/api/v2/public`. Successful calls wrap their payload in `result`; failures
//! carry an `error` object, usually alongside HTTP 400.

use super::{InstrumentDescriptor, MarketDataError, MarketDataSource, TickerSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Deribit API base URL
pub const DERIBIT_API_URL: &str = "https://www.deribit.com/api/v2";

/// Configuration for the Deribit client
#[derive(Debug, Clone)]
pub struct DeribitConfig {
    /// Base URL, without a trailing `/public`
    pub base_url: String,
    /// Underlying currency, e.g. "BTC"
    pub currency: String,
    /// Timeout for spot and ticker lookups
    pub ticker_timeout: Duration,
    /// Timeout for the full instrument list
    pub instruments_timeout: Duration,
}

impl Default for DeribitConfig {
    fn default() -> Self {
        Self {
            base_url: DERIBIT_API_URL.to_string(),
            currency: "BTC".to_string(),
            ticker_timeout: Duration::from_secs(15),
            instruments_timeout: Duration::from_secs(30),
        }
    }
}

impl DeribitConfig {
    /// Perpetual swap used as the spot reference
    pub fn spot_instrument(&self) -> String {
        format!("{}-PERPETUAL", self.currency)
    }
}

/// Client for Deribit's public market data
pub struct DeribitClient {
    config: DeribitConfig,
    client: Client,
}

impl DeribitClient {
    /// Create a client with custom configuration
    pub fn with_config(config: DeribitConfig) -> Result<Self, MarketDataError> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    fn endpoint_url(&self, method: &str) -> String {
        format!(
            "{}/public/{}",
            self.config.base_url.trim_end_matches('/'),
            method
        )
    }

    /// Issue one GET and unwrap the JSON-RPC envelope
    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T, MarketDataError> {
        let url = self.endpoint_url(method);
        tracing::debug!(url = %url, ?query, "Requesting Deribit endpoint");

        let response = self
            .client
            .get(&url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(RpcEnvelope::<serde_json::Value> {
                error: Some(err), ..
            }) = serde_json::from_str(&body)
            {
                return Err(err.into());
            }
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: RpcEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::Malformed(format!("{method}: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(err.into());
        }

        envelope
            .result
            .ok_or_else(|| MarketDataError::Malformed(format!("{method}: missing result")))
    }

    async fn ticker(&self, instrument: &str) -> Result<TickerSnapshot, MarketDataError> {
        let raw: DeribitTicker = self
            .get(
                "ticker",
                &[("instrument_name", instrument)],
                self.config.ticker_timeout,
            )
            .await?;
        Ok(raw.into())
    }
}

#[async_trait]
impl MarketDataSource for DeribitClient {
    async fn fetch_spot_price(&self) -> Result<f64, MarketDataError> {
        let instrument = self.config.spot_instrument();
        let ticker = self.ticker(&instrument).await?;
        let spot = ticker
            .reference_price()
            .ok_or(MarketDataError::NoSpotPrice(instrument))?;

        tracing::debug!(spot, currency = %self.config.currency, "Fetched spot price");
        Ok(spot)
    }

    async fn fetch_instruments(&self) -> Result<Vec<InstrumentDescriptor>, MarketDataError> {
        let instruments: Vec<InstrumentDescriptor> = self
            .get(
                "get_instruments",
                &[
                    ("currency", self.config.currency.as_str()),
                    ("kind", "option"),
                    ("expired", "false"),
                ],
                self.config.instruments_timeout,
            )
            .await?;

        tracing::info!(
            count = instruments.len(),
            currency = %self.config.currency,
            "Fetched option instruments"
        );
        Ok(instruments)
    }

    async fn fetch_ticker(&self, instrument: &str) -> Result<TickerSnapshot, MarketDataError> {
        self.ticker(instrument).await
    }
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    #[serde(default)]
    message: String,
}

impl From<RpcError> for MarketDataError {
    fn from(err: RpcError) -> Self {
        MarketDataError::Api {
            code: err.code,
            message: err.message,
        }
    }
}

/// Raw ticker payload
#[derive(Debug, Default, Deserialize)]
struct DeribitTicker {
    #[serde(default, alias = "best_bid")]
    best_bid_price: Option<f64>,
    #[serde(default, alias = "best_ask")]
    best_ask_price: Option<f64>,
    #[serde(default)]
    mark_price: Option<f64>,
    #[serde(default)]
    last_price: Option<f64>,
    #[serde(default)]
    index_price: Option<f64>,
    /// Percent, e.g. 62.5
    #[serde(default)]
    mark_iv: Option<f64>,
    #[serde(default)]
    greeks: Option<DeribitGreeks>,
}

#[derive(Debug, Default, Deserialize)]
struct DeribitGreeks {
    #[serde(default)]
    delta: Option<f64>,
}

impl From<DeribitTicker> for TickerSnapshot {
    fn from(raw: DeribitTicker) -> Self {
        TickerSnapshot {
            best_bid: raw.best_bid_price,
            best_ask: raw.best_ask_price,
            mark_price: raw.mark_price,
            last_price: raw.last_price,
            index_price: raw.index_price,
            mark_iv: raw.mark_iv.map(|iv| iv / 100.0),
            delta: raw.greeks.and_then(|g| g.delta),
        }
    }
}
