//! HTTP API tests against an in-memory market

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use pop_scanner::api::{router, AppState};
use pop_scanner::market::{InstrumentDescriptor, MarketDataError, MarketDataSource, TickerSnapshot};
use pop_scanner::scan::{ScanSettings, Scanner};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// One call and one put, both expiring a week from today
struct StaticMarket {
    spot: Result<f64, u16>,
}

fn option_name(strike: u32, code: char) -> String {
    let expiry = Utc::now().date_naive() + Duration::days(7);
    format!(
        "BTC-{}-{strike}-{code}",
        expiry.format("%d%b%y").to_string().to_uppercase()
    )
}

#[async_trait]
impl MarketDataSource for StaticMarket {
    async fn fetch_spot_price(&self) -> Result<f64, MarketDataError> {
        self.spot.map_err(|status| MarketDataError::Status {
            status,
            body: "unavailable".to_string(),
        })
    }

    async fn fetch_instruments(&self) -> Result<Vec<InstrumentDescriptor>, MarketDataError> {
        Ok([option_name(52000, 'C'), option_name(47500, 'P')]
            .into_iter()
            .map(|instrument_name| InstrumentDescriptor {
                instrument_name,
                ..Default::default()
            })
            .collect())
    }

    async fn fetch_ticker(&self, instrument: &str) -> Result<TickerSnapshot, MarketDataError> {
        let delta = if instrument.ends_with("-C") { 0.25 } else { -0.2 };
        Ok(TickerSnapshot {
            mark_price: Some(0.01),
            mark_iv: Some(0.6),
            delta: Some(delta),
            ..Default::default()
        })
    }
}

fn app(spot: Result<f64, u16>) -> axum::Router {
    let scanner = Scanner::new(Arc::new(StaticMarket { spot }), ScanSettings::default());
    router(AppState::new(scanner))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_index() {
    let (status, body) = get(app(Ok(50000.0)), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "BTC POP Scanner API running");
}

#[tokio::test]
async fn test_health() {
    let response = app(Ok(50000.0))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_scan_defaults() {
    let (status, body) = get(app(Ok(50000.0)), "/scan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spot"], 50000.0);
    assert_eq!(body["total_count"], 2);

    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows[0]["type"], "P");
    assert_eq!(rows[0]["dte"], 7);
    assert_eq!(rows[1]["type"], "C");
    assert!(rows[1]["pop_logN"].is_number());
}

#[tokio::test]
async fn test_scan_with_filters() {
    let (status, body) = get(
        app(Ok(50000.0)),
        "/scan?side=calls&dte_max=30&premium_in_btc=true&sort=strike&desc=false&limit=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["data"][0]["premium_usd"], 500.0);
    assert_eq!(body["data"][0]["breakeven"], 52500.0);
}

#[tokio::test]
async fn test_scan_invalid_sort() {
    let (status, body) = get(app(Ok(50000.0)), "/scan?sort=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("bogus"));
}

#[tokio::test]
async fn test_scan_conflicting_expiry_filters() {
    let (status, body) = get(app(Ok(50000.0)), "/scan?dte_max=7&expiry=2024-09-27").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_scan_market_failure() {
    let (status, body) = get(app(Err(503)), "/scan").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("spot price"));
}

#[tokio::test]
async fn test_scan_malformed_query_value() {
    let (status, body) = get(app(Ok(50000.0)), "/scan?dte_max=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("dte_max"));
}

#[tokio::test]
async fn test_scan_premium_flag_by_presence() {
    for uri in [
        "/scan?side=calls&premium_in_btc",
        "/scan?side=calls&premium_in_btc=",
        "/scan?side=calls&premium_in_btc=1",
        "/scan?side=calls&premium_in_btc=true",
    ] {
        let (status, body) = get(app(Ok(50000.0)), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["data"][0]["premium_usd"], 500.0, "{uri}");
    }

    let (status, body) = get(app(Ok(50000.0)), "/scan?side=calls&premium_in_btc=false").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["premium_usd"], 0.01);
}
