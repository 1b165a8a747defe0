//! Scans against a mocked Deribit API

use chrono::NaiveDate;
use pop_scanner::instrument::OptionType;
use pop_scanner::market::{DeribitClient, DeribitConfig, MarketDataError, MarketDataSource};
use pop_scanner::model::PremiumUnit;
use pop_scanner::scan::{ScanError, ScanRequest, ScanSettings, Scanner, SideFilter};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TICKER_PATH: &str = "/api/v2/public/ticker";
const INSTRUMENTS_PATH: &str = "/api/v2/public/get_instruments";

fn client(server: &MockServer) -> DeribitClient {
    DeribitClient::with_config(DeribitConfig {
        base_url: format!("{}/api/v2", server.uri()),
        ..Default::default()
    })
    .unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 20).unwrap()
}

fn rpc(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "result": result,
    }))
}

async fn mount_ticker(server: &MockServer, instrument: &str, result: Value) {
    Mock::given(method("GET"))
        .and(path(TICKER_PATH))
        .and(query_param("instrument_name", instrument))
        .respond_with(rpc(result))
        .mount(server)
        .await;
}

async fn mount_instruments(server: &MockServer, names: &[&str]) {
    let listing: Vec<Value> = names
        .iter()
        .map(|name| json!({ "instrument_name": name, "kind": "option" }))
        .collect();

    Mock::given(method("GET"))
        .and(path(INSTRUMENTS_PATH))
        .and(query_param("currency", "BTC"))
        .and(query_param("kind", "option"))
        .and(query_param("expired", "false"))
        .respond_with(rpc(Value::Array(listing)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_spot_price_from_perpetual() {
    let server = MockServer::start().await;
    mount_ticker(
        &server,
        "BTC-PERPETUAL",
        json!({ "index_price": 50000.0, "mark_price": 50010.0 }),
    )
    .await;

    let spot = client(&server).fetch_spot_price().await.unwrap();
    assert_eq!(spot, 50000.0);
}

#[tokio::test]
async fn test_spot_price_missing() {
    let server = MockServer::start().await;
    mount_ticker(&server, "BTC-PERPETUAL", json!({ "index_price": 0.0 })).await;

    let err = client(&server).fetch_spot_price().await.unwrap_err();
    assert!(matches!(err, MarketDataError::NoSpotPrice(ref name) if name == "BTC-PERPETUAL"));
}

#[tokio::test]
async fn test_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TICKER_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "jsonrpc": "2.0",
            "error": { "code": 10009, "message": "instrument_not_found" }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_ticker("BTC-27SEP24-99999-C")
        .await
        .unwrap_err();
    match err {
        MarketDataError::Api { code, message } => {
            assert_eq!(code, 10009);
            assert_eq!(message, "instrument_not_found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INSTRUMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0" })))
        .mount(&server)
        .await;

    let err = client(&server).fetch_instruments().await.unwrap_err();
    assert!(matches!(err, MarketDataError::Malformed(_)));
}

#[tokio::test]
async fn test_full_scan() {
    let server = MockServer::start().await;
    mount_ticker(&server, "BTC-PERPETUAL", json!({ "index_price": 50000.0 })).await;
    mount_instruments(
        &server,
        &[
            "BTC-27SEP24-52000-C",
            "BTC-27SEP24-47500-P",
            "BTC-27SEP24-60000-C",
            "BTC-PERPETUAL",
        ],
    )
    .await;
    mount_ticker(
        &server,
        "BTC-27SEP24-52000-C",
        json!({
            "best_bid_price": 0.01,
            "best_ask_price": 0.01,
            "mark_price": 0.0105,
            "mark_iv": 60.0,
            "greeks": { "delta": 0.25 }
        }),
    )
    .await;
    mount_ticker(
        &server,
        "BTC-27SEP24-47500-P",
        json!({
            "mark_price": 0.004,
            "mark_iv": 60.0,
            "greeks": { "delta": -0.2 }
        }),
    )
    .await;
    // No ticker for the 60000 call: the 404 is skipped

    let scanner = Scanner::new(Arc::new(client(&server)), ScanSettings::default());
    let request = ScanRequest {
        premium_unit: PremiumUnit::Coin,
        ..Default::default()
    };
    let result = scanner.run_scan_on(&request, today()).await.unwrap();

    assert_eq!(result.spot, 50000.0);
    assert_eq!(result.total_count, 2);

    // Default sort: pop_delta descending
    let put = &result.data[0];
    assert_eq!(put.instrument, "BTC-27SEP24-47500-P");
    assert_eq!(put.option_type, OptionType::Put);
    assert_eq!(put.pop_delta, Some(0.8));

    let call = &result.data[1];
    assert_eq!(call.instrument, "BTC-27SEP24-52000-C");
    assert_eq!(call.days_to_expiry, 7);
    assert_eq!(call.implied_vol, Some(0.6));
    assert_eq!(call.premium_native, Some(0.01));
    assert_eq!(call.premium_usd, Some(500.0));
    assert_eq!(call.breakeven, Some(52500.0));
    assert!((call.pop_lognormal.unwrap() - 0.735_238_786).abs() < 1e-6);
}

#[tokio::test]
async fn test_side_filter_skips_ticker_requests() {
    let server = MockServer::start().await;
    mount_ticker(&server, "BTC-PERPETUAL", json!({ "index_price": 50000.0 })).await;
    mount_instruments(&server, &["BTC-27SEP24-52000-C", "BTC-27SEP24-47500-P"]).await;
    Mock::given(method("GET"))
        .and(path(TICKER_PATH))
        .and(query_param("instrument_name", "BTC-27SEP24-52000-C"))
        .respond_with(rpc(json!({ "mark_price": 0.01 })))
        .expect(0)
        .mount(&server)
        .await;
    mount_ticker(
        &server,
        "BTC-27SEP24-47500-P",
        json!({ "mark_price": 0.004, "greeks": { "delta": -0.2 } }),
    )
    .await;

    let scanner = Scanner::new(Arc::new(client(&server)), ScanSettings { concurrency: 1 });
    let request = ScanRequest {
        side: SideFilter::Puts,
        ..Default::default()
    };
    let result = scanner.run_scan_on(&request, today()).await.unwrap();

    assert_eq!(result.total_count, 1);
    assert_eq!(result.data[0].option_type, OptionType::Put);
    assert_eq!(result.data[0].pop_lognormal, None);
    server.verify().await;
}

#[tokio::test]
async fn test_instrument_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_ticker(&server, "BTC-PERPETUAL", json!({ "index_price": 50000.0 })).await;
    Mock::given(method("GET"))
        .and(path(INSTRUMENTS_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let scanner = Scanner::new(Arc::new(client(&server)), ScanSettings::default());
    let err = scanner
        .run_scan_on(&ScanRequest::default(), today())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScanError::Instruments(MarketDataError::Status { status: 503, .. })
    ));
}
