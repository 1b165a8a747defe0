//! Configuration file tests

use pop_scanner::config::Config;
use pop_scanner::market::{DeribitConfig, DERIBIT_API_URL};
use pop_scanner::telemetry::LogFormat;
use std::io::Write;

#[test]
fn test_config_example_parses() {
    let config = Config::from_toml(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.exchange.base_url, DERIBIT_API_URL);
    assert_eq!(config.exchange.currency, "BTC");
    assert_eq!(config.scan.concurrency, 4);
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    assert!(config.telemetry.metrics_port.is_none());
}

#[test]
fn test_config_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[exchange]\ncurrency = \"eth\"\nticker_timeout_secs = 3").unwrap();

    let config = Config::load(file.path()).unwrap();
    let deribit = DeribitConfig::from(&config.exchange);
    assert_eq!(deribit.spot_instrument(), "ETH-PERPETUAL");
    assert_eq!(deribit.ticker_timeout.as_secs(), 3);
    assert_eq!(deribit.instruments_timeout.as_secs(), 30);
}
