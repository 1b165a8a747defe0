//! Scan metrics
//!
//! Recorded through the `metrics` facade. Nothing is exported unless
//! `init_metrics_exporter` installed a Prometheus recorder.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CountMetric {
    /// Instruments returned by the instrument list
    InstrumentsListed,
    /// Instrument names that failed to parse
    UnparseableInstruments,
    /// Tickers fetched successfully
    TickersFetched,
    /// Ticker fetches that failed and were skipped
    TickerFailures,
    /// Rows that passed every filter
    RowsEmitted,
}

impl CountMetric {
    fn name(&self) -> &'static str {
        match self {
            CountMetric::InstrumentsListed => "popscan_instruments_listed_total",
            CountMetric::UnparseableInstruments => "popscan_instruments_unparseable_total",
            CountMetric::TickersFetched => "popscan_tickers_fetched_total",
            CountMetric::TickerFailures => "popscan_ticker_failures_total",
            CountMetric::RowsEmitted => "popscan_rows_emitted_total",
        }
    }
}

/// Add to a counter
pub fn increment(metric: CountMetric, value: u64) {
    let metric_name = metric.name();
    metrics::counter!(metric_name).increment(value);
    tracing::trace!(metric = metric_name, value, "Incrementing counter");
}

/// Record how long a whole scan took
pub fn record_scan_duration(duration: Duration) {
    let value_ms = duration.as_secs_f64() * 1000.0;
    metrics::histogram!("popscan_scan_duration_ms").record(value_ms);
    tracing::debug!(metric = "popscan_scan_duration_ms", value_ms, "Recording latency");
}

/// Serve Prometheus metrics on `0.0.0.0:port`. Must run inside a Tokio runtime.
pub fn init_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        for metric in [
            CountMetric::InstrumentsListed,
            CountMetric::UnparseableInstruments,
            CountMetric::TickersFetched,
            CountMetric::TickerFailures,
            CountMetric::RowsEmitted,
        ] {
            assert!(metric.name().starts_with("popscan_"));
            assert!(metric.name().ends_with("_total"));
        }
    }

    #[test]
    fn test_recording_without_exporter_is_noop() {
        increment(CountMetric::RowsEmitted, 3);
        record_scan_duration(Duration::from_millis(12));
    }
}
