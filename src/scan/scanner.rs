//! Scan orchestration
//!
//! One scan: spot, instrument list, listing filters, tickers through a
//! bounded pool, quote filters, POP metrics, sort, limit.

use super::filter::{ContractFilter, FilterResult};
use super::rank::{sort_rows, truncate};
use super::request::{ScanParams, ScanRequest};
use super::{ContractRow, ScanError, ScanResult, TickerFetchError};
use crate::instrument::{parse_instrument, ParsedInstrument};
use crate::market::{MarketDataSource, TickerSnapshot};
use crate::model::{self, estimate_premium_native, PopInputs, PremiumNormalizer};
use crate::telemetry::{self, CountMetric};
use chrono::{NaiveDate, Utc};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

/// Scanner tuning
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Ticker requests in flight at once; 1 is fully sequential
    pub concurrency: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// A listing that passed the expiry and side filters
struct Candidate {
    name: String,
    parsed: ParsedInstrument,
    days_to_expiry: i64,
}

/// Runs scans against a market data source
pub struct Scanner {
    source: Arc<dyn MarketDataSource>,
    settings: ScanSettings,
}

impl Scanner {
    pub fn new(source: Arc<dyn MarketDataSource>, settings: ScanSettings) -> Self {
        Self { source, settings }
    }

    /// Validate raw parameters, then scan. Invalid parameters fail before
    /// any network call.
    pub async fn scan(&self, params: ScanParams) -> Result<ScanResult, ScanError> {
        let request = ScanRequest::try_from(params)?;
        self.run_scan(&request).await
    }

    /// Scan with today's UTC date
    pub async fn run_scan(&self, request: &ScanRequest) -> Result<ScanResult, ScanError> {
        self.run_scan_on(request, Utc::now().date_naive()).await
    }

    /// Scan as of `today`
    pub async fn run_scan_on(
        &self,
        request: &ScanRequest,
        today: NaiveDate,
    ) -> Result<ScanResult, ScanError> {
        let started = Instant::now();

        let spot = self.source.fetch_spot_price().await.map_err(ScanError::Spot)?;
        let instruments = self
            .source
            .fetch_instruments()
            .await
            .map_err(ScanError::Instruments)?;
        telemetry::increment(CountMetric::InstrumentsListed, instruments.len() as u64);

        let filter = ContractFilter::new(request);
        let candidates: Vec<Candidate> = instruments
            .into_iter()
            .filter_map(|descriptor| {
                let name = descriptor.instrument_name;
                if name.is_empty() {
                    return None;
                }
                let Some(parsed) = parse_instrument(&name) else {
                    tracing::debug!(instrument = %name, "Skipping unparseable instrument");
                    telemetry::increment(CountMetric::UnparseableInstruments, 1);
                    return None;
                };
                let days_to_expiry = parsed.days_to_expiry(today);
                match filter.check_listing(&parsed, days_to_expiry) {
                    FilterResult::Pass => Some(Candidate {
                        name,
                        parsed,
                        days_to_expiry,
                    }),
                    FilterResult::Reject(reason) => {
                        tracing::trace!(instrument = %name, ?reason, "Listing filtered");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(
            candidates = candidates.len(),
            concurrency = self.settings.concurrency,
            "Fetching tickers"
        );

        let source = &self.source;
        let fetched: Vec<(Candidate, Result<TickerSnapshot, _>)> = stream::iter(candidates)
            .map(|candidate| async move {
                let ticker = source.fetch_ticker(&candidate.name).await;
                (candidate, ticker)
            })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let normalizer = PremiumNormalizer::new(request.premium_unit, spot);
        let mut rows = Vec::new();
        for (candidate, ticker) in fetched {
            let ticker = match ticker {
                Ok(ticker) => ticker,
                Err(source) => {
                    let err = TickerFetchError {
                        instrument: candidate.name,
                        source,
                    };
                    tracing::warn!(error = %err, "Skipping instrument");
                    telemetry::increment(CountMetric::TickerFailures, 1);
                    continue;
                }
            };
            telemetry::increment(CountMetric::TickersFetched, 1);

            if let Some(row) = build_row(candidate, &ticker, spot, &normalizer, &filter) {
                rows.push(row);
            }
        }

        let total_count = rows.len();
        telemetry::increment(CountMetric::RowsEmitted, total_count as u64);

        sort_rows(&mut rows, request.sort_key, request.direction);
        truncate(&mut rows, request.limit);

        let elapsed = started.elapsed();
        telemetry::record_scan_duration(elapsed);
        tracing::info!(
            spot,
            total_count,
            returned = rows.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Scan complete"
        );

        Ok(ScanResult {
            data: rows,
            spot,
            total_count,
        })
    }
}

/// Apply quote filters and compute derived metrics. `None` when filtered.
fn build_row(
    candidate: Candidate,
    ticker: &TickerSnapshot,
    spot: f64,
    normalizer: &PremiumNormalizer,
    filter: &ContractFilter<'_>,
) -> Option<ContractRow> {
    let premium_native = estimate_premium_native(ticker);
    let premium_usd = normalizer.to_usd(premium_native);
    let delta = ticker.delta.filter(|d| d.is_finite());

    if let FilterResult::Reject(reason) = filter.check_quote(premium_usd, delta) {
        tracing::trace!(instrument = %candidate.name, ?reason, "Quote filtered");
        return None;
    }

    let implied_vol = ticker.mark_iv.filter(|v| v.is_finite() && *v > 0.0);
    let days_to_expiry = candidate.days_to_expiry.max(0);
    let estimate = model::evaluate(&PopInputs {
        option_type: candidate.parsed.option_type,
        spot,
        strike: candidate.parsed.strike,
        days_to_expiry,
        implied_vol,
        delta,
        premium_usd,
    });

    Some(ContractRow {
        instrument: candidate.name,
        option_type: candidate.parsed.option_type,
        expiry: candidate.parsed.expiry,
        days_to_expiry,
        spot,
        strike: candidate.parsed.strike,
        implied_vol,
        delta,
        premium_native,
        premium_usd,
        breakeven: estimate.breakeven,
        pop_delta: estimate.pop_delta,
        pop_lognormal: estimate.pop_lognormal,
    })
}
