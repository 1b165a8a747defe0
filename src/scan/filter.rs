//! Contract filtering
//!
//! Listing checks (expiry, side) run before a ticker is fetched; quote checks
//! (premium band, delta band) run on the fetched ticker.

use super::request::{ExpiryFilter, ScanRequest};
use crate::instrument::{OptionType, ParsedInstrument};
use chrono::NaiveDate;

/// Result of applying filters to a contract
#[derive(Debug, Clone, PartialEq)]
pub enum FilterResult {
    /// Contract passed all filters
    Pass,
    /// Contract rejected
    Reject(RejectReason),
}

impl FilterResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, FilterResult::Pass)
    }
}

/// Reason for contract rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Expiry differs from the requested date
    ExpiryMismatch(NaiveDate),
    /// Days to expiry outside `0..=max`
    DteOutOfRange(i64),
    /// Option right not requested
    WrongSide(OptionType),
    /// USD premium missing or outside the band
    PremiumOutOfBand(Option<f64>),
    /// Absolute delta missing or outside the band
    DeltaOutOfBand(Option<f64>),
}

/// Filter chain for one scan request
pub struct ContractFilter<'a> {
    request: &'a ScanRequest,
}

impl<'a> ContractFilter<'a> {
    pub fn new(request: &'a ScanRequest) -> Self {
        Self { request }
    }

    /// Expiry and side checks, decided from the instrument name alone
    pub fn check_listing(&self, instrument: &ParsedInstrument, days_to_expiry: i64) -> FilterResult {
        match self.request.expiry {
            ExpiryFilter::Exact(wanted) if instrument.expiry != wanted => {
                return FilterResult::Reject(RejectReason::ExpiryMismatch(instrument.expiry));
            }
            ExpiryFilter::MaxDays(max) if days_to_expiry < 0 || days_to_expiry > i64::from(max) => {
                return FilterResult::Reject(RejectReason::DteOutOfRange(days_to_expiry));
            }
            _ => {}
        }

        if !self.request.side.admits(instrument.option_type) {
            return FilterResult::Reject(RejectReason::WrongSide(instrument.option_type));
        }

        FilterResult::Pass
    }

    /// Premium and delta band checks on a fetched quote
    pub fn check_quote(&self, premium_usd: Option<f64>, delta: Option<f64>) -> FilterResult {
        if !self.request.premium_band.admits(premium_usd) {
            return FilterResult::Reject(RejectReason::PremiumOutOfBand(premium_usd));
        }

        let abs_delta = delta.map(f64::abs);
        if !self.request.delta_band.admits(abs_delta) {
            return FilterResult::Reject(RejectReason::DeltaOutOfBand(delta));
        }

        FilterResult::Pass
    }
}
