//! Premium normalization
//!
//! Deribit quotes coin-margined option premiums in the underlying (BTC), so a
//! native premium may need converting to USD with the scan's spot price.

use crate::market::TickerSnapshot;

/// Unit the exchange quotes premiums in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PremiumUnit {
    /// Already USD
    #[default]
    Usd,
    /// Units of the underlying coin
    Coin,
}

impl PremiumUnit {
    pub fn from_coin_flag(premium_in_coin: bool) -> Self {
        if premium_in_coin {
            PremiumUnit::Coin
        } else {
            PremiumUnit::Usd
        }
    }
}

/// Best premium estimate in the instrument's native unit.
///
/// Mid when both sides are quoted, then mark, then last trade.
pub fn estimate_premium_native(ticker: &TickerSnapshot) -> Option<f64> {
    let positive = |v: Option<f64>| v.filter(|p| *p > 0.0);

    if let (Some(bid), Some(ask)) = (positive(ticker.best_bid), positive(ticker.best_ask)) {
        return Some(0.5 * (bid + ask));
    }
    if let Some(mark) = positive(ticker.mark_price) {
        return Some(mark);
    }
    ticker.last_price.filter(|p| p.is_finite())
}

/// Converts native premiums to USD for one scan
#[derive(Debug, Clone, Copy)]
pub struct PremiumNormalizer {
    unit: PremiumUnit,
    spot: f64,
}

impl PremiumNormalizer {
    pub fn new(unit: PremiumUnit, spot: f64) -> Self {
        Self { unit, spot }
    }

    /// USD value of a native premium
    pub fn to_usd(&self, premium_native: Option<f64>) -> Option<f64> {
        let native = premium_native?;
        match self.unit {
            PremiumUnit::Usd => Some(native),
            PremiumUnit::Coin => {
                let usd = native * self.spot;
                usd.is_finite().then_some(usd)
            }
        }
    }
}
