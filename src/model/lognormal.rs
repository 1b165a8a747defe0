//! Lognormal tail model
//!
//! Terminal price is lognormal with zero drift:
//! P(S_T <= K) = N(z) where z = (ln(K/S) + 0.5*sigma^2*T) / (sigma*sqrt(T))

use super::{PopInputs, PopModel, DAYS_PER_YEAR, MIN_BREAKEVEN, MIN_TIME_TO_EXPIRY_YEARS};
use crate::instrument::OptionType;

/// Side of the threshold that counts as profit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// Terminal price at or below the threshold
    Below,
    /// Terminal price at or above the threshold
    Above,
}

/// Standard normal CDF
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// Years to expiry, floored so that same-day expiries stay defined
pub fn time_to_expiry_years(days_to_expiry: i64) -> f64 {
    (days_to_expiry as f64 / DAYS_PER_YEAR).max(MIN_TIME_TO_EXPIRY_YEARS)
}

/// Underlying price at which a long position breaks even at expiry.
///
/// Requires a positive premium in USD. A put's breakeven is floored just
/// above zero.
pub fn breakeven(option_type: OptionType, strike: f64, premium_usd: Option<f64>) -> Option<f64> {
    let premium = premium_usd.filter(|p| p.is_finite() && *p > 0.0)?;
    let level = match option_type {
        OptionType::Call => strike + premium,
        OptionType::Put => (strike - premium).max(MIN_BREAKEVEN),
    };
    Some(level)
}

/// Probability the terminal price lands on `tail` side of `threshold`
pub fn lognormal_tail_probability(
    spot: f64,
    sigma: f64,
    t_years: f64,
    threshold: f64,
    tail: Tail,
) -> Option<f64> {
    if !(spot > 0.0 && sigma > 0.0 && t_years > 0.0 && threshold > 0.0) {
        return None;
    }

    let z = ((threshold / spot).ln() + 0.5 * sigma * sigma * t_years) / (sigma * t_years.sqrt());
    let p_below = normal_cdf(z);
    if !p_below.is_finite() {
        return None;
    }

    Some(match tail {
        Tail::Below => p_below,
        Tail::Above => 1.0 - p_below,
    })
}

/// Lognormal POP estimator.
///
/// A call profits when the underlying stays at or below its breakeven, a put
/// when it stays at or above.
#[derive(Debug, Clone, Copy, Default)]
pub struct LognormalModel;

impl LognormalModel {
    /// Breakeven under the model's preconditions: positive implied vol,
    /// spot and premium. `None` otherwise.
    pub fn breakeven_level(&self, inputs: &PopInputs) -> Option<f64> {
        self.volatility(inputs)?;
        if !(inputs.spot.is_finite() && inputs.spot > 0.0) {
            return None;
        }
        breakeven(inputs.option_type, inputs.strike, inputs.premium_usd)
    }

    fn volatility(&self, inputs: &PopInputs) -> Option<f64> {
        inputs.implied_vol.filter(|v| v.is_finite() && *v > 0.0)
    }
}

impl PopModel for LognormalModel {
    fn name(&self) -> &'static str {
        "lognormal"
    }

    fn estimate(&self, inputs: &PopInputs) -> Option<f64> {
        let sigma = self.volatility(inputs)?;
        let threshold = self.breakeven_level(inputs)?;
        let t_years = time_to_expiry_years(inputs.days_to_expiry);

        let tail = match inputs.option_type {
            OptionType::Call => Tail::Below,
            OptionType::Put => Tail::Above,
        };
        lognormal_tail_probability(inputs.spot, sigma, t_years, threshold, tail)
    }
}
