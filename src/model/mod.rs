//! Probability-of-profit model module
//!
//! Two independent POP estimators for a single option contract:
//! - delta heuristic: `1 - |delta|`
//! - lognormal tail probability of the underlying finishing on the
//!   profitable side of the breakeven
//!
//! Every input and output is an `Option<f64>`: a missing quote yields a
//! missing estimate, never a zero.

mod delta;
mod lognormal;
pub mod premium;

pub use delta::DeltaHeuristic;
pub use lognormal::{
    breakeven, lognormal_tail_probability, normal_cdf, time_to_expiry_years, LognormalModel, Tail,
};
pub use premium::{estimate_premium_native, PremiumNormalizer, PremiumUnit};

use crate::instrument::OptionType;

/// Days per year used to annualize time to expiry
pub const DAYS_PER_YEAR: f64 = 365.0;
/// Floor on time to expiry so same-day expiries stay defined
pub const MIN_TIME_TO_EXPIRY_YEARS: f64 = 1e-6;
/// Floor on a put's breakeven price
pub const MIN_BREAKEVEN: f64 = 1e-6;

/// Inputs for POP estimation
#[derive(Debug, Clone, Copy)]
pub struct PopInputs {
    pub option_type: OptionType,
    /// Underlying spot price in USD
    pub spot: f64,
    /// Strike in USD
    pub strike: f64,
    /// Whole days to expiry, already floored at zero
    pub days_to_expiry: i64,
    /// Annualized implied volatility as a fraction
    pub implied_vol: Option<f64>,
    pub delta: Option<f64>,
    /// Premium in USD
    pub premium_usd: Option<f64>,
}

/// Output of the combined model
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopEstimate {
    pub breakeven: Option<f64>,
    pub pop_delta: Option<f64>,
    pub pop_lognormal: Option<f64>,
}

/// Trait for POP estimators
pub trait PopModel: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;
    /// Probability of profit in `[0, 1]`, or `None` if inputs are insufficient
    fn estimate(&self, inputs: &PopInputs) -> Option<f64>;
}

/// Run both estimators and compute the breakeven.
///
/// Breakeven shares the lognormal model's preconditions, so a contract
/// without implied vol has neither.
pub fn evaluate(inputs: &PopInputs) -> PopEstimate {
    PopEstimate {
        breakeven: LognormalModel.breakeven_level(inputs),
        pop_delta: run_model(&DeltaHeuristic, inputs),
        pop_lognormal: run_model(&LognormalModel, inputs),
    }
}

fn run_model(model: &dyn PopModel, inputs: &PopInputs) -> Option<f64> {
    let estimate = model.estimate(inputs);
    if estimate.is_none() {
        tracing::trace!(model = model.name(), "Insufficient inputs for estimate");
    }
    estimate
}
