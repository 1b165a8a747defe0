//! Delta heuristic
//!
//! Delta approximates the risk-neutral probability of finishing in the
//! money, so `1 - |delta|` approximates expiring worthless.

use super::{PopInputs, PopModel};

/// `1 - |delta|` estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaHeuristic;

impl PopModel for DeltaHeuristic {
    fn name(&self) -> &'static str {
        "delta"
    }

    fn estimate(&self, inputs: &PopInputs) -> Option<f64> {
        let delta = inputs.delta.filter(|d| d.is_finite())?;
        Some(1.0 - delta.abs())
    }
}
