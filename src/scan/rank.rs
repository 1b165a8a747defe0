//! Ranking: stable sort with missing values last, then limit

use super::request::{SortDirection, SortKey};
use super::ContractRow;
use std::cmp::Ordering;

impl SortKey {
    /// Value of this column for a row
    pub fn value(&self, row: &ContractRow) -> Option<f64> {
        match self {
            SortKey::PopDelta => row.pop_delta,
            SortKey::PopLognormal => row.pop_lognormal,
            SortKey::ImpliedVol => row.implied_vol,
            SortKey::DaysToExpiry => Some(row.days_to_expiry as f64),
            SortKey::Strike => Some(row.strike),
            SortKey::PremiumUsd => row.premium_usd,
            SortKey::PremiumNative => row.premium_native,
            SortKey::Breakeven => row.breakeven,
        }
    }
}

/// Missing values compare greater than any present value in both directions
fn compare(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => x.total_cmp(&y),
            SortDirection::Descending => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort; ties keep their current order
pub fn sort_rows(rows: &mut [ContractRow], key: SortKey, direction: SortDirection) {
    rows.sort_by(|a, b| compare(key.value(a), key.value(b), direction));
}

/// Keep the first `limit` rows; 0 keeps all
pub fn truncate(rows: &mut Vec<ContractRow>, limit: usize) {
    if limit > 0 {
        rows.truncate(limit);
    }
}
