//! Scan request types and validation
//!
//! `ScanParams` is the loose form a CLI or query string produces;
//! `ScanRequest` is the validated form the scanner runs.

use crate::instrument::OptionType;
use crate::model::PremiumUnit;
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Row limit applied when none is given
pub const DEFAULT_LIMIT: usize = 200;

/// Request validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("exact expiry and max days to expiry are mutually exclusive")]
    ConflictingExpiryFilters,
    #[error("invalid expiry {0:?}, expected YYYY-MM-DD")]
    InvalidExpiry(String),
    #[error("max days to expiry must be non-negative, got {0}")]
    NegativeDteMax(i64),
    #[error("unknown side {0:?}, expected calls, puts or both")]
    UnknownSide(String),
    #[error("unknown sort key {0:?}, expected one of {names}", names = SortKey::names().join(", "))]
    UnknownSortKey(String),
    #[error("{name} bound must be a finite number")]
    NonFiniteBound { name: &'static str },
    #[error("{name} bound must be non-negative, got {value}")]
    NegativeBound { name: &'static str, value: f64 },
    #[error("{name} band is inverted: min {min} > max {max}")]
    InvertedBand {
        name: &'static str,
        min: f64,
        max: f64,
    },
}

/// Which expiries a scan includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryFilter {
    #[default]
    Any,
    /// Keep `0 <= dte <= max`
    MaxDays(u32),
    /// Keep only this expiry date
    Exact(NaiveDate),
}

/// Which option rights a scan includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SideFilter {
    Calls,
    Puts,
    #[default]
    Both,
}

impl SideFilter {
    pub fn admits(&self, option_type: OptionType) -> bool {
        match self {
            SideFilter::Calls => option_type == OptionType::Call,
            SideFilter::Puts => option_type == OptionType::Put,
            SideFilter::Both => true,
        }
    }
}

impl FromStr for SideFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "calls" => Ok(SideFilter::Calls),
            "puts" => Ok(SideFilter::Puts),
            "both" => Ok(SideFilter::Both),
            _ => Err(ValidationError::UnknownSide(s.to_string())),
        }
    }
}

/// Inclusive range with independently optional bounds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Band {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Band {
    /// Validated band; `name` only labels errors
    pub fn new(name: &'static str, min: Option<f64>, max: Option<f64>) -> Result<Self, ValidationError> {
        if min.is_some_and(|v| !v.is_finite()) || max.is_some_and(|v| !v.is_finite()) {
            return Err(ValidationError::NonFiniteBound { name });
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ValidationError::InvertedBand { name, min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Reject bounds below zero
    pub fn non_negative(self, name: &'static str) -> Result<Self, ValidationError> {
        match [self.min, self.max].into_iter().flatten().find(|v| *v < 0.0) {
            Some(value) => Err(ValidationError::NegativeBound { name, value }),
            None => Ok(self),
        }
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// An inactive band admits everything; an active one never admits a
    /// missing value.
    pub fn admits(&self, value: Option<f64>) -> bool {
        if !self.is_active() {
            return true;
        }
        match value {
            Some(v) if v.is_finite() => {
                self.min.map_or(true, |min| v >= min) && self.max.map_or(true, |max| v <= max)
            }
            _ => false,
        }
    }
}

/// Column a scan is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PopDelta,
    PopLognormal,
    ImpliedVol,
    DaysToExpiry,
    Strike,
    PremiumUsd,
    PremiumNative,
    Breakeven,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::PopDelta,
        SortKey::PopLognormal,
        SortKey::ImpliedVol,
        SortKey::DaysToExpiry,
        SortKey::Strike,
        SortKey::PremiumUsd,
        SortKey::PremiumNative,
        SortKey::Breakeven,
    ];

    /// Column name, matching the CSV header
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PopDelta => "pop_delta",
            SortKey::PopLognormal => "pop_logN",
            SortKey::ImpliedVol => "iv",
            SortKey::DaysToExpiry => "dte",
            SortKey::Strike => "strike",
            SortKey::PremiumUsd => "premium_usd",
            SortKey::PremiumNative => "premium_native",
            SortKey::Breakeven => "breakeven",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(SortKey::as_str).collect()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSortKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn from_desc_flag(desc: bool) -> Self {
        if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// Unvalidated scan parameters, as received from a CLI or query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanParams {
    pub dte_max: Option<i64>,
    /// `YYYY-MM-DD`
    pub expiry: Option<String>,
    /// `calls`, `puts` or `both`
    pub side: Option<String>,
    pub delta_min: Option<f64>,
    pub delta_max: Option<f64>,
    /// USD
    pub prem_min: Option<f64>,
    /// USD
    pub prem_max: Option<f64>,
    /// A bare `premium_in_btc` key counts as set
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub premium_in_btc: Option<bool>,
    /// 0 means unlimited
    pub limit: Option<usize>,
    pub sort: Option<String>,
    pub desc: Option<bool>,
}

/// Boolean that also accepts query-string spellings: an empty value, `1`,
/// `yes` and `on` are true; `0`, `no` and `off` are false.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(value)) => Ok(Some(value)),
        Some(Flag::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("invalid flag value {other:?}"))),
        },
    }
}

/// Validated scan request
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub expiry: ExpiryFilter,
    pub side: SideFilter,
    /// Applied to `|delta|`
    pub delta_band: Band,
    /// Applied to the USD premium
    pub premium_band: Band,
    pub premium_unit: PremiumUnit,
    /// 0 means unlimited
    pub limit: usize,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self {
            expiry: ExpiryFilter::Any,
            side: SideFilter::Both,
            delta_band: Band::default(),
            premium_band: Band::default(),
            premium_unit: PremiumUnit::Usd,
            limit: DEFAULT_LIMIT,
            sort_key: SortKey::PopDelta,
            direction: SortDirection::Descending,
        }
    }
}

impl TryFrom<ScanParams> for ScanRequest {
    type Error = ValidationError;

    fn try_from(params: ScanParams) -> Result<Self, Self::Error> {
        let expiry = match (params.expiry.as_deref(), params.dte_max) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingExpiryFilters),
            (Some(date), None) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(ExpiryFilter::Exact)
                .map_err(|_| ValidationError::InvalidExpiry(date.to_string()))?,
            (None, Some(max)) => {
                let max = u32::try_from(max).map_err(|_| ValidationError::NegativeDteMax(max))?;
                ExpiryFilter::MaxDays(max)
            }
            (None, None) => ExpiryFilter::Any,
        };

        let side = params
            .side
            .as_deref()
            .map(SideFilter::from_str)
            .transpose()?
            .unwrap_or_default();

        let sort_key = params
            .sort
            .as_deref()
            .map(SortKey::from_str)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            expiry,
            side,
            delta_band: Band::new("delta", params.delta_min, params.delta_max)?,
            premium_band: Band::new("premium", params.prem_min, params.prem_max)?
                .non_negative("premium")?,
            premium_unit: PremiumUnit::from_coin_flag(params.premium_in_btc.unwrap_or(false)),
            limit: params.limit.unwrap_or(DEFAULT_LIMIT),
            sort_key,
            direction: params
                .desc
                .map(SortDirection::from_desc_flag)
                .unwrap_or_default(),
        })
    }
}
