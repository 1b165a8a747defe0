//! Deribit option instrument names
//!
//! Names follow `BASE-DDMMMYY-STRIKE-TYPE`, e.g. `BTC-27SEP24-60000-C`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Option right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    #[serde(rename = "C")]
    Call,
    #[serde(rename = "P")]
    Put,
}

impl OptionType {
    /// Decode the instrument type field.
    ///
    /// Only `C` (any case) is a call. Every other value decodes to a put, which
    /// is how the exchange names have always been read here.
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case("C") {
            OptionType::Call
        } else {
            OptionType::Put
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            OptionType::Call => "C",
            OptionType::Put => "P",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Decoded instrument name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedInstrument {
    pub expiry: NaiveDate,
    pub strike: f64,
    pub option_type: OptionType,
}

impl ParsedInstrument {
    /// Calendar days from `today` to expiry (negative once expired)
    pub fn days_to_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry - today).num_days()
    }
}

/// Decode an instrument name, or `None` if it is not a well-formed option name.
pub fn parse_instrument(name: &str) -> Option<ParsedInstrument> {
    let mut fields = name.split('-');
    let (_base, date, strike, kind) = (
        fields.next()?,
        fields.next()?,
        fields.next()?,
        fields.next()?,
    );
    if fields.next().is_some() || kind.is_empty() {
        return None;
    }

    let expiry = NaiveDate::parse_from_str(date, "%d%b%y").ok()?;
    let strike: f64 = strike.parse().ok()?;
    if !strike.is_finite() || strike <= 0.0 {
        return None;
    }

    Some(ParsedInstrument {
        expiry,
        strike,
        option_type: OptionType::from_code(kind),
    })
}
