//! CSV and JSON export

use super::OutputError;
use crate::scan::{ContractRow, ScanResult};
use std::io::Write;
use std::path::Path;

/// CSV header, in column order
pub const CSV_COLUMNS: [&str; 13] = [
    "instrument",
    "type",
    "expiry",
    "dte",
    "spot",
    "strike",
    "iv",
    "delta",
    "premium_native",
    "premium_usd",
    "breakeven",
    "pop_delta",
    "pop_logN",
];

fn field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn record(row: &ContractRow) -> [String; 13] {
    [
        row.instrument.clone(),
        row.option_type.code().to_string(),
        row.expiry.format("%Y-%m-%d").to_string(),
        row.days_to_expiry.to_string(),
        row.spot.to_string(),
        row.strike.to_string(),
        field(row.implied_vol),
        field(row.delta),
        field(row.premium_native),
        field(row.premium_usd),
        field(row.breakeven),
        field(row.pop_delta),
        field(row.pop_lognormal),
    ]
}

/// Write rows as CSV; missing values are empty fields
pub fn write_csv<W: Write>(rows: &[ContractRow], writer: W) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_COLUMNS)?;
    for row in rows {
        writer.write_record(record(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write rows as CSV to a file, replacing it
pub fn write_csv_file(rows: &[ContractRow], path: impl AsRef<Path>) -> Result<(), OutputError> {
    let file = std::fs::File::create(path)?;
    write_csv(rows, file)
}

/// Pretty JSON of the whole result; missing values are `null`
pub fn to_json(result: &ScanResult) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(result)?)
}
