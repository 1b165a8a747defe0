//! Result formatting
//!
//! Renders a scan result as a console table, CSV, or JSON.

mod export;
mod tabular;

pub use export::{to_json, write_csv, write_csv_file, CSV_COLUMNS};
pub use tabular::render_table;

use crate::scan::ScanResult;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format {other:?}, expected table, csv or json")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        })
    }
}

/// Render a result in the chosen format
pub fn render(result: &ScanResult, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Table => Ok(render_table(result)),
        OutputFormat::Json => to_json(result),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(&result.data, &mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_empty_csv_has_header() {
        let out = render(&ScanResult::empty(50000.0), OutputFormat::Csv).unwrap();
        assert_eq!(out.trim_end(), CSV_COLUMNS.join(","));
    }
}
