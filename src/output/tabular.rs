//! Console table

use crate::scan::{ContractRow, ScanResult};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const NOT_AVAILABLE: &str = "n/a";

#[derive(Tabled)]
struct TableRow {
    instrument: String,
    #[tabled(rename = "type")]
    option_type: String,
    expiry: String,
    dte: i64,
    spot: String,
    strike: String,
    iv: String,
    delta: String,
    premium_native: String,
    premium_usd: String,
    breakeven: String,
    pop_delta: String,
    #[tabled(rename = "pop_logN")]
    pop_lognormal: String,
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v * 100.0))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl From<&ContractRow> for TableRow {
    fn from(row: &ContractRow) -> Self {
        Self {
            instrument: row.instrument.clone(),
            option_type: row.option_type.to_string(),
            expiry: row.expiry.to_string(),
            dte: row.days_to_expiry,
            spot: format!("{:.2}", row.spot),
            strike: format!("{}", row.strike),
            iv: percent(row.implied_vol),
            delta: fixed(row.delta, 3),
            premium_native: fixed(row.premium_native, 8),
            premium_usd: fixed(row.premium_usd, 2),
            breakeven: fixed(row.breakeven, 2),
            pop_delta: percent(row.pop_delta),
            pop_lognormal: percent(row.pop_lognormal),
        }
    }
}

/// Render a result as a console table with a summary line
pub fn render_table(result: &ScanResult) -> String {
    if result.data.is_empty() {
        return "No options found with the given filters.".to_string();
    }

    let rows: Vec<TableRow> = result.data.iter().map(TableRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!(
        "Spot {:.2} | showing {} of {} contracts\n{}",
        result.spot,
        result.data.len(),
        result.total_count,
        table
    )
}
