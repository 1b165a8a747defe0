//! Scan command implementation

use crate::config::Config;
use crate::output::{self, OutputFormat};
use crate::scan::{ScanParams, ScanRequest, DEFAULT_LIMIT};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Max days to expiry (e.g. 7)
    #[arg(long, conflicts_with = "expiry")]
    pub dte_max: Option<i64>,

    /// Only include this expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub expiry: Option<String>,

    /// Which side(s) to show: calls, puts or both
    #[arg(long, default_value = "both")]
    pub side: String,

    /// Absolute delta band (e.g. 0.10 0.30)
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub delta_band: Option<Vec<f64>>,

    /// Minimum premium in USD
    #[arg(long)]
    pub prem_min: Option<f64>,

    /// Maximum premium in USD
    #[arg(long)]
    pub prem_max: Option<f64>,

    /// Treat fetched premiums as BTC and convert to USD via spot
    #[arg(long)]
    pub premium_in_btc: bool,

    /// Max rows to print (0 = all)
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Sort column: pop_delta, pop_logN, iv, dte, strike, premium_usd, premium_native, breakeven
    #[arg(long, default_value = "pop_delta")]
    pub sort: String,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Output format: table, csv or json
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,

    /// Also write the returned rows to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Underlying currency (overrides config)
    #[arg(long)]
    pub currency: Option<String>,
}

impl ScanArgs {
    /// Loose parameters for validation
    pub fn to_params(&self) -> ScanParams {
        let band = self.delta_band.as_deref().unwrap_or_default();
        ScanParams {
            dte_max: self.dte_max,
            expiry: self.expiry.clone(),
            side: Some(self.side.clone()),
            delta_min: band.first().copied(),
            delta_max: band.get(1).copied(),
            prem_min: self.prem_min,
            prem_max: self.prem_max,
            premium_in_btc: Some(self.premium_in_btc),
            limit: Some(self.limit),
            sort: Some(self.sort.clone()),
            desc: Some(self.desc),
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let request = ScanRequest::try_from(self.to_params())?;
        let scanner = super::deribit_scanner(config, self.currency.as_deref())?;

        let result = scanner.run_scan(&request).await?;
        println!("{}", output::render(&result, self.format)?);

        if let Some(path) = &self.export {
            output::write_csv_file(&result.data, path)
                .with_context(|| format!("exporting to {}", path.display()))?;
            eprintln!("Saved {} rows to {}", result.data.len(), path.display());
        }

        Ok(())
    }
}
