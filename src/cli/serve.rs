//! Serve command implementation

use crate::api::{self, AppState};
use crate::config::Config;
use crate::telemetry;
use clap::Args;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut server = config.server.clone();
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }

        if let Some(port) = config.telemetry.metrics_port {
            telemetry::init_metrics_exporter(port)?;
        }

        let scanner = super::deribit_scanner(config, None)?;
        api::serve(&server, AppState::new(scanner)).await
    }
}
