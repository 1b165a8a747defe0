use clap::Parser;
use pop_scanner::cli::{Cli, Commands};
use pop_scanner::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::from_toml(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = pop_scanner::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Scan(args) => {
            tracing::debug!(currency = %config.exchange.currency, "Starting scan");
            args.execute(&config).await?;
        }
        Commands::Serve(args) => {
            tracing::info!("Starting API server");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Exchange: {} ({})",
                config.exchange.base_url, config.exchange.currency
            );
            println!(
                "  Timeouts: ticker={}s, instruments={}s",
                config.exchange.ticker_timeout_secs, config.exchange.instruments_timeout_secs
            );
            println!("  Scan: concurrency={}", config.scan.concurrency);
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!(
                "  Telemetry: level={}, format={:?}, metrics_port={:?}",
                config.telemetry.log_level,
                config.telemetry.log_format,
                config.telemetry.metrics_port
            );
        }
    }

    Ok(())
}
