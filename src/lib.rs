//! pop-scanner: probability-of-profit scanner for Deribit BTC options
//!
//! This library provides the core components for:
//! - Instrument name parsing
//! - Market data from the Deribit public API
//! - Delta-heuristic and lognormal POP models
//! - Filtering, ranking and limiting of scanned contracts
//! - Table, CSV and JSON output
//! - An HTTP API over the scanner
//! - Logging and metrics

pub mod api;
pub mod cli;
pub mod config;
pub mod instrument;
pub mod market;
pub mod model;
pub mod output;
pub mod scan;
pub mod telemetry;
