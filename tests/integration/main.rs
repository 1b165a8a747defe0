//! Integration tests

mod api_test;
mod config_test;
mod deribit_test;
