//! Integration tests for coin-alert

mod config_test;
mod scenario_test;
mod service_test;
mod support;
