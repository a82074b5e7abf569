//! coin-alert: cached BTC spot price served over HTTP
//!
//! This library provides the core components for:
//! - Fetching the spot price from Coinbase
//! - A lock-guarded price cache refreshed in the background
//! - Read-only price queries for request handlers
//! - Device registration into a Redis document store
//! - The HTTP API, landing page and static resources
//! - Structured logging and Prometheus metrics

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod price;
pub mod store;
pub mod telemetry;
