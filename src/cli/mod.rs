//! CLI interface for coin-alert
//!
//! Provides subcommands for:
//! - `serve`: Run the price service
//! - `price`: Fetch the current price once
//! - `config`: Show the effective configuration

mod price;
mod serve;

pub use price::PriceArgs;
pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "coin-alert")]
#[command(about = "Cached BTC price over HTTP with device registration")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the price service
    Serve(ServeArgs),
    /// Fetch the current price once and print it
    Price(PriceArgs),
    /// Show the effective configuration
    Config,
}
