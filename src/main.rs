use clap::Parser;
use coin_alert::cli::{Cli, Commands};
use coin_alert::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load_optional(&cli.config)
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", cli.config, e))?
    {
        Some(config) => config,
        None => {
            eprintln!("Warning: Config file {} not found", cli.config);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    coin_alert::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting coin-alert");
            args.execute(&config).await?;
        }
        Commands::Price(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
