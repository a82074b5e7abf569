//! Price command implementation

use crate::app;
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Print as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl PriceArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let source = app::price_source(&config.price)?;
        let value = source.fetch_current().await?;

        if self.json {
            let body = crate::api::CurrentPriceResponse {
                current_price: value,
            };
            println!("{}", serde_json::to_string(&body)?);
        } else {
            println!("{} {}", config.price.currency_pair, value);
        }

        Ok(())
    }
}
