use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use peerspread::app::AppContext;
use peerspread::application::commands::{Cli, CommandExecutor};
use peerspread::config::Config;
use peerspread::infrastructure::provider::{FallbackProvider, GeminiProvider, MarketDataProvider};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    // Load base configuration from file if provided
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // CLI selector flags override the configured defaults
    let mut selectors = config.defaults.selectors();
    if let Some(exchange) = cli.exchange {
        selectors.exchange = exchange;
    }
    if let Some(coin) = cli.coin {
        selectors.stablecoin = coin;
    }
    if let Some(fiat) = cli.fiat {
        selectors.fiat = fiat;
    }

    let provider: Arc<dyn MarketDataProvider> = Arc::new(FallbackProvider::new(
        GeminiProvider::from_config(&config.provider),
    ));

    let mut ctx = AppContext::new(config, provider, selectors);
    CommandExecutor::execute(cli.command, &mut ctx).await?;
    Ok(())
}
