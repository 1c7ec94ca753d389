//! CLI commands and handlers

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::app::AppContext;
use crate::application::poller::{RefreshKind, RefreshOutcome};
use crate::domain::calc::{spread, CalculationResult};
use crate::domain::market::MarketOffer;
use crate::infrastructure::share;
use crate::shared::errors::AppError;
use crate::shared::types::{Exchange, Fiat, RefreshInterval, Selectors, Stablecoin, Theme};

#[derive(Parser)]
#[command(name = "peerspread")]
#[command(version, about = "P2P currency arbitrage calculator with AI-backed market data")]
pub struct Cli {
    /// Path to config file (optional)
    #[arg(long)]
    pub config: Option<String>,

    /// Exchange the market data is scoped to
    #[arg(long)]
    pub exchange: Option<Exchange>,

    /// Stablecoin leg of the pair
    #[arg(long)]
    pub coin: Option<Stablecoin>,

    /// Fiat leg of the pair
    #[arg(long)]
    pub fiat: Option<Fiat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute profit and ROI for the given inputs
    Calc {
        /// Investment amount in fiat
        #[arg(long)]
        investment: Option<f64>,

        /// Buy rate (fiat per coin)
        #[arg(long)]
        buy: Option<f64>,

        /// Sell rate (fiat per coin)
        #[arg(long)]
        sell: Option<f64>,

        /// Fee percent in [0, 100)
        #[arg(long)]
        fee: Option<f64>,

        /// Save the result to history
        #[arg(long)]
        save: bool,
    },

    /// Fetch current rates and offers once
    Refresh,

    /// Fetch and print the current offers table
    Offers,

    /// Ask the provider for a narrative market analysis
    Analyze,

    /// Watch the market, refreshing silently on the configured interval
    Monitor {
        /// Override the stored refresh interval (off, 30s, 1m, 3m, 5m)
        #[arg(long)]
        interval: Option<RefreshInterval>,
    },

    /// Saved calculation history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Save the current calculation to history
    Save,

    /// Render the share summary and hand it to the clipboard
    Share,

    /// Persist the display theme preference
    Theme { theme: Theme },

    /// Persist the automatic refresh interval
    Interval { interval: RefreshInterval },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved calculations, newest first
    List,

    /// Remove one entry by id
    Remove { id: String },

    /// Re-seed the calculator from a saved entry
    Restore { id: String },

    /// Drop all saved calculations
    Clear,
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, ctx: &mut AppContext) -> Result<(), AppError> {
        match command {
            Commands::Calc {
                investment,
                buy,
                sell,
                fee,
                save,
            } => Self::execute_calc(ctx, investment, buy, sell, fee, save),
            Commands::Refresh => Self::execute_refresh(ctx).await,
            Commands::Offers => Self::execute_offers(ctx).await,
            Commands::Analyze => Self::execute_analyze(ctx).await,
            Commands::Monitor { interval } => Self::execute_monitor(ctx, interval).await,
            Commands::History { action } => Self::execute_history(ctx, action),
            Commands::Save => Self::execute_save(ctx),
            Commands::Share => Self::execute_share(ctx),
            Commands::Theme { theme } => {
                ctx.set_theme(theme);
                info!("Theme set to {}", theme.as_str());
                Ok(())
            }
            Commands::Interval { interval } => {
                ctx.poller.set_interval(&mut ctx.kv, interval);
                Ok(())
            }
        }
    }

    fn execute_calc(
        ctx: &mut AppContext,
        investment: Option<f64>,
        buy: Option<f64>,
        sell: Option<f64>,
        fee: Option<f64>,
        save: bool,
    ) -> Result<(), AppError> {
        if let Some(value) = investment {
            ctx.calculator.set_investment(value);
        }
        if let Some(value) = buy {
            ctx.calculator.set_buy_rate(value);
        }
        if let Some(value) = sell {
            ctx.calculator.set_sell_rate(value);
        }
        if let Some(value) = fee {
            ctx.calculator.set_fee(value);
        }

        let selectors = ctx.poller.selectors();
        match ctx.calculator.result().cloned() {
            Some(result) => {
                print_result(&result, &selectors);
                if save {
                    let entry = ctx.history.append(&mut ctx.kv, &result);
                    info!("Saved to history as {}", entry.id);
                }
                Ok(())
            }
            None => {
                warn!("Inputs are out of range, nothing to compute");
                Ok(())
            }
        }
    }

    async fn execute_refresh(ctx: &mut AppContext) -> Result<(), AppError> {
        match ctx.refresh(RefreshKind::Manual).await {
            RefreshOutcome::Updated => {
                print_market(ctx);
                if let Some(notification) = ctx.notifications.current() {
                    println!("{}", notification.message);
                }
            }
            RefreshOutcome::Failed => warn!("Refresh failed, showing previous data"),
            RefreshOutcome::Skipped => {}
        }
        Ok(())
    }

    async fn execute_offers(ctx: &mut AppContext) -> Result<(), AppError> {
        if ctx.refresh(RefreshKind::Silent).await == RefreshOutcome::Failed {
            warn!("Offer fetch failed");
        }
        print_offers(ctx.poller.offers());
        Ok(())
    }

    async fn execute_analyze(ctx: &mut AppContext) -> Result<(), AppError> {
        if ctx.poller.rates().is_none() {
            ctx.refresh(RefreshKind::Silent).await;
        }
        let inputs = ctx.calculator.inputs();
        let selectors = ctx.poller.selectors();
        let insight = ctx
            .provider
            .get_insight(inputs.buy_rate, inputs.sell_rate, &selectors)
            .await?;

        println!("Risk level: {}", insight.risk_level.as_str());
        println!("\"{}\"", insight.summary);
        for (i, tip) in insight.tips.iter().enumerate() {
            println!("  {}. {}", i + 1, tip);
        }
        Ok(())
    }

    async fn execute_monitor(
        ctx: &mut AppContext,
        interval_override: Option<RefreshInterval>,
    ) -> Result<(), AppError> {
        if let Some(interval) = interval_override {
            ctx.poller.set_interval(&mut ctx.kv, interval);
        } else {
            ctx.poller.reschedule();
        }

        let selectors = ctx.poller.selectors();
        info!(
            "Monitoring {} on {} (interval: {})",
            selectors.pair(),
            selectors.exchange.as_str(),
            ctx.poller.interval().label()
        );
        if ctx.poller.interval() == RefreshInterval::Disabled {
            info!("Automatic refresh is off; waiting for ctrl-c");
        }

        if ctx.refresh(RefreshKind::Silent).await == RefreshOutcome::Updated {
            print_market(ctx);
        }

        let Some(mut ticks) = ctx.poller.take_ticks() else {
            return Ok(());
        };

        loop {
            tokio::select! {
                maybe_tick = ticks.recv() => {
                    if maybe_tick.is_none() {
                        break;
                    }
                    if ctx.refresh(RefreshKind::Silent).await == RefreshOutcome::Updated {
                        print_market(ctx);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Stopping monitor");
                    break;
                }
            }
        }

        ctx.poller.cancel_timer();
        Ok(())
    }

    fn execute_history(ctx: &mut AppContext, action: HistoryAction) -> Result<(), AppError> {
        match action {
            HistoryAction::List => {
                if ctx.history.is_empty() {
                    println!("History is empty");
                    return Ok(());
                }
                for entry in ctx.history.entries() {
                    let when = chrono::DateTime::from_timestamp_millis(entry.saved_at)
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{}  {}  {:.0} @ {} -> {}  profit {:+.0} (ROI {:.2}%)",
                        entry.id,
                        when,
                        entry.result.investment,
                        entry.result.buy_rate,
                        entry.result.sell_rate,
                        entry.result.net_profit,
                        entry.result.roi,
                    );
                }
            }
            HistoryAction::Remove { id } => {
                ctx.history.remove(&mut ctx.kv, &id);
                info!("Entry {} removed if it was present", id);
            }
            HistoryAction::Restore { id } => match ctx.history.restore(&id) {
                Some(inputs) => {
                    ctx.calculator.restore(inputs);
                    let selectors = ctx.poller.selectors();
                    match ctx.calculator.result() {
                        Some(result) => print_result(result, &selectors),
                        None => warn!("Restored inputs are out of range"),
                    }
                }
                None => warn!("History entry {} not found", id),
            },
            HistoryAction::Clear => {
                ctx.history.clear(&mut ctx.kv);
                info!("History cleared");
            }
        }
        Ok(())
    }

    fn execute_save(ctx: &mut AppContext) -> Result<(), AppError> {
        match ctx.calculator.result().cloned() {
            Some(result) => {
                let entry = ctx.history.append(&mut ctx.kv, &result);
                info!("Saved to history as {}", entry.id);
                Ok(())
            }
            None => {
                warn!("Inputs are out of range, nothing to save");
                Ok(())
            }
        }
    }

    fn execute_share(ctx: &mut AppContext) -> Result<(), AppError> {
        let selectors = ctx.poller.selectors();
        match ctx.calculator.share_text(&selectors) {
            Some(text) => share::share(&text),
            None => warn!("Inputs are out of range, nothing to share"),
        }
        Ok(())
    }
}

fn print_result(result: &CalculationResult, selectors: &Selectors) {
    let reading = spread::classify(result.buy_rate, result.sell_rate);
    let fiat = selectors.fiat.as_str();
    println!("Pair: {} on {}", selectors.pair(), selectors.exchange.as_str());
    println!("Investment:   {:>14.2} {}", result.investment, fiat);
    println!(
        "Acquired:     {:>14.4} {}",
        result.acquired,
        selectors.stablecoin.as_str()
    );
    println!("Final amount: {:>14.2} {}", result.final_amount, fiat);
    println!("Net profit:   {:>+14.2} {}", result.net_profit, fiat);
    println!("ROI:          {:>13.2}%", result.roi);
    println!(
        "Spread:       {:>13.2}% ({})",
        reading.percent,
        reading.tier.as_str()
    );
}

fn print_offers(offers: &[MarketOffer]) {
    if offers.is_empty() {
        println!("No offers for this pair");
        return;
    }
    println!(
        "{:<28} {:>8} {:>8} {:>8}  {}",
        "Bank / Method", "Buy", "Sell", "Spread", "Tier"
    );
    for offer in offers {
        println!(
            "{:<28} {:>8.2} {:>8.2} {:>7.2}%  {}",
            offer.label,
            offer.buy_rate,
            offer.sell_rate,
            offer.spread_percent,
            offer.efficiency.as_str()
        );
    }
}

fn print_market(ctx: &AppContext) {
    if let Some(rates) = ctx.poller.rates() {
        let reading = spread::classify(rates.buy, rates.sell);
        let stamp = ctx
            .poller
            .last_updated()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{}] {} buy {:.2} / sell {:.2}  spread {:.2}% ({})",
            stamp,
            ctx.poller.selectors().pair(),
            rates.buy,
            rates.sell,
            reading.percent,
            reading.tier.as_str()
        );
    }
    print_offers(ctx.poller.offers());
}
