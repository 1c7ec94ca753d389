//! Common types used across the application

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// P2P exchange the market data is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    Binance,
    Bybit,
    #[serde(rename = "OKX")]
    Okx,
    #[serde(rename = "MEXC")]
    Mexc,
    Huobi,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Binance => "Binance",
            Exchange::Bybit => "Bybit",
            Exchange::Okx => "OKX",
            Exchange::Mexc => "MEXC",
            Exchange::Huobi => "Huobi",
        }
    }

    pub fn all() -> &'static [Exchange] {
        &[
            Exchange::Binance,
            Exchange::Bybit,
            Exchange::Okx,
            Exchange::Mexc,
            Exchange::Huobi,
        ]
    }
}

impl FromStr for Exchange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binance" => Ok(Exchange::Binance),
            "bybit" => Ok(Exchange::Bybit),
            "okx" => Ok(Exchange::Okx),
            "mexc" => Ok(Exchange::Mexc),
            "huobi" => Ok(Exchange::Huobi),
            _ => Err(anyhow::anyhow!("Unknown exchange: {}", s)),
        }
    }
}

/// Stablecoin acting as the intermediate asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stablecoin {
    Usdt,
    Usdc,
    Fdusd,
    Dai,
}

impl Stablecoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stablecoin::Usdt => "USDT",
            Stablecoin::Usdc => "USDC",
            Stablecoin::Fdusd => "FDUSD",
            Stablecoin::Dai => "DAI",
        }
    }

    pub fn all() -> &'static [Stablecoin] {
        &[
            Stablecoin::Usdt,
            Stablecoin::Usdc,
            Stablecoin::Fdusd,
            Stablecoin::Dai,
        ]
    }
}

impl FromStr for Stablecoin {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usdt" => Ok(Stablecoin::Usdt),
            "usdc" => Ok(Stablecoin::Usdc),
            "fdusd" => Ok(Stablecoin::Fdusd),
            "dai" => Ok(Stablecoin::Dai),
            _ => Err(anyhow::anyhow!("Unknown stablecoin: {}", s)),
        }
    }
}

/// Fiat currency the investment is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Fiat {
    Kgs,
    Rub,
    Usd,
    Kzt,
    Eur,
}

impl Fiat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fiat::Kgs => "KGS",
            Fiat::Rub => "RUB",
            Fiat::Usd => "USD",
            Fiat::Kzt => "KZT",
            Fiat::Eur => "EUR",
        }
    }

    pub fn all() -> &'static [Fiat] {
        &[Fiat::Kgs, Fiat::Rub, Fiat::Usd, Fiat::Kzt, Fiat::Eur]
    }
}

impl FromStr for Fiat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kgs" => Ok(Fiat::Kgs),
            "rub" => Ok(Fiat::Rub),
            "usd" => Ok(Fiat::Usd),
            "kzt" => Ok(Fiat::Kzt),
            "eur" => Ok(Fiat::Eur),
            _ => Err(anyhow::anyhow!("Unknown fiat currency: {}", s)),
        }
    }
}

/// Market scope for every provider request. Changing any field invalidates
/// current rates and offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selectors {
    pub exchange: Exchange,
    pub stablecoin: Stablecoin,
    pub fiat: Fiat,
}

impl Selectors {
    pub fn new(exchange: Exchange, stablecoin: Stablecoin, fiat: Fiat) -> Self {
        Self {
            exchange,
            stablecoin,
            fiat,
        }
    }

    /// Pair label, e.g. "USDT/KGS"
    pub fn pair(&self) -> String {
        format!("{}/{}", self.stablecoin.as_str(), self.fiat.as_str())
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            exchange: Exchange::Binance,
            stablecoin: Stablecoin::Usdt,
            fiat: Fiat::Kgs,
        }
    }
}

/// Automatic refresh cadence. Persisted as milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshInterval {
    Disabled,
    Secs30,
    Min1,
    Min3,
    Min5,
}

impl RefreshInterval {
    pub fn as_millis(&self) -> u64 {
        match self {
            RefreshInterval::Disabled => 0,
            RefreshInterval::Secs30 => 30_000,
            RefreshInterval::Min1 => 60_000,
            RefreshInterval::Min3 => 180_000,
            RefreshInterval::Min5 => 300_000,
        }
    }

    /// Inverse of [`as_millis`](Self::as_millis). Values outside the
    /// enumerated set are treated as unknown.
    pub fn from_millis(ms: u64) -> Option<Self> {
        match ms {
            0 => Some(RefreshInterval::Disabled),
            30_000 => Some(RefreshInterval::Secs30),
            60_000 => Some(RefreshInterval::Min1),
            180_000 => Some(RefreshInterval::Min3),
            300_000 => Some(RefreshInterval::Min5),
            _ => None,
        }
    }

    /// `None` means no timer is ever scheduled.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            RefreshInterval::Disabled => None,
            other => Some(Duration::from_millis(other.as_millis())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RefreshInterval::Disabled => "off",
            RefreshInterval::Secs30 => "30s",
            RefreshInterval::Min1 => "1m",
            RefreshInterval::Min3 => "3m",
            RefreshInterval::Min5 => "5m",
        }
    }

    pub fn all() -> &'static [RefreshInterval] {
        &[
            RefreshInterval::Disabled,
            RefreshInterval::Secs30,
            RefreshInterval::Min1,
            RefreshInterval::Min3,
            RefreshInterval::Min5,
        ]
    }
}

impl Default for RefreshInterval {
    fn default() -> Self {
        RefreshInterval::Min3
    }
}

impl FromStr for RefreshInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "disabled" | "0" => Ok(RefreshInterval::Disabled),
            "30s" => Ok(RefreshInterval::Secs30),
            "1m" => Ok(RefreshInterval::Min1),
            "3m" => Ok(RefreshInterval::Min3),
            "5m" => Ok(RefreshInterval::Min5),
            _ => Err(anyhow::anyhow!("Unknown refresh interval: {}", s)),
        }
    }
}

/// Display theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow::anyhow!("Unknown theme: {}", s)),
        }
    }
}
