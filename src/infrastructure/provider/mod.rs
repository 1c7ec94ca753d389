//! Market data provider interface and static fallbacks
//!
//! The provider is a best-effort, occasionally-unavailable network
//! service. Its failure is never fatal: the `FallbackProvider` decorator
//! substitutes a static default per data kind, so callers always get a
//! usable value.

pub mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::market::{MarketInsight, MarketOffer, OfferEfficiency, RatePair, RiskLevel};
use crate::shared::errors::ProviderError;
use crate::shared::types::{Fiat, Selectors};

/// External source of current rates, ranked offers, and narrative analysis
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current average buy/sell quote for the pair. Must be two positive
    /// numbers.
    async fn get_rates(&self, selectors: &Selectors) -> Result<RatePair, ProviderError>;

    /// Ranked offer list, sorted by descending spread by the provider.
    async fn get_offers(&self, selectors: &Selectors) -> Result<Vec<MarketOffer>, ProviderError>;

    /// Narrative risk analysis for the given quote.
    async fn get_insight(
        &self,
        buy_rate: f64,
        sell_rate: f64,
        selectors: &Selectors,
    ) -> Result<MarketInsight, ProviderError>;
}

/// Decorator that substitutes the static fallback for the matching data
/// kind whenever the inner provider fails.
pub struct FallbackProvider<P> {
    inner: P,
}

impl<P> FallbackProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for FallbackProvider<P> {
    async fn get_rates(&self, selectors: &Selectors) -> Result<RatePair, ProviderError> {
        match self.inner.get_rates(selectors).await {
            Ok(rates) => Ok(rates),
            Err(e) => {
                warn!("Rate fetch failed for {}: {}, using fallback table", selectors.pair(), e);
                Ok(fallback_rates(selectors.fiat))
            }
        }
    }

    async fn get_offers(&self, selectors: &Selectors) -> Result<Vec<MarketOffer>, ProviderError> {
        match self.inner.get_offers(selectors).await {
            Ok(offers) => Ok(offers),
            Err(e) => {
                warn!("Offer fetch failed for {}: {}, using synthetic offers", selectors.pair(), e);
                Ok(fallback_offers(selectors))
            }
        }
    }

    async fn get_insight(
        &self,
        buy_rate: f64,
        sell_rate: f64,
        selectors: &Selectors,
    ) -> Result<MarketInsight, ProviderError> {
        match self.inner.get_insight(buy_rate, sell_rate, selectors).await {
            Ok(insight) => Ok(insight),
            Err(e) => {
                warn!("Insight fetch failed for {}: {}, using generic analysis", selectors.pair(), e);
                Ok(fallback_insight())
            }
        }
    }
}

/// Static per-fiat default quotes
pub fn fallback_rates(fiat: Fiat) -> RatePair {
    match fiat {
        Fiat::Kgs => RatePair::new(86.60, 87.15),
        Fiat::Rub => RatePair::new(92.10, 93.45),
        Fiat::Usd => RatePair::new(0.99, 1.02),
        Fiat::Kzt => RatePair::new(445.0, 452.0),
        _ => RatePair::new(1.0, 1.1),
    }
}

fn fallback_banks(fiat: Fiat) -> &'static [&'static str] {
    match fiat {
        Fiat::Kgs => &["MBank", "Optima Bank", "Demir Bank", "Bakai Bank", "RSK Bank"],
        Fiat::Rub => &["Sberbank", "T-Bank (Tinkoff)", "Raiffeisen", "SBP", "Gasprombank"],
        Fiat::Usd => &["Zelle", "Wise", "Revolut", "Skrill", "Neteller"],
        Fiat::Kzt => &["Kaspi Bank", "Halyk Bank", "ForteBank", "Jusan Bank", "BCC"],
        _ => &["Bank Transfer", "E-Wallet", "Other"],
    }
}

/// Deterministic synthetic offer list derived from the fiat's bank roster
pub fn fallback_offers(selectors: &Selectors) -> Vec<MarketOffer> {
    fallback_banks(selectors.fiat)
        .iter()
        .enumerate()
        .map(|(i, bank)| MarketOffer {
            label: format!("{} ({})", bank, selectors.exchange.as_str()),
            buy_rate: 86.5 + i as f64 * 0.1,
            sell_rate: 87.2 + i as f64 * 0.1,
            spread_percent: 0.8 + i as f64 * 0.05,
            efficiency: if i % 3 == 0 {
                OfferEfficiency::Excellent
            } else {
                OfferEfficiency::Good
            },
        })
        .collect()
}

/// Fixed generic insight with medium risk
pub fn fallback_insight() -> MarketInsight {
    MarketInsight {
        summary: "Detailed analysis is unavailable right now; the current spread looks workable."
            .to_string(),
        tips: vec![
            "Always verify the counterparty before releasing funds".to_string(),
            "Watch the per-transfer limits of the banks involved".to_string(),
            "Keep two-factor authentication enabled on the exchange".to_string(),
        ],
        risk_level: RiskLevel::Medium,
    }
}
