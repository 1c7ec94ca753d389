//! Market data types supplied by the external provider

use serde::{Deserialize, Serialize};

/// Current average buy/sell quote for the selected pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePair {
    pub buy: f64,
    pub sell: f64,
}

impl RatePair {
    pub fn new(buy: f64, sell: f64) -> Self {
        Self { buy, sell }
    }

    /// The provider contract requires two positive finite numbers.
    pub fn is_valid(&self) -> bool {
        self.buy.is_finite() && self.buy > 0.0 && self.sell.is_finite() && self.sell > 0.0
    }
}

/// Qualitative efficiency ranking assigned by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferEfficiency {
    Excellent,
    Good,
    Fair,
}

impl OfferEfficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferEfficiency::Excellent => "Excellent",
            OfferEfficiency::Good => "Good",
            OfferEfficiency::Fair => "Fair",
        }
    }
}

/// One counterparty / payment-method quote. The provider is expected to
/// deliver these sorted by descending spread; ordering is not re-validated
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOffer {
    pub label: String,
    pub buy_rate: f64,
    pub sell_rate: f64,
    pub spread_percent: f64,
    pub efficiency: OfferEfficiency,
}

/// Risk level of a narrative analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Narrative market analysis. Produced on demand, replaced wholesale on
/// each request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInsight {
    pub summary: String,
    pub tips: Vec<String>,
    pub risk_level: RiskLevel,
}
