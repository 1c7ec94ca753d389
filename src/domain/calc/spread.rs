//! Spread classification

use serde::{Deserialize, Serialize};

/// Qualitative spread tier. The presentation layer maps each tier to a
/// color/severity; the boundaries live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadTier {
    Loss,
    Weak,
    Good,
    Excellent,
}

impl SpreadTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpreadTier::Loss => "Loss",
            SpreadTier::Weak => "Weak",
            SpreadTier::Good => "Good",
            SpreadTier::Excellent => "Excellent",
        }
    }
}

/// Spread percentage plus its tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadReading {
    pub percent: f64,
    pub tier: SpreadTier,
}

/// Spread between sell and buy rate, relative to the buy rate, in percent.
/// A non-positive or non-finite buy rate yields 0 (defined fallback, not an
/// error).
pub fn spread_percent(buy_rate: f64, sell_rate: f64) -> f64 {
    if !buy_rate.is_finite() || !sell_rate.is_finite() || buy_rate <= 0.0 {
        return 0.0;
    }
    (sell_rate - buy_rate) / buy_rate * 100.0
}

/// Classify a buy/sell pair. Total over all inputs.
///
/// Boundaries: percent <= 0 is Loss, (0, 0.4) is Weak, [0.4, 1.0) is Good,
/// >= 1.0 is Excellent.
pub fn classify(buy_rate: f64, sell_rate: f64) -> SpreadReading {
    let percent = spread_percent(buy_rate, sell_rate);
    let tier = if percent <= 0.0 {
        SpreadTier::Loss
    } else if percent < 0.4 {
        SpreadTier::Weak
    } else if percent < 1.0 {
        SpreadTier::Good
    } else {
        SpreadTier::Excellent
    };
    SpreadReading { percent, tier }
}

/// Progress-gauge width for a spread percentage, clamped to [5, 100].
/// Purely presentational.
pub fn gauge_width(percent: f64) -> f64 {
    (percent / 2.0 * 100.0).clamp(5.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_percent_formula() {
        let percent = spread_percent(86.50, 87.20);
        assert!((percent - 0.809_248).abs() < 1e-6);
    }

    #[test]
    fn test_non_positive_buy_rate_falls_back_to_zero() {
        assert_eq!(spread_percent(0.0, 87.20), 0.0);
        assert_eq!(spread_percent(-1.0, 87.20), 0.0);
        assert_eq!(spread_percent(f64::NAN, 87.20), 0.0);
        assert_eq!(classify(0.0, 87.20).tier, SpreadTier::Loss);
    }

    #[test]
    fn test_tier_boundaries() {
        // percent <= 0 -> Loss
        assert_eq!(classify(100.0, 99.0).tier, SpreadTier::Loss);
        assert_eq!(classify(100.0, 100.0).tier, SpreadTier::Loss);
        // 0 < percent < 0.4 -> Weak
        assert_eq!(classify(100.0, 100.2).tier, SpreadTier::Weak);
        // 0.4 is inside Good (closed lower bound)
        assert_eq!(classify(100.0, 100.4).tier, SpreadTier::Good);
        assert_eq!(classify(100.0, 100.9).tier, SpreadTier::Good);
        // 1.0 is inside Excellent (closed lower bound)
        assert_eq!(classify(100.0, 101.0).tier, SpreadTier::Excellent);
        assert_eq!(classify(100.0, 105.0).tier, SpreadTier::Excellent);
    }

    #[test]
    fn test_gauge_width_clamping() {
        assert_eq!(gauge_width(0.0), 5.0);
        assert_eq!(gauge_width(-3.0), 5.0);
        assert_eq!(gauge_width(1.0), 50.0);
        assert_eq!(gauge_width(2.0), 100.0);
        assert_eq!(gauge_width(10.0), 100.0);
    }
}
