//! Rate model - the arbitrage profit calculation

pub mod spread;

pub use spread::{classify, gauge_width, SpreadReading, SpreadTier};

use serde::{Deserialize, Serialize};

use crate::shared::errors::CalcError;

/// The four user-controlled inputs of a calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalcInputs {
    pub investment: f64,
    pub buy_rate: f64,
    pub sell_rate: f64,
    pub fee_percent: f64,
}

/// Complete result of one arbitrage calculation. Immutable once computed;
/// a changed input produces a whole new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub investment: f64,
    pub buy_rate: f64,
    pub sell_rate: f64,
    pub fee_percent: f64,
    /// Stablecoin quantity bought at `buy_rate`
    pub acquired: f64,
    /// Fiat recovered after selling at `sell_rate` and paying the fee
    pub final_amount: f64,
    pub net_profit: f64,
    /// Net profit as a percentage of the investment
    pub roi: f64,
}

impl CalculationResult {
    pub fn inputs(&self) -> CalcInputs {
        CalcInputs {
            investment: self.investment,
            buy_rate: self.buy_rate,
            sell_rate: self.sell_rate,
            fee_percent: self.fee_percent,
        }
    }
}

/// Compute the full result for one set of inputs.
///
/// Pure and deterministic. Non-finite or non-positive investment and buy
/// rate, negative sell rate, and fees outside [0, 100) are rejected rather
/// than propagated into NaN/infinite output.
pub fn compute(
    investment: f64,
    buy_rate: f64,
    sell_rate: f64,
    fee_percent: f64,
) -> Result<CalculationResult, CalcError> {
    if !investment.is_finite() || investment <= 0.0 {
        return Err(CalcError::InvalidInvestment(investment));
    }
    if !buy_rate.is_finite() || buy_rate <= 0.0 {
        return Err(CalcError::InvalidBuyRate(buy_rate));
    }
    if !sell_rate.is_finite() || sell_rate < 0.0 {
        return Err(CalcError::InvalidSellRate(sell_rate));
    }
    if !fee_percent.is_finite() || !(0.0..100.0).contains(&fee_percent) {
        return Err(CalcError::InvalidFee(fee_percent));
    }

    let acquired = investment / buy_rate;
    let final_amount = acquired * sell_rate * (1.0 - fee_percent / 100.0);
    let net_profit = final_amount - investment;
    let roi = net_profit / investment * 100.0;

    Ok(CalculationResult {
        investment,
        buy_rate,
        sell_rate,
        fee_percent,
        acquired,
        final_amount,
        net_profit,
        roi,
    })
}

/// Convenience wrapper over [`compute`] for a bundled input set.
pub fn compute_inputs(inputs: &CalcInputs) -> Result<CalculationResult, CalcError> {
    compute(
        inputs.investment,
        inputs.buy_rate,
        inputs.sell_rate,
        inputs.fee_percent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_identities() {
        let result = compute(50_000.0, 92.10, 93.45, 0.25).unwrap();

        assert_eq!(result.acquired, 50_000.0 / 92.10);
        assert_eq!(
            result.final_amount,
            result.acquired * 93.45 * (1.0 - 0.25 / 100.0)
        );
        assert_eq!(result.net_profit, result.final_amount - 50_000.0);
        assert_eq!(result.roi, result.net_profit / 50_000.0 * 100.0);
    }

    #[test]
    fn test_reference_scenario_kgs() {
        // 100 000 KGS at 86.50 / 87.20 with a 0.1% fee
        let result = compute(100_000.0, 86.50, 87.20, 0.1).unwrap();

        assert!((result.acquired - 1156.0694).abs() < 0.001);
        assert!((result.final_amount - 100_708.44).abs() < 0.01);
        assert!((result.net_profit - 708.44).abs() < 0.01);
        assert!((result.roi - 0.7084).abs() < 0.0001);
    }

    #[test]
    fn test_zero_fee_keeps_full_proceeds() {
        let result = compute(1000.0, 1.0, 1.1, 0.0).unwrap();
        assert!((result.final_amount - 1100.0).abs() < 1e-9);
        assert!((result.roi - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_spread_is_a_loss() {
        let result = compute(1000.0, 1.1, 1.0, 0.0).unwrap();
        assert!(result.net_profit < 0.0);
        assert!(result.roi < 0.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert_eq!(
            compute(0.0, 86.5, 87.2, 0.1),
            Err(CalcError::InvalidInvestment(0.0))
        );
        assert_eq!(
            compute(1000.0, 0.0, 87.2, 0.1),
            Err(CalcError::InvalidBuyRate(0.0))
        );
        assert_eq!(
            compute(1000.0, -5.0, 87.2, 0.1),
            Err(CalcError::InvalidBuyRate(-5.0))
        );
        assert_eq!(
            compute(1000.0, 86.5, -1.0, 0.1),
            Err(CalcError::InvalidSellRate(-1.0))
        );
        assert_eq!(
            compute(1000.0, 86.5, 87.2, 100.0),
            Err(CalcError::InvalidFee(100.0))
        );
        assert!(compute(f64::NAN, 86.5, 87.2, 0.1).is_err());
        assert!(compute(1000.0, f64::INFINITY, 87.2, 0.1).is_err());
    }

    #[test]
    fn test_result_round_trips_through_inputs() {
        let result = compute(100_000.0, 86.50, 87.20, 0.1).unwrap();
        let again = compute_inputs(&result.inputs()).unwrap();
        assert_eq!(result, again);
    }
}
