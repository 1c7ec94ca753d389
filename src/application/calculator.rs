//! Live calculation session
//!
//! Every setter recomputes the result synchronously; there is no
//! debouncing and no stale derived state. An invalid intermediate state
//! (say, a buy rate dragged to zero) clears the result instead of letting
//! NaN through to the display.

use tracing::debug;

use crate::domain::calc::{self, spread, CalcInputs, CalculationResult, SpreadReading};
use crate::domain::market::{MarketOffer, RatePair};
use crate::shared::types::Selectors;

pub struct CalculatorSession {
    inputs: CalcInputs,
    result: Option<CalculationResult>,
}

impl CalculatorSession {
    pub fn new(inputs: CalcInputs) -> Self {
        let mut session = Self {
            inputs,
            result: None,
        };
        session.recompute();
        session
    }

    pub fn inputs(&self) -> CalcInputs {
        self.inputs
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        self.result.as_ref()
    }

    pub fn set_investment(&mut self, investment: f64) {
        self.inputs.investment = investment;
        self.recompute();
    }

    pub fn set_buy_rate(&mut self, buy_rate: f64) {
        self.inputs.buy_rate = buy_rate;
        self.recompute();
    }

    pub fn set_sell_rate(&mut self, sell_rate: f64) {
        self.inputs.sell_rate = sell_rate;
        self.recompute();
    }

    pub fn set_fee(&mut self, fee_percent: f64) {
        self.inputs.fee_percent = fee_percent;
        self.recompute();
    }

    /// Seed buy/sell from a market refresh.
    pub fn apply_rates(&mut self, rates: &RatePair) {
        self.inputs.buy_rate = rates.buy;
        self.inputs.sell_rate = rates.sell;
        self.recompute();
    }

    /// Seed buy/sell from an offer row.
    pub fn apply_offer(&mut self, offer: &MarketOffer) {
        self.inputs.buy_rate = offer.buy_rate;
        self.inputs.sell_rate = offer.sell_rate;
        self.recompute();
    }

    /// Re-seed all four inputs from a saved calculation.
    pub fn restore(&mut self, inputs: CalcInputs) {
        self.inputs = inputs;
        self.recompute();
    }

    /// Spread reading for the current buy/sell pair. Total - valid even
    /// when the result is not.
    pub fn spread(&self) -> SpreadReading {
        spread::classify(self.inputs.buy_rate, self.inputs.sell_rate)
    }

    fn recompute(&mut self) {
        self.result = match calc::compute_inputs(&self.inputs) {
            Ok(result) => Some(result),
            Err(e) => {
                debug!("No result for current inputs: {}", e);
                None
            }
        };
    }

    /// Fixed-format multi-line share summary, or `None` while the inputs
    /// are invalid.
    pub fn share_text(&self, selectors: &Selectors) -> Option<String> {
        let result = self.result.as_ref()?;
        let fiat = selectors.fiat.as_str();
        Some(format!(
            "P2P {pair} calculation ({exchange})\n\
             Investment: {investment:.0} {fiat}\n\
             Buy rate: {buy} {fiat}\n\
             Sell rate: {sell} {fiat}\n\
             Fee: {fee}%\n\
             Net profit: {profit:+.0} {fiat}\n\
             ROI: {roi:.2}%",
            pair = selectors.pair(),
            exchange = selectors.exchange.as_str(),
            investment = result.investment,
            buy = result.buy_rate,
            sell = result.sell_rate,
            fee = result.fee_percent,
            profit = result.net_profit,
            roi = result.roi,
        ))
    }
}
