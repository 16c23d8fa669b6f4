use crate::error::ExecutorError;
use crate::exchange::Fill;
use core_types::TradeAction;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Manages the state of one simulated account: cash, lot holdings and margin debt.
///
/// Only `apply` changes cash or holdings. Margin debt is carried for the
/// valuation but no trade path moves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioState {
    cash: Decimal,
    holdings: BTreeMap<String, u32>,
    margin_debt: Decimal,
}

impl PortfolioState {
    /// Creates a flat portfolio holding zero lots of every listed instrument.
    pub fn new(starting_cash: Decimal, instruments: &[String]) -> Self {
        Self {
            cash: starting_cash,
            holdings: instruments.iter().map(|i| (i.clone(), 0)).collect(),
            margin_debt: Decimal::ZERO,
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn margin_debt(&self) -> Decimal {
        self.margin_debt
    }

    /// Lots held of `instrument`; zero for anything not in the portfolio.
    pub fn holdings(&self, instrument: &str) -> u32 {
        self.holdings.get(instrument).copied().unwrap_or(0)
    }

    pub fn positions(&self) -> impl Iterator<Item = (&str, u32)> {
        self.holdings.iter().map(|(i, lots)| (i.as_str(), *lots))
    }

    pub fn can_afford(&self, fill: &Fill) -> bool {
        self.cash >= fill.cash_required()
    }

    /// Applies a priced fill to cash and holdings.
    ///
    /// A buy that would overdraw cash or a sell larger than the inventory is
    /// refused and leaves the state untouched.
    pub fn apply(&mut self, fill: &Fill) -> Result<(), ExecutorError> {
        let held = self
            .holdings
            .get(&fill.instrument)
            .copied()
            .ok_or_else(|| ExecutorError::UnknownInstrument(fill.instrument.clone()))?;

        let new_lots = match fill.action {
            TradeAction::Buy => {
                if !self.can_afford(fill) {
                    return Err(ExecutorError::InsufficientCash {
                        required: fill.cash_required().to_string(),
                        available: self.cash.to_string(),
                    });
                }
                held + fill.lots
            }
            TradeAction::Sell => {
                if fill.lots > held {
                    return Err(ExecutorError::InvalidClosingQuantity {
                        instrument: fill.instrument.clone(),
                        requested: fill.lots,
                        available: held,
                    });
                }
                held - fill.lots
            }
        };

        self.cash += fill.net_cash_flow();
        self.holdings.insert(fill.instrument.clone(), new_lots);
        Ok(())
    }
}
