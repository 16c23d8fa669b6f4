use crate::error::AnalyticsError;
use crate::report::SummaryRecord;
use executor::PortfolioState;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A stateless calculator for the terminal valuation of a run.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    lot_size: Decimal,
}

impl AnalyticsEngine {
    pub fn new(lot_size: u32) -> Self {
        Self {
            lot_size: Decimal::from(lot_size),
        }
    }

    /// Marks `state` to market at `terminal_prices` (per-share closes).
    ///
    /// Instruments with no lots left need no terminal price.
    pub fn summarize(
        &self,
        state: &PortfolioState,
        terminal_prices: &HashMap<String, Decimal>,
        starting_cash: Decimal,
    ) -> Result<SummaryRecord, AnalyticsError> {
        if starting_cash.is_zero() {
            return Err(AnalyticsError::Configuration(
                "starting cash is zero, return rate is undefined".to_string(),
            ));
        }

        let mut securities_value = Decimal::ZERO;
        for (instrument, lots) in state.positions() {
            if lots == 0 {
                continue;
            }
            let price = terminal_prices
                .get(instrument)
                .ok_or_else(|| AnalyticsError::MissingTerminalPrice(instrument.to_string()))?;
            securities_value += Decimal::from(lots) * *price * self.lot_size;
        }

        let cash = state.cash();
        let margin_debt = state.margin_debt();
        let net_assets = cash + securities_value - margin_debt;
        let profit = net_assets - starting_cash;
        let return_rate_pct = profit / starting_cash * Decimal::ONE_HUNDRED;
        let maintenance_ratio = if margin_debt > Decimal::ZERO {
            Some(net_assets / margin_debt)
        } else {
            None
        };

        tracing::debug!(%net_assets, %profit, %return_rate_pct, "Valuation complete");

        Ok(SummaryRecord {
            cash,
            securities_value,
            margin_debt,
            net_assets,
            profit,
            return_rate_pct,
            maintenance_ratio,
        })
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TradeAction;
    use executor::{Executor, FeeModel, OrderRequest, SimulatedExecutor};
    use rust_decimal_macros::dec;

    fn instruments() -> Vec<String> {
        vec!["AAA".to_string(), "BBB".to_string()]
    }

    fn buy(state: &mut PortfolioState, instrument: &str, lots: u32, price: Decimal) {
        let fill = SimulatedExecutor::new(FeeModel::default(), 1000)
            .execute(&OrderRequest {
                instrument: instrument.to_string(),
                action: TradeAction::Buy,
                unit_price: price,
                lots,
            })
            .unwrap();
        state.apply(&fill).unwrap();
    }

    #[test]
    fn flat_portfolio_summarizes_to_its_starting_point() {
        let state = PortfolioState::new(dec!(2000000), &instruments());
        let summary = AnalyticsEngine::default()
            .summarize(&state, &HashMap::new(), dec!(2000000))
            .unwrap();

        assert_eq!(summary.cash, dec!(2000000));
        assert_eq!(summary.securities_value, Decimal::ZERO);
        assert_eq!(summary.net_assets, dec!(2000000));
        assert_eq!(summary.profit, Decimal::ZERO);
        assert_eq!(summary.return_rate_pct, Decimal::ZERO);
        assert_eq!(summary.maintenance_ratio, None);
    }

    #[test]
    fn holdings_are_marked_at_terminal_prices() {
        let mut state = PortfolioState::new(dec!(2000000), &instruments());
        buy(&mut state, "AAA", 2, dec!(20));

        let prices = HashMap::from([("AAA".to_string(), dec!(25))]);
        let summary = AnalyticsEngine::default()
            .summarize(&state, &prices, dec!(2000000))
            .unwrap();

        // cash 2,000,000 - 40,057 ; holdings 2 * 25 * 1000
        assert_eq!(summary.cash, dec!(1959943));
        assert_eq!(summary.securities_value, dec!(50000));
        assert_eq!(summary.net_assets, dec!(2009943));
        assert_eq!(summary.profit, dec!(9943));
        assert_eq!(summary.return_rate_pct, dec!(0.49715));
        assert_eq!(summary.margin_debt, Decimal::ZERO);
        assert_eq!(summary.maintenance_ratio, None);
    }

    #[test]
    fn zero_starting_cash_is_a_configuration_error() {
        let state = PortfolioState::new(Decimal::ZERO, &instruments());
        let err = AnalyticsEngine::default()
            .summarize(&state, &HashMap::new(), Decimal::ZERO)
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::Configuration(_)));
    }

    #[test]
    fn open_holdings_without_a_terminal_price_fail() {
        let mut state = PortfolioState::new(dec!(2000000), &instruments());
        buy(&mut state, "BBB", 1, dec!(30));

        let prices = HashMap::from([("AAA".to_string(), dec!(25))]);
        let err = AnalyticsEngine::default()
            .summarize(&state, &prices, dec!(2000000))
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingTerminalPrice(ref i) if i == "BBB"));
    }
}
