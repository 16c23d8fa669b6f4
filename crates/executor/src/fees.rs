use configuration::Fees;
use core_types::TradeAction;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub commission: Decimal,
    pub tax: Decimal,
}

/// Brokerage commission on both sides, securities transaction tax on sells.
///
/// Both amounts are rounded to cents with banker's rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeModel {
    commission_rate: Decimal,
    tax_rate: Decimal,
}

impl FeeModel {
    pub fn new(params: &Fees) -> Self {
        Self {
            commission_rate: params.commission_rate,
            tax_rate: params.tax_rate,
        }
    }

    /// `notional` is expected to be non-negative; it is not checked.
    pub fn compute_fees(&self, notional: Decimal, action: TradeAction) -> FeeBreakdown {
        let commission = round_cents(notional * self.commission_rate);
        let tax = match action {
            TradeAction::Buy => Decimal::ZERO,
            TradeAction::Sell => round_cents(notional * self.tax_rate),
        };
        FeeBreakdown { commission, tax }
    }
}

impl Default for FeeModel {
    fn default() -> Self {
        Self {
            commission_rate: dec!(0.001425),
            tax_rate: dec!(0.003),
        }
    }
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_million_buy_pays_commission_only() {
        let fees = FeeModel::default().compute_fees(dec!(1000000), TradeAction::Buy);
        assert_eq!(fees.commission, dec!(1425.00));
        assert_eq!(fees.tax, dec!(0.00));
    }

    #[test]
    fn one_million_sell_pays_commission_and_tax() {
        let fees = FeeModel::default().compute_fees(dec!(1000000), TradeAction::Sell);
        assert_eq!(fees.commission, dec!(1425.00));
        assert_eq!(fees.tax, dec!(3000.00));
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        // 12345 * 0.001425 = 17.591625, 12345 * 0.003 = 37.035
        let fees = FeeModel::default().compute_fees(dec!(12345), TradeAction::Sell);
        assert_eq!(fees.commission, dec!(17.59));
        assert_eq!(fees.tax, dec!(37.04));
    }

    #[test]
    fn rates_come_from_configuration() {
        let model = FeeModel::new(&Fees {
            commission_rate: dec!(0.001),
            tax_rate: dec!(0.0015),
        });
        let fees = model.compute_fees(dec!(80000), TradeAction::Sell);
        assert_eq!(fees.commission, dec!(80.00));
        assert_eq!(fees.tax, dec!(120.00));
    }

    #[test]
    fn zero_notional_costs_nothing() {
        let fees = FeeModel::default().compute_fees(Decimal::ZERO, TradeAction::Sell);
        assert_eq!(fees.commission, Decimal::ZERO);
        assert_eq!(fees.tax, Decimal::ZERO);
    }
}
