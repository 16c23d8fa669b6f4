use crate::error::RiskError;
use crate::{Decision, RiskManager};
use core_types::TradeAction;
use executor::{Executor, OrderRequest, PortfolioState};
use rust_decimal::Decimal;
use strategies::Intent;

/// Risk rules for an unleveraged cash account.
#[derive(Debug, Clone, Default)]
pub struct CashAccountRiskManager;

impl CashAccountRiskManager {
    pub fn new() -> Self {
        Self
    }
}

impl RiskManager for CashAccountRiskManager {
    fn evaluate(
        &self,
        intent: Intent,
        instrument: &str,
        price: Decimal,
        portfolio: &PortfolioState,
        executor: &dyn Executor,
    ) -> Result<Decision, RiskError> {
        if price <= Decimal::ZERO {
            return Err(RiskError::InvalidEntryPrice(price));
        }

        let (action, lots) = match intent {
            Intent::Hold => return Ok(Decision::NoAction),
            Intent::Buy { lots } => (TradeAction::Buy, lots),
            Intent::Sell { max_lots } => {
                let held = portfolio.holdings(instrument);
                if held < max_lots {
                    tracing::trace!(instrument, held, max_lots, "Sell clamped to inventory");
                }
                (TradeAction::Sell, max_lots.min(held))
            }
        };
        if lots == 0 {
            return Ok(Decision::NoAction);
        }

        let fill = executor.execute(&OrderRequest {
            instrument: instrument.to_string(),
            action,
            unit_price: price,
            lots,
        })?;

        if !portfolio.can_afford(&fill) {
            return Ok(Decision::Rejected {
                required: fill.cash_required(),
                available: portfolio.cash(),
            });
        }

        Ok(Decision::Execute(fill))
    }
}
