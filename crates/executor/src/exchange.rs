use crate::error::ExecutorError;
use crate::fees::{FeeBreakdown, FeeModel};
use core_types::TradeAction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request to trade a whole number of lots at a quoted per-share price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub instrument: String,
    pub action: TradeAction,
    /// Price per underlying share.
    pub unit_price: Decimal,
    pub lots: u32,
}

/// The priced outcome of an order, before it touches any account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub instrument: String,
    pub action: TradeAction,
    pub unit_price: Decimal,
    pub lots: u32,
    /// `unit_price * lots * lot_size`.
    pub notional: Decimal,
    pub fees: FeeBreakdown,
}

impl Fill {
    /// Signed effect on cash: negative for buys, positive for sells.
    pub fn net_cash_flow(&self) -> Decimal {
        match self.action {
            TradeAction::Buy => -(self.notional + self.fees.commission),
            TradeAction::Sell => self.notional - self.fees.commission - self.fees.tax,
        }
    }

    /// Cash that must be on hand before a buy may clear.
    pub fn cash_required(&self) -> Decimal {
        match self.action {
            TradeAction::Buy => self.notional + self.fees.commission,
            TradeAction::Sell => Decimal::ZERO,
        }
    }
}

/// A generic trait for an execution engine.
///
/// This function calculates the costs of the trade but crucially **does not
/// modify the portfolio state itself**. The caller applies the returned `Fill`.
pub trait Executor: Send + Sync {
    fn execute(&self, order: &OrderRequest) -> Result<Fill, ExecutorError>;
}

/// The "virtual exchange" for a historical replay: fills at the quoted close.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    fee_model: FeeModel,
    lot_size: Decimal,
}

impl SimulatedExecutor {
    pub fn new(fee_model: FeeModel, lot_size: u32) -> Self {
        Self {
            fee_model,
            lot_size: Decimal::from(lot_size),
        }
    }
}

impl Executor for SimulatedExecutor {
    fn execute(&self, order: &OrderRequest) -> Result<Fill, ExecutorError> {
        if order.lots == 0 {
            return Err(ExecutorError::ZeroQuantity(order.instrument.clone()));
        }
        if order.unit_price <= Decimal::ZERO {
            return Err(ExecutorError::InvalidPrice {
                instrument: order.instrument.clone(),
                price: order.unit_price.to_string(),
            });
        }

        let notional = order.unit_price * Decimal::from(order.lots) * self.lot_size;
        let fees = self.fee_model.compute_fees(notional, order.action);

        let fill = Fill {
            instrument: order.instrument.clone(),
            action: order.action,
            unit_price: order.unit_price,
            lots: order.lots,
            notional,
            fees,
        };
        tracing::trace!(?fill, "SimulatedExecutor: priced order");
        Ok(fill)
    }
}
