//! # Sentiment Replay Risk Crate
//!
//! Admission control between a strategy's intent and the portfolio. Buys must
//! be fully funded by cash on hand; sells are clamped to the lots actually held.
//! Neither case is an error: a refused buy and an empty sell both come back as a
//! `Decision` the engine can log and move past.

pub mod error;
pub mod simple_manager;

pub use error::RiskError;
pub use simple_manager::CashAccountRiskManager;

use executor::{Executor, Fill, PortfolioState};
use rust_decimal::Decimal;
use strategies::Intent;

/// Outcome of checking one intent for one instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The fill may be applied as-is.
    Execute(Fill),
    /// A buy that cash on hand cannot cover.
    Rejected { required: Decimal, available: Decimal },
    /// Holding, or a sell with nothing left to sell.
    NoAction,
}

pub trait RiskManager: Send + Sync {
    fn evaluate(
        &self,
        intent: Intent,
        instrument: &str,
        price: Decimal,
        portfolio: &PortfolioState,
        executor: &dyn Executor,
    ) -> Result<Decision, RiskError>;
}
