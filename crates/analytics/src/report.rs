use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The end-of-run valuation of a replay.
///
/// Computed once from the final portfolio; it is the data transfer object the
/// CSV and database adapters persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub cash: Decimal,
    pub securities_value: Decimal,
    pub margin_debt: Decimal,
    pub net_assets: Decimal,
    pub profit: Decimal,
    pub return_rate_pct: Decimal,
    /// `None` when there is no margin debt to maintain.
    pub maintenance_ratio: Option<Decimal>,
}
