//! Calculator input and result records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parsed calculator fields at the moment of submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Account balance in account currency
    pub account_balance: Decimal,

    /// Risk as a percentage of the balance (0 to 100)
    pub risk_percent: Decimal,

    /// Risk as an absolute amount in account currency
    pub risk_amount: Decimal,

    /// Stop-loss distance in pips
    pub stop_loss_pips: Decimal,

    /// Target risk:reward expression, e.g. "1:2" or "3"
    #[serde(default)]
    pub target_rr: String,
}

/// Output of a successful calculation. Replaced wholesale on every submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Position size in standard lots
    pub lot_size: Decimal,

    /// Value of one pip at this lot size
    pub pip_value: Decimal,

    /// Amount lost if the stop loss is hit
    pub risk_amount: Decimal,

    /// Amount gained if the risk:reward target is hit
    pub target_profit: Decimal,

    /// Balance the result was computed against
    pub account_balance: Decimal,
}
