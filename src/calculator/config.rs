//! Calculator configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Constants the position calculator works with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Value of one pip for one standard lot, in account currency.
    /// Fixed for the reference instrument; not pair-aware.
    pub pip_value_per_lot: Decimal,

    /// Decimal places derived risk fields are rounded to
    pub risk_precision: u32,

    /// Fractional digits accepted when typing the balance
    pub balance_max_fraction_digits: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            pip_value_per_lot: dec!(10),      // $10 per pip per standard lot
            risk_precision: 2,
            balance_max_fraction_digits: 2,
        }
    }
}
