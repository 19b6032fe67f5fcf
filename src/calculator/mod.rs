//! Position calculator: balance entry, risk synchronization, lot sizing.

mod balance_input;
mod config;
mod form;
mod lot_size;
mod numeric;
mod risk_sync;

pub use balance_input::{group_thousands, BalanceInput};
pub use config::CalculatorConfig;
pub use form::CalculatorForm;
pub use lot_size::LotSizeCalculator;
pub use numeric::round_dp;
pub use risk_sync::{RiskInputMode, RiskSynchronizer};
