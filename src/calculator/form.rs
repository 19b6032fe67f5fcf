//! Stateful calculator form: balance entry, synchronized risk fields, stop
//! loss, target ratio and the last result shown.

use rust_decimal::Decimal;

use crate::models::{CalculationInput, CalculationResult};

use super::numeric::parse_number;
use super::{BalanceInput, CalculatorConfig, LotSizeCalculator, RiskInputMode, RiskSynchronizer};

/// Everything the user has typed plus the result currently displayed.
#[derive(Debug, Clone)]
pub struct CalculatorForm {
    balance: BalanceInput,
    risk: RiskSynchronizer,
    stop_loss: String,
    target_rr: String,
    calculator: LotSizeCalculator,
    result: Option<CalculationResult>,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

impl CalculatorForm {
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            balance: BalanceInput::new(config.balance_max_fraction_digits),
            risk: RiskSynchronizer::new(config.risk_precision),
            stop_loss: String::new(),
            target_rr: String::new(),
            calculator: LotSizeCalculator::new(config),
            result: None,
        }
    }

    /// Type into the balance field. Rejected keystrokes return false.
    pub fn set_balance(&mut self, typed: &str) -> bool {
        if !self.balance.accept(typed) {
            return false;
        }
        self.risk.set_balance(self.balance.value());
        true
    }

    pub fn set_risk_percent(&mut self, typed: &str) {
        self.risk.edit_percent(optional_number(typed));
    }

    pub fn set_risk_amount(&mut self, typed: &str) {
        self.risk.edit_amount(optional_number(typed));
    }

    pub fn focus_risk(&mut self, mode: RiskInputMode) {
        self.risk.focus(mode);
    }

    pub fn set_stop_loss(&mut self, typed: &str) {
        self.stop_loss = typed.trim().to_string();
    }

    pub fn set_target_rr(&mut self, typed: &str) {
        self.target_rr = typed.trim().to_string();
    }

    pub fn formatted_balance(&self) -> String {
        self.balance.formatted()
    }

    pub fn risk_mode(&self) -> RiskInputMode {
        self.risk.mode()
    }

    pub fn risk_percent(&self) -> Option<Decimal> {
        self.risk.percent()
    }

    pub fn risk_amount(&self) -> Option<Decimal> {
        self.risk.amount()
    }

    pub fn stop_loss(&self) -> &str {
        &self.stop_loss
    }

    pub fn target_rr(&self) -> &str {
        &self.target_rr
    }

    /// Result currently on display, if any.
    pub fn result(&self) -> Option<&CalculationResult> {
        self.result.as_ref()
    }

    /// Snapshot of the fields as the calculator sees them.
    pub fn input(&self) -> CalculationInput {
        CalculationInput {
            account_balance: self.balance.value(),
            risk_percent: self.risk.percent().unwrap_or(Decimal::ZERO),
            risk_amount: self.risk.amount().unwrap_or(Decimal::ZERO),
            stop_loss_pips: parse_number(&self.stop_loss),
            target_rr: self.target_rr.clone(),
        }
    }

    /// Calculate from the current fields.
    ///
    /// A new result replaces the old one. Invalid input returns `None` and
    /// leaves the previous result displayed.
    pub fn submit(&mut self) -> Option<&CalculationResult> {
        let result = self.calculator.calculate(&self.input())?;
        self.result = Some(result);
        self.result.as_ref()
    }
}

/// Empty text means the field was cleared.
fn optional_number(typed: &str) -> Option<Decimal> {
    let typed = typed.trim();
    if typed.is_empty() {
        None
    } else {
        Some(parse_number(typed))
    }
}
