//! Keeps risk percent and risk amount consistent with the account balance.
//!
//! Whichever field the user last edited is authoritative and the other is
//! derived from it. Only the derived field is ever written during a
//! reconcile, so there is no way for the two to chase each other.

use rust_decimal::Decimal;
use tracing::trace;

use super::numeric::round_dp;

/// Which risk field the user is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskInputMode {
    #[default]
    Percent,
    Amount,
}

impl std::fmt::Display for RiskInputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskInputMode::Percent => write!(f, "percent"),
            RiskInputMode::Amount => write!(f, "amount"),
        }
    }
}

/// Bidirectional percent/amount derivation with an explicit mode flag.
#[derive(Debug, Clone)]
pub struct RiskSynchronizer {
    mode: RiskInputMode,
    balance: Decimal,
    percent: Option<Decimal>,
    amount: Option<Decimal>,
    precision: u32,
}

impl RiskSynchronizer {
    pub fn new(precision: u32) -> Self {
        Self {
            mode: RiskInputMode::default(),
            balance: Decimal::ZERO,
            percent: None,
            amount: None,
            precision,
        }
    }

    pub fn mode(&self) -> RiskInputMode {
        self.mode
    }

    pub fn percent(&self) -> Option<Decimal> {
        self.percent
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// Update the balance the risk fields are relative to.
    pub fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
        self.reconcile();
    }

    /// Focus a field without typing into it. Focus alone makes it authoritative.
    pub fn focus(&mut self, mode: RiskInputMode) {
        self.mode = mode;
        self.reconcile();
    }

    /// User typed into the percent field; `None` means the field was emptied.
    pub fn edit_percent(&mut self, percent: Option<Decimal>) {
        self.mode = RiskInputMode::Percent;
        self.percent = percent;
        self.reconcile();
    }

    /// User typed into the amount field; `None` means the field was emptied.
    pub fn edit_amount(&mut self, amount: Option<Decimal>) {
        self.mode = RiskInputMode::Amount;
        self.amount = amount;
        self.reconcile();
    }

    /// Derive the non-authoritative field from the authoritative one.
    fn reconcile(&mut self) {
        if self.balance <= Decimal::ZERO {
            // Percent is only meaningful against a positive balance.
            self.amount = None;
            if self.mode == RiskInputMode::Amount {
                self.percent = None;
            }
            return;
        }

        match self.mode {
            RiskInputMode::Percent => {
                self.amount = self.percent.and_then(|p| {
                    let amount = self.balance.checked_mul(p)? / Decimal::ONE_HUNDRED;
                    Some(round_dp(amount, self.precision))
                });
            }
            RiskInputMode::Amount => {
                // Out-of-range or negative results clear the field.
                self.percent = self.amount.and_then(|a| {
                    let ratio = a.checked_div(self.balance)?;
                    let pct = round_dp(ratio.checked_mul(Decimal::ONE_HUNDRED)?, self.precision);
                    (pct >= Decimal::ZERO).then_some(pct)
                });
            }
        }

        trace!(
            mode = %self.mode,
            balance = %self.balance,
            percent = ?self.percent,
            amount = ?self.amount,
            "Risk fields reconciled"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn synced(balance: Decimal) -> RiskSynchronizer {
        let mut sync = RiskSynchronizer::new(2);
        sync.set_balance(balance);
        sync
    }

    #[test]
    fn test_percent_drives_amount() {
        let mut sync = synced(dec!(10000));
        sync.edit_percent(Some(dec!(1)));
        assert_eq!(sync.amount(), Some(dec!(100.00)));

        sync.edit_percent(Some(dec!(1.255)));
        assert_eq!(sync.amount(), Some(dec!(125.50)));
    }

    #[test]
    fn test_amount_drives_percent() {
        let mut sync = synced(dec!(3000));
        sync.edit_amount(Some(dec!(100)));
        assert_eq!(sync.mode(), RiskInputMode::Amount);
        assert_eq!(sync.percent(), Some(dec!(3.33)));
        // The amount the user typed is left alone.
        assert_eq!(sync.amount(), Some(dec!(100)));
    }

    #[test]
    fn test_emptied_authoritative_field_clears_other() {
        let mut sync = synced(dec!(10000));
        sync.edit_percent(Some(dec!(2)));
        sync.edit_percent(None);
        assert_eq!(sync.amount(), None);

        sync.edit_amount(Some(dec!(50)));
        sync.edit_amount(None);
        assert_eq!(sync.percent(), None);
    }

    #[test]
    fn test_zero_balance_clears_amount() {
        let mut sync = synced(dec!(10000));
        sync.edit_percent(Some(dec!(1)));
        sync.set_balance(Decimal::ZERO);
        assert_eq!(sync.amount(), None);
        // Percent mode keeps the percent the user typed.
        assert_eq!(sync.percent(), Some(dec!(1)));

        // Restoring the balance re-derives the amount.
        sync.set_balance(dec!(5000));
        assert_eq!(sync.amount(), Some(dec!(50.00)));
    }

    #[test]
    fn test_zero_balance_in_amount_mode_clears_both() {
        let mut sync = synced(dec!(10000));
        sync.edit_amount(Some(dec!(200)));
        assert_eq!(sync.percent(), Some(dec!(2.00)));
        sync.set_balance(Decimal::ZERO);
        assert_eq!(sync.amount(), None);
        assert_eq!(sync.percent(), None);
    }

    #[test]
    fn test_amount_never_set_without_balance() {
        let mut sync = RiskSynchronizer::new(2);
        sync.edit_percent(Some(dec!(5)));
        assert_eq!(sync.amount(), None);
    }

    #[test]
    fn test_negative_amount_clears_percent() {
        let mut sync = synced(dec!(1000));
        sync.edit_amount(Some(dec!(-10)));
        assert_eq!(sync.percent(), None);
    }

    #[test]
    fn test_focus_switches_authority() {
        let mut sync = synced(dec!(10000));
        sync.edit_percent(Some(dec!(1)));
        sync.focus(RiskInputMode::Amount);
        assert_eq!(sync.percent(), Some(dec!(1.00)));
        sync.set_balance(dec!(20000));
        // Amount is authoritative now, so the percent moves instead.
        assert_eq!(sync.amount(), Some(dec!(100.00)));
        assert_eq!(sync.percent(), Some(dec!(0.50)));
    }

    #[test]
    fn test_percent_round_trip_is_close() {
        let balances = [dec!(1234.56), dec!(10000), dec!(87.5), dec!(250000)];
        let percents = [dec!(0.5), dec!(1), dec!(2.25), dec!(10)];

        for balance in balances {
            for percent in percents {
                let mut sync = synced(balance);
                sync.edit_percent(Some(percent));
                let amount = sync.amount().unwrap();
                sync.edit_amount(Some(amount));
                let back = sync.percent().unwrap();
                // Two-decimal rounding on the amount bounds the drift.
                let tolerance = dec!(0.005) / balance * dec!(100) + dec!(0.01);
                assert!(
                    (back - percent).abs() <= tolerance,
                    "balance={} percent={} back={}",
                    balance,
                    percent,
                    back
                );
            }
        }
    }
}
