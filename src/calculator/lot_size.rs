//! Lot size, pip value and target profit from validated inputs.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{CalculationInput, CalculationResult};

use super::numeric::parse_number;
use super::CalculatorConfig;

/// Parse a target risk:reward expression into a reward multiple.
///
/// `"1:2"` is 2, `"2:1"` is 0.5 and a bare positive number `N` is
/// shorthand for `1:N`. Anything else, including a zero risk side, is 0.
pub fn parse_target_ratio(text: &str) -> Decimal {
    let text = text.trim();
    if text.is_empty() {
        return Decimal::ZERO;
    }

    if text.contains(':') {
        let parts: Vec<Decimal> = text.split(':').map(parse_number).collect();
        return match parts.as_slice() {
            [risk, reward] if !risk.is_zero() => reward.checked_div(*risk).unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        };
    }

    let single = parse_number(text);
    if single > Decimal::ZERO {
        single
    } else {
        Decimal::ZERO
    }
}

/// Pure position-size calculator.
#[derive(Debug, Clone)]
pub struct LotSizeCalculator {
    config: CalculatorConfig,
}

impl Default for LotSizeCalculator {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

impl LotSizeCalculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    /// Calculate a result, or `None` when balance, risk amount or stop loss
    /// is not positive. Invalid input is not an error; there is simply
    /// nothing to show.
    ///
    /// lot size     = risk / (stop pips * pip value per lot)
    /// pip value    = lot size * pip value per lot
    /// target profit = risk * reward multiple
    pub fn calculate(&self, input: &CalculationInput) -> Option<CalculationResult> {
        let balance = input.account_balance;
        let risk_amount = input.risk_amount;
        let stop_loss = input.stop_loss_pips;

        if balance <= Decimal::ZERO || risk_amount <= Decimal::ZERO || stop_loss <= Decimal::ZERO {
            debug!(
                balance = %balance,
                risk_amount = %risk_amount,
                stop_loss = %stop_loss,
                "Calculation skipped: non-positive input"
            );
            return None;
        }

        let ratio = parse_target_ratio(&input.target_rr);
        let per_lot = self.config.pip_value_per_lot;

        let lot_size = risk_amount.checked_div(stop_loss.checked_mul(per_lot)?)?;
        let pip_value = lot_size.checked_mul(per_lot)?;
        let target_profit = risk_amount.checked_mul(ratio)?;

        debug!(
            lot_size = %lot_size,
            pip_value = %pip_value,
            target_profit = %target_profit,
            "Position calculated"
        );

        Some(CalculationResult {
            lot_size,
            pip_value,
            risk_amount,
            target_profit,
            account_balance: balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(balance: Decimal, risk: Decimal, stop: Decimal, rr: &str) -> CalculationInput {
        CalculationInput {
            account_balance: balance,
            risk_percent: Decimal::ZERO,
            risk_amount: risk,
            stop_loss_pips: stop,
            target_rr: rr.to_string(),
        }
    }

    #[test]
    fn test_ratio_parsing() {
        assert_eq!(parse_target_ratio("1:2"), dec!(2));
        assert_eq!(parse_target_ratio("2:1"), dec!(0.5));
        assert_eq!(parse_target_ratio("3"), dec!(3));
        assert_eq!(parse_target_ratio("abc"), Decimal::ZERO);
        assert_eq!(parse_target_ratio("1:0"), Decimal::ZERO);
        assert_eq!(parse_target_ratio("0:3"), Decimal::ZERO);
        assert_eq!(parse_target_ratio(""), Decimal::ZERO);
    }

    #[test]
    fn test_ratio_lenient_forms() {
        assert_eq!(parse_target_ratio("1:2RR"), dec!(2));
        assert_eq!(parse_target_ratio(" 1 : 3 "), dec!(3));
        assert_eq!(parse_target_ratio("1:2:3"), Decimal::ZERO);
        assert_eq!(parse_target_ratio("-2"), Decimal::ZERO);
    }

    #[test]
    fn test_reference_calculation() {
        let calc = LotSizeCalculator::default();
        let result = calc
            .calculate(&input(dec!(10000), dec!(100), dec!(25), "1:2"))
            .unwrap();

        assert_eq!(result.lot_size, dec!(0.4));
        assert_eq!(result.pip_value, dec!(4.0));
        assert_eq!(result.risk_amount, dec!(100));
        assert_eq!(result.target_profit, dec!(200.0));
        assert_eq!(result.account_balance, dec!(10000));
    }

    #[test]
    fn test_missing_ratio_gives_zero_profit() {
        let calc = LotSizeCalculator::default();
        let result = calc
            .calculate(&input(dec!(5000), dec!(50), dec!(10), ""))
            .unwrap();
        assert_eq!(result.lot_size, dec!(0.5));
        assert_eq!(result.target_profit, Decimal::ZERO);
    }

    #[test]
    fn test_non_positive_inputs_produce_nothing() {
        let calc = LotSizeCalculator::default();
        assert!(calc.calculate(&input(dec!(10000), dec!(100), dec!(0), "1:2")).is_none());
        assert!(calc.calculate(&input(dec!(10000), dec!(0), dec!(25), "1:2")).is_none());
        assert!(calc.calculate(&input(dec!(0), dec!(100), dec!(25), "1:2")).is_none());
        assert!(calc.calculate(&input(dec!(10000), dec!(-5), dec!(25), "1:2")).is_none());
    }
}
