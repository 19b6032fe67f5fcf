//! Account balance entry: keystroke validation and thousands formatting.

use rust_decimal::Decimal;
use tracing::debug;

use super::numeric::{parse_decimal, parse_number};

/// Raw balance text as typed, without separators.
#[derive(Debug, Clone, Default)]
pub struct BalanceInput {
    raw: String,
    max_fraction_digits: usize,
}

impl BalanceInput {
    pub fn new(max_fraction_digits: usize) -> Self {
        Self {
            raw: String::new(),
            max_fraction_digits,
        }
    }

    /// Replace the field with `typed`. Separators are ignored.
    ///
    /// Returns false and keeps the previous value when the text has anything
    /// other than digits, more than one decimal point, too many fractional
    /// digits, or a magnitude a `Decimal` cannot hold.
    pub fn accept(&mut self, typed: &str) -> bool {
        let candidate: String = typed.chars().filter(|&c| c != ',').collect();
        if !is_valid_raw(&candidate, self.max_fraction_digits) {
            return false;
        }
        if !candidate.is_empty() && candidate != "." && parse_decimal(&candidate).is_none() {
            debug!(digits = candidate.len(), "Balance rejected: out of range");
            return false;
        }
        self.raw = candidate;
        true
    }

    /// Parsed balance; empty or bare "." reads as zero.
    pub fn value(&self) -> Decimal {
        parse_number(&self.raw)
    }

    /// Display form with thousands separators on the integer part.
    pub fn formatted(&self) -> String {
        format_raw_balance(&self.raw)
    }
}

/// `^\d*\.?\d{0,N}$`
fn is_valid_raw(value: &str, max_fraction_digits: usize) -> bool {
    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (value, None),
    };

    if !int_part.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    match frac_part {
        Some(f) => f.len() <= max_fraction_digits && f.chars().all(|c| c.is_ascii_digit()),
        None => true,
    }
}

/// Format a validated raw balance string for display.
///
/// Works on the digit string directly so arbitrarily long integer parts
/// keep every digit. A trailing "." is preserved while the user types.
pub fn format_raw_balance(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if raw == "." {
        return "0.".to_string();
    }

    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw, None),
    };

    let mut formatted = group_thousands(int_part);
    if let Some(f) = frac_part {
        formatted.push('.');
        formatted.push_str(f);
    }
    formatted
}

/// Insert commas every three digits, dropping leading zeros.
pub fn group_thousands(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let digits = if trimmed.is_empty() { "0" } else { trimmed };

    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_accepts_digits_and_two_decimals() {
        let mut input = BalanceInput::new(2);
        assert!(input.accept("10000"));
        assert!(input.accept("10000.5"));
        assert!(input.accept("10,000.55"));
        assert_eq!(input.raw, "10000.55");
        assert_eq!(input.value(), dec!(10000.55));
    }

    #[test]
    fn test_rejects_bad_keystrokes() {
        let mut input = BalanceInput::new(2);
        assert!(input.accept("12.34"));
        assert!(!input.accept("12.345"));
        assert!(!input.accept("12.3.4"));
        assert!(!input.accept("12a"));
        assert!(!input.accept("-5"));
        assert_eq!(input.raw, "12.34");
    }

    #[test]
    fn test_empty_is_accepted() {
        let mut input = BalanceInput::new(2);
        input.accept("500");
        assert!(input.accept(""));
        assert!(input.raw.is_empty());
        assert_eq!(input.value(), Decimal::ZERO);
    }

    #[test]
    fn test_rejects_balance_beyond_decimal_range() {
        let mut input = BalanceInput::new(2);
        assert!(input.accept("25000"));

        let too_wide = format!("1{}", "0".repeat(29));
        assert!(!input.accept(&too_wide));
        assert_eq!(input.raw, "25000");
        assert_eq!(input.value(), dec!(25000));

        // The largest 28-digit integer still fits.
        assert!(input.accept(&"9".repeat(28)));
        assert!(input.value() > Decimal::ZERO);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_raw_balance(""), "");
        assert_eq!(format_raw_balance("."), "0.");
        assert_eq!(format_raw_balance("1234567.5"), "1,234,567.5");
        assert_eq!(format_raw_balance("1000."), "1,000.");
        assert_eq!(format_raw_balance(".25"), "0.25");
        assert_eq!(format_raw_balance("999"), "999");
        assert_eq!(format_raw_balance("007"), "7");
    }

    #[test]
    fn test_long_integer_part_keeps_digits() {
        assert_eq!(
            group_thousands("123456789012345678901234567890"),
            "123,456,789,012,345,678,901,234,567,890"
        );
    }
}
