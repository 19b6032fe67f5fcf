//! Lenient number parsing and rounding shared by the calculator fields.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse the leading numeric prefix of `text`, ignoring thousands separators.
///
/// Leading whitespace is skipped and anything after the number is ignored,
/// so `"2RR"` reads as 2 and `"1,250.5 USD"` as 1250.5. An exponent suffix
/// is honored (`"2.5e1"` is 25). Returns `None` when no digits are found or
/// the value does not fit a `Decimal`.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let cleaned: String = text.chars().filter(|&c| c != ',').collect();
    let s = cleaned.trim_start();
    let bytes = s.as_bytes();

    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &s[int_start..pos];

    let mut frac_part = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_part = &s[frac_start..end];
        pos = end;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    // "e" without exponent digits is trailing text, as in "5e" or "3em".
    let mut exponent = 0i32;
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut end = pos + 1;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            exponent = s[pos + 1..end].parse().ok()?;
        }
    }

    let mut normalized = String::with_capacity(int_part.len() + frac_part.len() + 3);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        normalized.push('.');
        normalized.push_str(frac_part);
    }

    let mantissa = Decimal::from_str(&normalized).ok()?;
    scale_by_power_of_ten(mantissa, exponent)
}

fn scale_by_power_of_ten(value: Decimal, exponent: i32) -> Option<Decimal> {
    let mut scaled = value;
    for _ in 0..exponent.unsigned_abs() {
        if scaled.is_zero() {
            break;
        }
        scaled = if exponent > 0 {
            scaled.checked_mul(Decimal::TEN)?
        } else {
            scaled.checked_div(Decimal::TEN)?
        };
    }
    Some(scaled)
}

/// Like [`parse_decimal`] but unparseable text reads as zero.
pub fn parse_number(text: &str) -> Decimal {
    parse_decimal(text).unwrap_or(Decimal::ZERO)
}

/// Round half away from zero to `dp` places.
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_decimal("25"), Some(dec!(25)));
        assert_eq!(parse_decimal("0.75"), Some(dec!(0.75)));
        assert_eq!(parse_decimal(".5"), Some(dec!(0.5)));
        assert_eq!(parse_decimal("5."), Some(dec!(5)));
        assert_eq!(parse_decimal("-3"), Some(dec!(-3)));
    }

    #[test]
    fn test_parse_strips_separators_and_suffix() {
        assert_eq!(parse_decimal("10,000.50"), Some(dec!(10000.50)));
        assert_eq!(parse_decimal("2RR"), Some(dec!(2)));
        assert_eq!(parse_decimal("  7 pips"), Some(dec!(7)));
    }

    #[test]
    fn test_parse_exponent_suffix() {
        assert_eq!(parse_decimal("2.5e1"), Some(dec!(25)));
        assert_eq!(parse_decimal("1E+3"), Some(dec!(1000)));
        assert_eq!(parse_decimal("15e-1"), Some(dec!(1.5)));
        assert_eq!(parse_decimal("-2e2"), Some(dec!(-200)));
        assert_eq!(parse_number("2.5e1 pips"), dec!(25));
        // A bare "e" is just trailing text.
        assert_eq!(parse_decimal("5e"), Some(dec!(5)));
        assert_eq!(parse_decimal("3em"), Some(dec!(3)));
        assert_eq!(parse_decimal("4e+"), Some(dec!(4)));
        assert_eq!(parse_decimal("1e400"), None);
        assert_eq!(parse_decimal("0e400"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_number("abc"), Decimal::ZERO);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_dp(dec!(1.005), 2), dec!(1.01));
        assert_eq!(round_dp(dec!(1.004), 2), dec!(1.00));
        assert_eq!(round_dp(dec!(33.33333), 2), dec!(33.33));
    }
}
