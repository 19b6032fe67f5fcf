//! Terminal presentation for calculator results and chat messages.

use std::io::Write;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculator::{group_thousands, round_dp};
use crate::chat::RenderedToken;
use crate::models::{CalculationResult, ChatMessage, MessageSender};

const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// `1234.5` -> `1,234.50`
pub fn format_currency(value: Decimal) -> String {
    let fixed = format!("{:.2}", round_dp(value, 2));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
}

/// Encouragement line picked by account size.
pub fn motivational_message(balance: Decimal) -> &'static str {
    if balance < dec!(100) {
        "💭 Small wins make great traders. Keep going! 🌱"
    } else if balance <= dec!(5000) {
        "💸 Nice one! 📈 You're building real momentum — keep pushing forward!"
    } else if balance <= dec!(20000) {
        "💥 Boom! 💪 You're breaking limits and moving to the next level!"
    } else if balance <= dec!(50000) {
        "🔥 Unstoppable energy! 🔥 You're trading like a champion!"
    } else if balance <= dec!(100000) {
        "👑 You're becoming unstoppable — precision meets power!"
    } else {
        "👑 Legend status unlocked! 👑 You're the GOAT of the markets!"
    }
}

/// Result block as printed after a calculation.
pub struct ResultsCard<'a>(pub &'a CalculationResult);

impl std::fmt::Display for ResultsCard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        writeln!(f, "\n{:=^44}", " POSITION ")?;
        writeln!(f, "Lot Size:       {:>16}", format!("{:.2}", round_dp(r.lot_size, 2)))?;
        writeln!(f, "Pip Value:      {:>16}", format!("${}", format_currency(r.pip_value)))?;
        writeln!(f, "Risk Amount:    {:>16}", format!("${}", format_currency(r.risk_amount)))?;
        writeln!(
            f,
            "Target Profit:  {}{:>16}{}",
            GREEN,
            format!("${}", format_currency(r.target_profit)),
            RESET
        )?;
        writeln!(f, "{:=^44}", "")?;
        writeln!(f, "{}{}{}", GREEN, motivational_message(r.account_balance), RESET)?;
        Ok(())
    }
}

/// One dot of the typing indicator, one per streamed fragment.
///
/// Write failures are logged and dropped.
pub fn typing_tick<W: Write>(out: &mut W) {
    if let Err(e) = write!(out, ".").and_then(|_| out.flush()) {
        debug!(error = %e, "Failed to draw typing indicator");
    }
}

/// Print a chat message, playing the word reveal when tokens carry delays.
pub async fn print_message(message: &ChatMessage, tokens: &[RenderedToken]) -> Result<()> {
    let label = match message.sender {
        MessageSender::User => "You",
        MessageSender::Assistant => "Dhaqaale AI",
    };

    let mut out = std::io::stdout();
    write!(out, "[{}] {}{}:{} ", message.created_at.format("%H:%M"), BOLD, label, RESET)
        .context("Failed to write to stdout")?;

    let mut elapsed = std::time::Duration::ZERO;
    for token in tokens {
        if let Some(delay) = token.delay {
            if delay > elapsed {
                out.flush().context("Failed to flush stdout")?;
                tokio::time::sleep(delay - elapsed).await;
                elapsed = delay;
            }
        }
        let written = if token.bold {
            write!(out, "{}{}{}", BOLD, token.text, RESET)
        } else {
            write!(out, "{}", token.text)
        };
        written.context("Failed to write to stdout")?;
    }

    writeln!(out).context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "0.00");
        assert_eq!(format_currency(dec!(4)), "4.00");
        assert_eq!(format_currency(dec!(1234.5)), "1,234.50");
        assert_eq!(format_currency(dec!(2350)), "2,350.00");
        assert_eq!(format_currency(dec!(1000000.005)), "1,000,000.01");
        assert_eq!(format_currency(dec!(-1234.5)), "-1,234.50");
    }

    #[test]
    fn test_motivational_tiers() {
        assert!(motivational_message(dec!(99.99)).contains("Small wins"));
        assert!(motivational_message(dec!(100)).contains("Nice one"));
        assert!(motivational_message(dec!(5000)).contains("Nice one"));
        assert!(motivational_message(dec!(5000.01)).contains("Boom"));
        assert!(motivational_message(dec!(20000)).contains("Boom"));
        assert!(motivational_message(dec!(50000)).contains("champion"));
        assert!(motivational_message(dec!(100000)).contains("precision meets power"));
        assert!(motivational_message(dec!(100000.01)).contains("Legend"));
    }

    /// Accepts writes, refuses to flush.
    struct UnflushableWriter(Vec<u8>);

    impl Write for UnflushableWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_typing_tick() {
        let mut out = Vec::new();
        typing_tick(&mut out);
        typing_tick(&mut out);
        assert_eq!(out, b"..");

        let mut broken = UnflushableWriter(Vec::new());
        typing_tick(&mut broken);
        assert_eq!(broken.0, b".");
    }

    #[test]
    fn test_results_card() {
        let result = CalculationResult {
            lot_size: dec!(0.4),
            pip_value: dec!(4),
            risk_amount: dec!(100),
            target_profit: dec!(200),
            account_balance: dec!(10000),
        };
        let text = ResultsCard(&result).to_string();
        assert!(text.contains("0.40"));
        assert!(text.contains("$4.00"));
        assert!(text.contains("$100.00"));
        assert!(text.contains("$200.00"));
        assert!(text.contains("Boom"));
    }
}
