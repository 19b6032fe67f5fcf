//! Chat assistant configuration: persona, canned replies, reveal pacing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const SYSTEM_INSTRUCTION: &str = "You are DHAQAALE AI, a calm, precise, encouraging, and emotionally intelligent assistant for forex traders.
Your goal is to guide, explain, and motivate in a relaxing and premium environment.
Your language should be clear, friendly, and slightly motivational but never overhyped.

CRITICAL: You *must* use markdown for emphasis. Use **text** for bolding key concepts like **risk management**, **pips**, **lot size**, **stop loss**, or **leverage**.
Do **not** use italics (*text* or _text_) as they are not preferred. Stick to bolding for emphasis. This is a strict rule.
For example: Your target profit is **$2,350.00**, and your risk-to-reward ratio is strong!
You can use a suitable emoji sometimes to add a friendly touch, like this: You're improving fast, trader 💹.";

pub const GREETING: &str = "Hello! How can I help you with your trades today?";

pub const APOLOGY: &str = "Sorry, I'm having trouble connecting right now.";

/// Settings for a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Persona instruction sent with every prompt
    pub system_instruction: String,

    /// Assistant message the session opens with
    pub greeting: String,

    /// Reply used whenever the provider fails
    pub apology: String,

    /// Delay between revealed words, in milliseconds
    pub reveal_step_ms: u64,
}

impl ChatConfig {
    pub fn reveal_step(&self) -> Duration {
        Duration::from_millis(self.reveal_step_ms)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            greeting: GREETING.to_string(),
            apology: APOLOGY.to_string(),
            reveal_step_ms: 50,
        }
    }
}
