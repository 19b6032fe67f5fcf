//! Data models for calculator records and chat messages.

mod calculation;
mod message;

pub use calculation::{CalculationInput, CalculationResult};
pub use message::{ChatMessage, MessageId, MessageSender};
