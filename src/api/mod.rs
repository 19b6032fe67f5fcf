//! Hosted text-generation API: provider trait, Gemini client, SSE decoding.

mod gemini_client;
mod generator;
mod sse;
mod types;

pub use gemini_client::{GeminiClient, DEFAULT_MODEL, GEMINI_API_BASE};
pub use generator::TextGenerator;
