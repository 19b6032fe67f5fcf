//! Application configuration assembled from flags and the environment.

use anyhow::Result;

use crate::api::{GeminiClient, DEFAULT_MODEL, GEMINI_API_BASE};
use crate::calculator::CalculatorConfig;
use crate::chat::ChatConfig;

/// Fallback variable for the credential.
pub const FALLBACK_API_KEY_VAR: &str = "API_KEY";

/// Everything the commands need to run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini credential; absent means chat replies fall back to the apology
    pub api_key: Option<String>,

    pub model: String,

    pub api_base_url: String,

    /// Stream replies over SSE instead of waiting for the full response
    pub streaming: bool,

    pub calculator: CalculatorConfig,

    pub chat: ChatConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: GEMINI_API_BASE.to_string(),
            streaming: true,
            calculator: CalculatorConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl AppConfig {
    /// Use `explicit` if set and non-blank, otherwise the fallback variable.
    pub fn resolve_api_key(explicit: Option<String>) -> Option<String> {
        non_blank(explicit).or_else(|| non_blank(std::env::var(FALLBACK_API_KEY_VAR).ok()))
    }

    /// Credential with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                let visible = chars.len().saturating_sub(4);
                let tail: String = chars[visible..].iter().collect();
                format!("{}{}", "*".repeat(visible.min(12)), tail)
            }
        }
    }

    pub fn gemini_client(&self) -> Result<GeminiClient> {
        Ok(GeminiClient::with_base_url(
            self.api_base_url.clone(),
            self.api_key.clone(),
            self.model.clone(),
        )?
        .with_streaming(self.streaming))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
