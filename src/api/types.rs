//! Request and response types for the Gemini generateContent API.

use serde::{Deserialize, Serialize};

/// Text part of a content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

/// A turn (or system instruction) made of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

/// Body of generateContent / streamGenerateContent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request: persona plus one user prompt.
    pub fn single_turn(system_instruction: &str, prompt: &str) -> Self {
        Self {
            system_instruction: Content::text(None, system_instruction),
            contents: vec![Content::text(Some("user"), prompt)],
        }
    }
}

/// One candidate completion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Error object the API embeds in failed responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Full response, or one streamed chunk of it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first().and_then(|c| c.finish_reason.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req = GenerateContentRequest::single_turn("be calm", "what is a pip?");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be calm");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "what is a pip?");
    }

    #[test]
    fn test_chunk_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"A **pip** "},{"text":"is"}]}}]}"#;
        let chunk: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.text(), "A **pip** is");
    }

    #[test]
    fn test_final_chunk_without_text() {
        let raw = r#"{"candidates":[{"finishReason":"STOP"}],"usageMetadata":{"totalTokenCount":12}}"#;
        let chunk: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.text(), "");
        assert_eq!(chunk.finish_reason(), Some("STOP"));
    }

    #[test]
    fn test_error_body() {
        let raw = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        let chunk: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = chunk.error.unwrap();
        assert_eq!(err.code, 400);
        assert_eq!(err.status, "INVALID_ARGUMENT");
    }
}
