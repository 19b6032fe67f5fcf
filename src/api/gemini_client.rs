//! Google Gemini client for streamed single-turn chat replies.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::{Client, Response};
use tracing::{debug, warn};

use super::generator::{FragmentStream, TextGenerator};
use super::sse::SseDecoder;
use super::types::{GenerateContentRequest, GenerateContentResponse};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

// Only the connect phase is bounded; a slow stream is allowed to run.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the Gemini generateContent endpoints.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    streaming: bool,
}

impl GeminiClient {
    /// Create a client against `base_url`. A missing key is allowed;
    /// requests will fail.
    pub fn with_base_url(
        base_url: String,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!("Gemini API key not configured; chat replies will fail");
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            streaming: true,
        })
    }

    /// Use plain request/response instead of SSE streaming.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    async fn post(&self, url: &str, body: &GenerateContentRequest) -> Result<Response> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("Gemini API key not configured");
        };

        debug!(url = %url, model = %self.model, "Sending generation request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .context("Failed to reach Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Gemini request failed: {} - {}", status, body);
        }

        Ok(response)
    }

    /// Fetch the whole reply in one response.
    pub async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::single_turn(system_instruction, prompt);
        let response = self.post(&self.endpoint("generateContent"), &request).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        if let Some(err) = body.error {
            bail!("Gemini API error {} ({}): {}", err.code, err.status, err.message);
        }
        Ok(body.text())
    }

    /// Open an SSE stream and expose its chunks as text fragments.
    async fn open_stream(&self, system_instruction: &str, prompt: &str) -> Result<FragmentStream> {
        let request = GenerateContentRequest::single_turn(system_instruction, prompt);
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(&url, &request).await?;

        let bytes = response.bytes_stream().boxed();
        let fragments = stream::unfold(
            (bytes, SseDecoder::new(), VecDeque::<String>::new(), false),
            |(mut bytes, mut decoder, mut pending, mut closed)| async move {
                loop {
                    if let Some(payload) = pending.pop_front() {
                        let item = parse_chunk(&payload);
                        return Some((item, (bytes, decoder, pending, closed)));
                    }
                    if closed {
                        return None;
                    }
                    match bytes.next().await {
                        Some(Ok(chunk)) => pending.extend(decoder.push(&chunk)),
                        Some(Err(e)) => {
                            closed = true;
                            let err = anyhow::Error::new(e).context("Reply stream interrupted");
                            return Some((Err(err), (bytes, decoder, pending, closed)));
                        }
                        None => {
                            closed = true;
                            pending.extend(decoder.finish());
                        }
                    }
                }
            },
        );

        Ok(fragments.boxed())
    }
}

/// Decode one SSE payload into the text it carries.
fn parse_chunk(payload: &str) -> Result<String> {
    let chunk: GenerateContentResponse =
        serde_json::from_str(payload).context("Failed to parse stream chunk")?;

    if let Some(err) = chunk.error {
        bail!("Gemini API error {} ({}): {}", err.code, err.status, err.message);
    }
    if let Some(reason) = chunk.finish_reason() {
        debug!(reason = %reason, "Reply finished");
    }
    Ok(chunk.text())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn stream_reply(&self, system_instruction: &str, prompt: &str) -> Result<FragmentStream> {
        if self.streaming {
            return self.open_stream(system_instruction, prompt).await;
        }
        let text = self.generate(system_instruction, prompt).await?;
        Ok(stream::iter(vec![Ok(text)]).boxed())
    }
}
