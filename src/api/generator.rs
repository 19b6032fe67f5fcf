//! Text-generation capability the chat assistant talks to.

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Lazily produced reply fragments. Their concatenation is the full reply.
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// A hosted model that turns a persona instruction and a single prompt into
/// a streamed reply. Each call is an independent single-turn exchange.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for logs (e.g., "gemini")
    fn name(&self) -> &str;

    /// Start a reply. Errors before the first fragment are returned here;
    /// errors mid-stream arrive as `Err` items.
    async fn stream_reply(&self, system_instruction: &str, prompt: &str) -> Result<FragmentStream>;
}
