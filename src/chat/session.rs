//! Chat session: append-only message log, pending gate, reply consumer.

use anyhow::Result;
use futures::StreamExt;
use tracing::{debug, error, info, warn};

use crate::api::TextGenerator;
use crate::models::{ChatMessage, MessageId};

use super::render::RevealTracker;
use super::ChatConfig;

/// Drain a reply stream, handing each fragment to `on_fragment` as it
/// arrives and returning the concatenation once the stream ends.
///
/// The first failed fragment aborts the whole reply.
pub async fn collect_reply<F>(
    generator: &dyn TextGenerator,
    system_instruction: &str,
    prompt: &str,
    mut on_fragment: F,
) -> Result<String>
where
    F: FnMut(&str),
{
    let mut fragments = generator.stream_reply(system_instruction, prompt).await?;
    let mut reply = String::new();
    let mut count = 0usize;

    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        count += 1;
        on_fragment(&fragment);
        reply.push_str(&fragment);
    }

    debug!(fragments = count, chars = reply.len(), "Reply stream drained");
    Ok(reply)
}

/// Proof that a submit was accepted; consumed by [`ChatSession::commit`].
#[derive(Debug)]
pub struct PendingExchange {
    prompt: String,
}

impl PendingExchange {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// One chat conversation held in memory.
pub struct ChatSession {
    config: ChatConfig,
    messages: Vec<ChatMessage>,
    pending: bool,
    reveals: RevealTracker,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(ChatConfig::default())
    }
}

impl ChatSession {
    /// Start a session with the greeting already on screen.
    pub fn new(config: ChatConfig) -> Self {
        let greeting = ChatMessage::assistant(config.greeting.clone());
        let mut reveals = RevealTracker::new();
        reveals.mark_revealed(greeting.id);

        Self {
            config,
            messages: vec![greeting],
            pending: false,
            reveals,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True the first time a message is asked about, false afterwards.
    pub fn should_reveal(&mut self, id: MessageId) -> bool {
        self.reveals.first_render(id)
    }

    /// Accept a submit: append the user message and enter pending.
    ///
    /// Blank input or a request already in flight is a no-op.
    pub fn begin(&mut self, input: &str) -> Option<PendingExchange> {
        if input.trim().is_empty() {
            return None;
        }
        if self.pending {
            debug!("Submit ignored: reply already pending");
            return None;
        }

        self.messages.push(ChatMessage::user(input));
        self.pending = true;
        Some(PendingExchange {
            prompt: input.to_string(),
        })
    }

    /// Append the assistant reply for `exchange` and leave pending.
    pub fn commit(&mut self, _exchange: PendingExchange, reply: String) -> &ChatMessage {
        self.pending = false;
        self.messages.push(ChatMessage::assistant(reply));
        &self.messages[self.messages.len() - 1]
    }

    /// Full submit cycle against `generator`.
    ///
    /// Always ends with exactly one assistant message when the submit is
    /// accepted; failures and empty replies become the configured apology.
    pub async fn submit<F>(
        &mut self,
        input: &str,
        generator: &dyn TextGenerator,
        on_fragment: F,
    ) -> Option<&ChatMessage>
    where
        F: FnMut(&str),
    {
        let exchange = self.begin(input)?;
        info!(provider = generator.name(), chars = input.len(), "Sending chat prompt");

        let reply = match collect_reply(
            generator,
            &self.config.system_instruction,
            exchange.prompt(),
            on_fragment,
        )
        .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(provider = generator.name(), "Empty reply from provider");
                self.config.apology.clone()
            }
            Err(e) => {
                error!(provider = generator.name(), error = %format!("{:#}", e), "Chat request failed");
                self.config.apology.clone()
            }
        };

        Some(self.commit(exchange, reply))
    }
}
