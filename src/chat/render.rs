//! Assistant message rendering: bold spans, word tokens, one-time reveal.
//!
//! Model output is untrusted. Only matched `**...**` pairs on a single line
//! become bold; everything else is shown literally, and control characters
//! are dropped so replies cannot drive the terminal.

use std::collections::HashSet;
use std::time::Duration;

use crate::models::MessageId;

/// Remembers which messages have already played their reveal.
#[derive(Debug, Default, Clone)]
pub struct RevealTracker {
    seen: HashSet<MessageId>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a message as already shown, e.g. the greeting.
    pub fn mark_revealed(&mut self, id: MessageId) {
        self.seen.insert(id);
    }

    /// True exactly once per id: on the first render.
    pub fn first_render(&mut self, id: MessageId) -> bool {
        self.seen.insert(id)
    }
}

/// A run of text that is either plain or bold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

/// One word or whitespace run, with the delay before it appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedToken {
    pub text: String,
    pub bold: bool,
    /// `None` when the message is shown without animation
    pub delay: Option<Duration>,
}

/// Drop control characters other than newline and tab.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect()
}

/// Split text on `**bold**` markers. Unmatched markers stay literal and
/// empty spans are dropped.
pub fn split_bold(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after_open) = rest.strip_prefix("**") {
            if let Some(close) = find_close(after_open) {
                if !plain.is_empty() {
                    spans.push(Span {
                        text: std::mem::take(&mut plain),
                        bold: false,
                    });
                }
                let inner = &after_open[..close];
                if !inner.is_empty() {
                    spans.push(Span {
                        text: inner.to_string(),
                        bold: true,
                    });
                }
                rest = &after_open[close + 2..];
                continue;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            plain.push(c);
        }
        rest = chars.as_str();
    }

    if !plain.is_empty() {
        spans.push(Span {
            text: plain,
            bold: false,
        });
    }
    spans
}

/// Closing `**` on the same line, as a byte offset into `text`.
fn find_close(text: &str) -> Option<usize> {
    let line_end = text.find('\n').unwrap_or(text.len());
    text[..line_end].find("**")
}

/// Split into alternating word and whitespace tokens, keeping both.
pub fn word_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Lay out a message for display. With `animate`, the n-th token (counted
/// across spans) waits `n * step`; otherwise everything shows at once.
pub fn render_message(text: &str, animate: bool, step: Duration) -> Vec<RenderedToken> {
    let clean = sanitize(text);
    let mut tokens = Vec::new();
    let mut index: u32 = 0;

    for span in split_bold(&clean) {
        for word in word_tokens(&span.text) {
            tokens.push(RenderedToken {
                text: word.to_string(),
                bold: span.bold,
                delay: animate.then(|| step * index),
            });
            index = index.saturating_add(1);
        }
    }
    tokens
}
