//! Chat transcript - the messages exchanged with the assistant in one conversation.
//!
//! Transcripts live only in memory and are never persisted.

use std::fmt;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The person asking
    User,
    /// The finance assistant
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "👤"),
            Self::Assistant => write!(f, "🤖"),
        }
    }
}

/// One message in a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message text
    pub content: String,
    /// Author
    pub sender: Sender,
}

impl ChatMessage {
    /// A message written by the user.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
        }
    }

    /// A reply written by the assistant.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Assistant,
        }
    }
}

/// Number of messages a transcript keeps by default.
pub const DEFAULT_TRANSCRIPT_LIMIT: usize = 50;

/// Append-only list of the most recent chat messages.
///
/// Once `limit` messages are held, each new message evicts the oldest one.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    limit: usize,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::with_limit(DEFAULT_TRANSCRIPT_LIMIT)
    }
}

impl Transcript {
    /// Creates an empty transcript keeping [`DEFAULT_TRANSCRIPT_LIMIT`] messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty transcript keeping at most `limit` messages (at least one).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Appends a message, dropping the oldest ones beyond the limit.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > self.limit {
            let excess = self.messages.len() - self.limit;
            self.messages.drain(..excess);
        }
    }

    /// All messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The last `count` messages, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }

    /// Whether nothing has been said yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
