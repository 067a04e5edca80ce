// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the classifier, the provider adapters, and the
//! chat controller.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who authored a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Coarse affect tag derived from keyword heuristics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    /// Only user-authored messages carry a sentiment.
    pub sentiment: Option<Sentiment>,
}

impl Message {
    /// Creates a user message tagged with its sentiment.
    pub fn user(content: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            id: MessageId::new(),
            content: content.into(),
            sender: Sender::User,
            created_at: Utc::now(),
            sentiment: Some(sentiment),
        }
    }

    /// Creates a bot message. Bot messages are never sentiment-tagged.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            content: content.into(),
            sender: Sender::Bot,
            created_at: Utc::now(),
            sentiment: None,
        }
    }
}

/// Where a companion reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReplyOrigin {
    /// Picked from the local response table (no credential).
    Local,
    /// Returned by the remote completion endpoint.
    Remote,
    /// Fixed apology after a remote failure.
    Degraded,
}

/// A displayable companion reply produced by the completion adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub sentiment: Sentiment,
    pub origin: ReplyOrigin,
}

/// API credential for the remote completion endpoint.
///
/// Holding a `Credential` means the value is non-empty; blank input never
/// produces one.
#[derive(Debug, Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Wraps a raw key, returning `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(SecretString::from(trimmed.to_string())))
    }

    /// Returns the secret value for use in an authorization header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Role of a turn in a chat-completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

/// A single turn in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTurn {
    pub role: TurnRole,
    pub content: String,
}

impl CompletionTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A provider-agnostic chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub turns: Vec<CompletionTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A provider-agnostic chat-completion response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Text of the first returned choice, if the provider returned one.
    pub content: Option<String>,
    pub model: String,
}
