//! Core types: inbound event, outbound response, and the ChatHandler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HandlerError;
use crate::identity::BotIdentity;

/// Session a [`ChatEvent`] was received on. Closing a session cancels its in-flight dispatches.
pub type SessionId = String;

/// Session used when the transport does not distinguish connections.
pub const DEFAULT_SESSION: &str = "default";

/// One inbound chat message. Shared immutably (behind `Arc`) for the duration of a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Delivery id; a redelivery of the same message carries the same id.
    pub id: String,
    pub session: SessionId,
    pub sender: String,
    pub channel: String,
    /// Message text. For addressed messages the bot mention is already stripped.
    pub text: String,
    /// Whether the message mentioned the bot by name or alias.
    pub addressed: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatEvent {
    /// Creates an unaddressed event on the default session with a fresh id and the current time.
    pub fn new(
        sender: impl Into<String>,
        channel: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session: DEFAULT_SESSION.to_string(),
            sender: sender.into(),
            channel: channel.into(),
            text: text.into(),
            addressed: false,
            timestamp: Utc::now(),
        }
    }

    /// Creates an event from raw transport text, stripping a leading bot mention if present.
    pub fn inbound(
        identity: &BotIdentity,
        sender: impl Into<String>,
        channel: impl Into<String>,
        raw_text: &str,
    ) -> Self {
        match identity.strip_address(raw_text) {
            Some(rest) => Self::new(sender, channel, rest).with_addressed(true),
            None => Self::new(sender, channel, raw_text),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_session(mut self, session: impl Into<SessionId>) -> Self {
        self.session = session.into();
        self
    }

    pub fn with_addressed(mut self, addressed: bool) -> Self {
        self.addressed = addressed;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Outbound message produced by a handler and forwarded to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub channel: String,
    pub text: String,
}

impl ChatResponse {
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
        }
    }

    /// Response on the same channel the event arrived on.
    pub fn reply_to(event: &ChatEvent, text: impl Into<String>) -> Self {
        Self::new(event.channel.clone(), text)
    }
}

/// Outcome of a single handler invocation: `Ok(None)` means the handler did not apply.
pub type HandlerResult = std::result::Result<Option<ChatResponse>, HandlerError>;

/// A single reactive behavior. Invoked concurrently for different events, so any
/// internal state needs its own synchronization.
#[async_trait]
pub trait ChatHandler: Send + Sync {
    /// Stable identity used for duplicate detection and failure reports.
    fn id(&self) -> &str;

    /// One-line description listed by the help handler. `None` hides the handler from help.
    fn description(&self) -> Option<String> {
        None
    }

    /// Inspects the event and optionally produces a response.
    async fn handle(&self, event: &ChatEvent) -> HandlerResult;
}
