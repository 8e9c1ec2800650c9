//! Transport boundary: where events come from and where responses go.
//!
//! Implementations own reconnection, authentication, and protocol framing. The core only sees
//! [`InboundEvent`]s and publishes [`ChatResponse`]s.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{ChatEvent, ChatResponse, SessionId};

/// Item delivered by an [`EventSource`]. Delivery is at-least-once.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Message(ChatEvent),
    /// The session's connection is gone; in-flight dispatches for it may be cancelled.
    SessionClosed(SessionId),
}

/// Push-based subscription. `None` means the source is exhausted.
#[async_trait]
pub trait EventSource: Send {
    async fn next(&mut self) -> Option<InboundEvent>;
}

/// Outbound delivery of responses.
#[async_trait]
pub trait ResponsePublisher: Send + Sync {
    async fn publish(&self, response: &ChatResponse) -> Result<(), TransportError>;
}
