//! In-memory transport backed by tokio channels. Used by tests and embedders that bridge their own
//! protocol client into the runtime.

use async_trait::async_trait;
use nonobot_core::{
    ChatEvent, ChatResponse, EventSource, InboundEvent, ResponsePublisher, SessionId,
    TransportError,
};
use tokio::sync::mpsc;

pub struct ChannelSource {
    rx: mpsc::Receiver<InboundEvent>,
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn next(&mut self) -> Option<InboundEvent> {
        self.rx.recv().await
    }
}

#[derive(Clone)]
pub struct ChannelPublisher {
    tx: mpsc::UnboundedSender<ChatResponse>,
}

#[async_trait]
impl ResponsePublisher for ChannelPublisher {
    async fn publish(&self, response: &ChatResponse) -> Result<(), TransportError> {
        self.tx
            .send(response.clone())
            .map_err(|_| TransportError::Closed)
    }
}

/// The far side of a channel transport: pushes events in, reads responses out.
/// Dropping it (or every clone of its sender) ends the [`ChannelSource`].
pub struct ChannelPeer {
    events: mpsc::Sender<InboundEvent>,
    responses: mpsc::UnboundedReceiver<ChatResponse>,
}

impl ChannelPeer {
    pub async fn send_event(&self, event: ChatEvent) -> Result<(), TransportError> {
        self.events
            .send(InboundEvent::Message(event))
            .await
            .map_err(|_| TransportError::Closed)
    }

    pub async fn close_session(&self, session: impl Into<SessionId>) -> Result<(), TransportError> {
        self.events
            .send(InboundEvent::SessionClosed(session.into()))
            .await
            .map_err(|_| TransportError::Closed)
    }

    pub async fn recv(&mut self) -> Option<ChatResponse> {
        self.responses.recv().await
    }

    /// Closes the inbound side, letting the runtime drain and stop, while responses can still be read.
    pub fn into_receiver(self) -> mpsc::UnboundedReceiver<ChatResponse> {
        self.responses
    }
}

/// Builds a connected (peer, source, publisher) triple; `buffer` bounds pending inbound events.
pub fn channel_transport(buffer: usize) -> (ChannelPeer, ChannelSource, ChannelPublisher) {
    let (events_tx, events_rx) = mpsc::channel(buffer);
    let (responses_tx, responses_rx) = mpsc::unbounded_channel();
    (
        ChannelPeer {
            events: events_tx,
            responses: responses_rx,
        },
        ChannelSource { rx: events_rx },
        ChannelPublisher { tx: responses_tx },
    )
}
