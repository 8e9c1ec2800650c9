//! Logs each message; never responds. Register it first so every event is logged even under first match.

use async_trait::async_trait;
use nonobot_core::{ChatEvent, ChatHandler, HandlerResult};
use tracing::{info, instrument};

#[derive(Debug, Clone, Default)]
pub struct LoggingHandler;

#[async_trait]
impl ChatHandler for LoggingHandler {
    fn id(&self) -> &str {
        "logging"
    }

    #[instrument(skip(self, event))]
    async fn handle(&self, event: &ChatEvent) -> HandlerResult {
        info!(
            event_id = %event.id,
            session = %event.session,
            sender = %event.sender,
            channel = %event.channel,
            addressed = event.addressed,
            message_content = %event.text,
            "Received message"
        );
        Ok(None)
    }
}
