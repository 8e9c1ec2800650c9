//! Replies with a fixed text when the message equals the trigger token.

use async_trait::async_trait;
use nonobot_core::{parse_property, ChatEvent, ChatHandler, ChatResponse, Config, ConfigError, HandlerResult};
use tracing::debug;

pub const DEFAULT_PING_TRIGGER: &str = "ping";
pub const DEFAULT_PING_REPLY: &str = "pong";

/// The id is `ping` for the default trigger and `ping:<trigger>` otherwise, so ping handlers
/// with different triggers can coexist in one router.
#[derive(Debug, Clone)]
pub struct PingHandler {
    id: String,
    trigger: String,
    reply: String,
}

impl PingHandler {
    pub fn new(trigger: impl Into<String>, reply: impl Into<String>) -> Self {
        let trigger = trigger.into();
        let id = if trigger.eq_ignore_ascii_case(DEFAULT_PING_TRIGGER) {
            DEFAULT_PING_TRIGGER.to_string()
        } else {
            format!("{}:{}", DEFAULT_PING_TRIGGER, trigger.to_lowercase())
        };
        Self {
            id,
            trigger,
            reply: reply.into(),
        }
    }

    /// Reads `ping.trigger` (default "ping") and `ping.reply` (default "pong"). Both must be non-empty.
    pub fn create(config: &dyn Config) -> Result<Self, ConfigError> {
        let trigger: String = parse_property(config, "ping.trigger", DEFAULT_PING_TRIGGER.to_string())?;
        let reply: String = parse_property(config, "ping.reply", DEFAULT_PING_REPLY.to_string())?;
        for (name, value) in [("ping.trigger", &trigger), ("ping.reply", &reply)] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidProperty {
                    name: name.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(Self::new(trigger.trim(), reply))
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }
}

impl Default for PingHandler {
    fn default() -> Self {
        Self::new(DEFAULT_PING_TRIGGER, DEFAULT_PING_REPLY)
    }
}

#[async_trait]
impl ChatHandler for PingHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> Option<String> {
        Some(format!("replies \"{}\" to \"{}\"", self.reply, self.trigger))
    }

    async fn handle(&self, event: &ChatEvent) -> HandlerResult {
        if !event.text.trim().eq_ignore_ascii_case(&self.trigger) {
            return Ok(None);
        }
        debug!(event_id = %event.id, channel = %event.channel, "Ping matched");
        Ok(Some(ChatResponse::reply_to(event, self.reply.clone())))
    }
}
