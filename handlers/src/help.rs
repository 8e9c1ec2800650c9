//! Lists the other registered handlers' descriptions.

use async_trait::async_trait;
use chat_router::RegistryView;
use nonobot_core::{parse_property, ChatEvent, ChatHandler, ChatResponse, Config, ConfigError, HandlerResult};
use tracing::{debug, warn};

pub const DEFAULT_HELP_TRIGGER: &str = "help";

const HELP_ID: &str = "help";

/// Holds a weak [`RegistryView`], never the router itself.
#[derive(Debug, Clone)]
pub struct HelpHandler {
    trigger: String,
    registry: RegistryView,
}

impl HelpHandler {
    pub fn new(trigger: impl Into<String>, registry: RegistryView) -> Self {
        Self {
            trigger: trigger.into(),
            registry,
        }
    }

    /// Reads `help.trigger` (default "help").
    pub fn create(config: &dyn Config, registry: RegistryView) -> Result<Self, ConfigError> {
        let trigger: String = parse_property(config, "help.trigger", DEFAULT_HELP_TRIGGER.to_string())?;
        if trigger.trim().is_empty() {
            return Err(ConfigError::InvalidProperty {
                name: "help.trigger".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(Self::new(trigger.trim(), registry))
    }

    fn listing(&self) -> Option<String> {
        let lines: Vec<String> = self
            .registry
            .descriptions()?
            .into_iter()
            .filter(|d| d.id != HELP_ID)
            .filter_map(|d| d.description.map(|text| format!("{} - {}", d.id, text)))
            .collect();
        if lines.is_empty() {
            return Some("No commands available.".to_string());
        }
        Some(format!("Available commands:\n{}", lines.join("\n")))
    }
}

#[async_trait]
impl ChatHandler for HelpHandler {
    fn id(&self) -> &str {
        HELP_ID
    }

    fn description(&self) -> Option<String> {
        Some(format!("lists available commands (\"{}\")", self.trigger))
    }

    async fn handle(&self, event: &ChatEvent) -> HandlerResult {
        if !event.text.trim().eq_ignore_ascii_case(&self.trigger) {
            return Ok(None);
        }
        match self.listing() {
            Some(text) => {
                debug!(event_id = %event.id, "Help listing built");
                Ok(Some(ChatResponse::reply_to(event, text)))
            }
            None => {
                warn!(event_id = %event.id, "Help requested but router is gone");
                Ok(None)
            }
        }
    }
}
