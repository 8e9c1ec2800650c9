//! Regex handlers: `when` reacts to messages not addressed to the bot, `respond` only to messages
//! addressed to it. The pattern must match the whole text.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nonobot_core::{required_property, ChatEvent, ChatHandler, ChatResponse, Config, ConfigError, HandlerResult};
use regex::{Captures, Regex};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only messages not addressed to the bot, i.e. overheard chatter.
    When,
    /// Only messages addressed to the bot (`ChatEvent::addressed`).
    Respond,
}

/// A matched message as seen by a pattern callback.
pub struct Matched<'a> {
    event: &'a ChatEvent,
    captures: Captures<'a>,
}

impl<'a> Matched<'a> {
    pub fn event(&self) -> &ChatEvent {
        self.event
    }

    pub fn body(&self) -> &str {
        &self.event.text
    }

    /// Capture group `index`, starting at 1. Group 0 and out-of-range groups are `None`,
    /// as are groups that did not participate in the match.
    pub fn group(&self, index: usize) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.captures.get(index).map(|m| m.as_str())
    }

    pub fn name(&self, name: &str) -> Option<&str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// Expands `$1` / `$name` references in `template` against the captures.
    pub fn expand(&self, template: &str) -> String {
        let mut expanded = String::new();
        self.captures.expand(template, &mut expanded);
        expanded
    }
}

type Callback = dyn Fn(&Matched<'_>) -> Option<String> + Send + Sync;

pub struct PatternHandler {
    id: String,
    mode: Mode,
    pattern: Regex,
    description: Option<String>,
    callback: Arc<Callback>,
}

impl PatternHandler {
    /// Fails with `ConfigError::InvalidProperty` when `pattern` is not a valid regex.
    pub fn new<F>(id: impl Into<String>, mode: Mode, pattern: &str, callback: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Matched<'_>) -> Option<String> + Send + Sync + 'static,
    {
        let id = id.into();
        let pattern = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| ConfigError::InvalidProperty {
            name: format!("{}.pattern", id),
            reason: e.to_string(),
        })?;
        Ok(Self {
            id,
            mode,
            pattern,
            description: None,
            callback: Arc::new(callback),
        })
    }

    pub fn when<F>(id: impl Into<String>, pattern: &str, callback: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Matched<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(id, Mode::When, pattern, callback)
    }

    pub fn respond<F>(id: impl Into<String>, pattern: &str, callback: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Matched<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(id, Mode::Respond, pattern, callback)
    }

    /// Canned reply handler defined entirely by config. `{id}.pattern` and `{id}.reply` are
    /// required; `{id}.mode` is `when` or `respond` (default); `{id}.description` is optional.
    /// Capture references in the reply (`$1`, `$name`) are expanded.
    pub fn create(config: &dyn Config, id: &str) -> Result<Self, ConfigError> {
        let pattern = required_property(config, &format!("{}.pattern", id))?;
        let reply = required_property(config, &format!("{}.reply", id))?;
        let mode_key = format!("{}.mode", id);
        let mode = match config.get_property(&mode_key).as_deref().map(str::trim) {
            None | Some("respond") => Mode::Respond,
            Some("when") => Mode::When,
            Some(other) => {
                return Err(ConfigError::InvalidProperty {
                    name: mode_key,
                    reason: format!("expected \"when\" or \"respond\", got \"{}\"", other),
                })
            }
        };

        let handler = Self::new(id, mode, &pattern, move |m| Some(m.expand(&reply)))?;
        Ok(match config.get_property(&format!("{}.description", id)) {
            Some(description) => handler.with_description(description),
            None => handler,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl fmt::Debug for PatternHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternHandler")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

#[async_trait]
impl ChatHandler for PatternHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    async fn handle(&self, event: &ChatEvent) -> HandlerResult {
        if event.addressed != (self.mode == Mode::Respond) {
            return Ok(None);
        }
        let Some(captures) = self.pattern.captures(&event.text) else {
            return Ok(None);
        };
        debug!(handler = %self.id, event_id = %event.id, "Pattern matched");
        let matched = Matched { event, captures };
        Ok((self.callback)(&matched).map(|text| ChatResponse::reply_to(event, text)))
    }
}
