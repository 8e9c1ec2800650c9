//! Bot name and aliases, and recognition of messages addressed to the bot.

use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const DEFAULT_BOT_NAME: &str = "nono";

/// Names the bot answers to. Built from `bot.name` and the comma separated `bot.aliases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub name: String,
    pub aliases: Vec<String>,
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_NAME)
    }
}

impl BotIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_config(config: &dyn Config) -> Self {
        let name = config
            .get_property("bot.name")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string());
        let aliases: Vec<String> = config
            .get_property("bot.aliases")
            .map(|s| {
                s.split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self::new(name).with_aliases(aliases)
    }

    /// Returns the text after a leading mention (`name rest`, `name:rest`, `@name rest`, `@name:rest`),
    /// or `None` when the text is not addressed to the bot.
    pub fn strip_address<'a>(&self, text: &'a str) -> Option<&'a str> {
        let trimmed = text.trim_start();
        let unprefixed = trimmed.strip_prefix('@').unwrap_or(trimmed);
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .filter(|n| !n.is_empty())
            .find_map(|n| {
                let rest = unprefixed.strip_prefix(n.as_str())?;
                let mut chars = rest.chars();
                match chars.next() {
                    Some(':') => Some(chars.as_str().trim()),
                    Some(c) if c.is_whitespace() => Some(rest.trim()),
                    _ => None,
                }
            })
    }
}
