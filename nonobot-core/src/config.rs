//! Read-only property source consulted by handlers and the router at construction time.
//!
//! [`EnvConfig`] maps `router.policy` to `NONOBOT_ROUTER_POLICY`; load `.env` first
//! (e.g. `dotenvy::dotenv()`) if properties live there.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

pub const DEFAULT_ENV_PREFIX: &str = "NONOBOT";

/// String-keyed property store. No mutation API.
pub trait Config: Send + Sync {
    fn get_property(&self, name: &str) -> Option<String>;
}

/// Returns the property or [`ConfigError::MissingProperty`].
pub fn required_property(config: &dyn Config, name: &str) -> Result<String, ConfigError> {
    config
        .get_property(name)
        .ok_or_else(|| ConfigError::MissingProperty(name.to_string()))
}

/// Parses the property if present, otherwise returns `default`.
pub fn parse_property<T>(config: &dyn Config, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match config.get_property(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidProperty {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}

/// In-memory properties; used by tests and embedders that load config themselves.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    properties: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Config for MapConfig {
    fn get_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}

/// Properties read from environment variables: `PREFIX_` + name upper-cased, `.` and `-` as `_`.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    prefix: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable consulted for `name`.
    pub fn var_name(&self, name: &str) -> String {
        let key: String = name
            .chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        if self.prefix.is_empty() {
            key
        } else {
            format!("{}_{}", self.prefix, key)
        }
    }
}

impl Config for EnvConfig {
    fn get_property(&self, name: &str) -> Option<String> {
        env::var(self.var_name(name)).ok()
    }
}

/// Looks up `overrides` first, then `fallback`. Lets CLI flags shadow env properties.
pub struct LayeredConfig<A, B> {
    overrides: A,
    fallback: B,
}

impl<A: Config, B: Config> LayeredConfig<A, B> {
    pub fn new(overrides: A, fallback: B) -> Self {
        Self {
            overrides,
            fallback,
        }
    }
}

impl<A: Config, B: Config> Config for LayeredConfig<A, B> {
    fn get_property(&self, name: &str) -> Option<String> {
        self.overrides
            .get_property(name)
            .or_else(|| self.fallback.get_property(name))
    }
}
