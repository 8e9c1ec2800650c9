//! Router options. Every option is explicit; [`RouterConfig::default`] documents the defaults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use nonobot_core::{parse_property, Config, ConfigError};

/// How many handlers see an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPolicy {
    /// Handlers run one at a time; the first response ends the dispatch.
    #[default]
    FirstMatch,
    /// Every handler runs (concurrently); all responses are yielded in registration order.
    All,
}

impl FromStr for DispatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_match" | "first-match" | "first" => Ok(Self::FirstMatch),
            "all" => Ok(Self::All),
            other => Err(format!("unknown dispatch policy '{}' (expected first_match or all)", other)),
        }
    }
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMatch => f.write_str("first_match"),
            Self::All => f.write_str("all"),
        }
    }
}

/// What `register` does with a handler whose id is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// No-op; the existing handle is returned.
    #[default]
    Ignore,
    /// Fails with `RouterError::DuplicateHandler`.
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown duplicate policy '{}' (expected ignore or reject)", other)),
        }
    }
}

pub const DEFAULT_DEDUP_WINDOW: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub policy: DispatchPolicy,
    pub duplicate_policy: DuplicatePolicy,
    /// Per-handler time limit; `None` lets handlers run unbounded.
    pub handler_timeout: Option<Duration>,
    /// Number of recent event ids remembered to drop redeliveries; 0 disables deduplication.
    pub dedup_window: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            policy: DispatchPolicy::FirstMatch,
            duplicate_policy: DuplicatePolicy::Ignore,
            handler_timeout: None,
            dedup_window: DEFAULT_DEDUP_WINDOW,
        }
    }
}

impl RouterConfig {
    /// Reads `router.policy`, `router.duplicates`, `router.handler_timeout_ms` (0 = none) and
    /// `router.dedup_window`; absent properties keep their defaults.
    pub fn from_config(config: &dyn Config) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_ms: u64 = parse_property(config, "router.handler_timeout_ms", 0)?;
        Ok(Self {
            policy: parse_property(config, "router.policy", defaults.policy)?,
            duplicate_policy: parse_property(config, "router.duplicates", defaults.duplicate_policy)?,
            handler_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            dedup_window: parse_property(config, "router.dedup_window", defaults.dedup_window)?,
        })
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = Some(timeout);
        self
    }

    pub fn with_dedup_window(mut self, dedup_window: usize) -> Self {
        self.dedup_window = dedup_window;
        self
    }
}
