//! # nonobot-core
//!
//! Core types and traits for the chat bot: [`ChatEvent`], [`ChatResponse`], [`ChatHandler`],
//! the transport boundary ([`EventSource`], [`ResponsePublisher`]), configuration ([`Config`]),
//! the handler-failure side channel ([`FailureSink`]), and tracing initialization.
//! Transport-agnostic; used by chat-router, handlers, and bot-runtime.

pub mod config;
pub mod error;
pub mod failure;
pub mod identity;
pub mod logger;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test;

pub use config::{
    parse_property, required_property, Config, EnvConfig, LayeredConfig, MapConfig,
};
pub use error::{ConfigError, HandlerError, NonobotError, Result, RouterError, TransportError};
pub use failure::{FailureSink, HandlerFailure, Severity, TracingFailureSink};
pub use identity::{BotIdentity, DEFAULT_BOT_NAME};
pub use logger::{init_file_tracing, init_tracing};
pub use transport::{EventSource, InboundEvent, ResponsePublisher};
pub use types::{
    ChatEvent, ChatHandler, ChatResponse, HandlerResult, SessionId, DEFAULT_SESSION,
};
