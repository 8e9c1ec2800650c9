//! # bot-runtime
//!
//! Joins a transport to a [`chat_router::ChatRouter`]: the [`BotRuntime`] event loop, an in-memory
//! channel transport, and a console transport.

mod channel;
mod console;
mod runner;

pub use channel::{channel_transport, ChannelPeer, ChannelPublisher, ChannelSource};
pub use console::{ConsolePublisher, ConsoleSource, CONSOLE_CHANNEL, CONSOLE_SENDER};
pub use runner::BotRuntime;
