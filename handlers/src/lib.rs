//! # Handlers for the nonobot router
//!
//! Concrete [`nonobot_core::ChatHandler`]s: ping, help, regex patterns (`when` / `respond`), and logging.

mod help;
mod logging;
mod pattern;
mod ping;

#[cfg(test)]
mod test;

pub use help::HelpHandler;
pub use logging::LoggingHandler;
pub use pattern::{Matched, Mode, PatternHandler};
pub use ping::PingHandler;
