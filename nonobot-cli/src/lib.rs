//! # nonobot-cli
//!
//! Argument parsing, config layering and the default handler set.

pub mod app;
pub mod cli;

pub use app::{build_router, handler_listing, run_console};
pub use cli::{load_config, BotArgs, Cli, Commands};
