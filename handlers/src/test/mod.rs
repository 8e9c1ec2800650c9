//! Unit test module
//!
//! Handler unit tests live here, separate from source files.
//! Tests interact with handlers via public and pub(crate) APIs.

mod logging_handler_test;
mod pattern_handler_test;
mod ping_handler_test;

use nonobot_core::{BotIdentity, ChatEvent};

fn sample_event(text: &str) -> ChatEvent {
    ChatEvent::new("alice", "general", text)
}

/// Event built from raw text the way a transport would, stripping the default bot mention.
fn inbound_event(raw_text: &str) -> ChatEvent {
    ChatEvent::inbound(&BotIdentity::default(), "alice", "general", raw_text)
}
