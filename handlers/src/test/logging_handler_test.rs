//! Unit tests for LoggingHandler.

use super::sample_event;
use crate::LoggingHandler;
use nonobot_core::ChatHandler;

#[tokio::test]
async fn test_logging_handler_never_responds() {
    let handler = LoggingHandler;
    let result = handler.handle(&sample_event("hello")).await;
    assert!(result.is_ok());
    assert!(result.unwrap().is_none());
}

#[test]
fn test_logging_handler_hidden_from_help() {
    assert_eq!(LoggingHandler.id(), "logging");
    assert!(LoggingHandler.description().is_none());
}
