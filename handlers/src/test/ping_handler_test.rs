//! Unit tests for PingHandler.

use std::sync::Arc;

use super::sample_event;
use crate::PingHandler;
use chat_router::{ChatRouter, DispatchPolicy, RouterConfig};
use nonobot_core::{ChatHandler, ChatResponse, ConfigError, MapConfig};

#[tokio::test]
async fn test_ping_replies_pong() {
    let handler = PingHandler::create(&MapConfig::new()).unwrap();
    let response = handler.handle(&sample_event("ping")).await.unwrap();
    assert_eq!(response, Some(ChatResponse::new("general", "pong")));
}

#[tokio::test]
async fn test_ping_ignores_other_text() {
    let handler = PingHandler::create(&MapConfig::new()).unwrap();
    let response = handler.handle(&sample_event("hello")).await.unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_ping_trigger_is_trimmed_and_case_insensitive() {
    let handler = PingHandler::default();
    let response = handler.handle(&sample_event("  PING ")).await.unwrap();
    assert_eq!(response.map(|r| r.text), Some("pong".to_string()));
}

#[tokio::test]
async fn test_ping_custom_config() {
    let config = MapConfig::new().with("ping.trigger", "marco").with("ping.reply", "polo");
    let handler = PingHandler::create(&config).unwrap();

    assert_eq!(handler.trigger(), "marco");
    assert!(handler.handle(&sample_event("ping")).await.unwrap().is_none());
    let response = handler.handle(&sample_event("marco")).await.unwrap();
    assert_eq!(response.map(|r| r.text), Some("polo".to_string()));
}

#[test]
fn test_ping_empty_reply_rejected() {
    let config = MapConfig::new().with("ping.reply", "  ");
    let err = PingHandler::create(&config).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidProperty { ref name, .. } if name == "ping.reply"));
}

#[test]
fn test_ping_identity_and_description() {
    let handler = PingHandler::default();
    assert_eq!(handler.id(), "ping");
    assert_eq!(handler.description().as_deref(), Some("replies \"pong\" to \"ping\""));
}

#[test]
fn test_ping_id_follows_trigger() {
    assert_eq!(PingHandler::new("PING", "pong").id(), "ping");
    assert_eq!(PingHandler::new("Marco", "polo").id(), "ping:marco");
}

#[tokio::test]
async fn test_ping_handlers_with_distinct_triggers_coexist() {
    let router = ChatRouter::new(RouterConfig::default().with_policy(DispatchPolicy::All));
    router.register(Arc::new(PingHandler::default())).unwrap();
    router.register(Arc::new(PingHandler::new("marco", "polo"))).unwrap();
    assert_eq!(router.handler_ids(), vec!["ping", "ping:marco"]);

    let responses = router.dispatch_collect(sample_event("marco")).await;
    assert_eq!(responses, vec![ChatResponse::new("general", "polo")]);
}
