//! Unit tests for PatternHandler (`when` / `respond`, capture groups).

use std::sync::{Arc, Mutex};

use super::{inbound_event, sample_event};
use crate::{Mode, PatternHandler};
use nonobot_core::{ChatHandler, ConfigError, MapConfig};

fn echo() -> PatternHandler {
    PatternHandler::respond("echo", r"echo\s+(.+)", |m| m.group(1).map(str::to_string)).unwrap()
}

#[tokio::test]
async fn test_respond_matches_addressed_forms() {
    let handler = echo();
    for raw in [
        "nono echo hello world",
        "nono:echo hello world",
        "@nono echo hello world",
        "@nono:echo hello world",
    ] {
        let event = inbound_event(raw);
        assert_eq!(event.text, "echo hello world");
        let response = handler.handle(&event).await.unwrap();
        assert_eq!(response.map(|r| r.text), Some("hello world".to_string()), "raw: {}", raw);
    }
}

#[tokio::test]
async fn test_respond_ignores_unaddressed() {
    let handler = echo();
    assert_eq!(handler.mode(), Mode::Respond);
    assert!(handler.handle(&sample_event("echo hello world")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_when_matches_unaddressed_message() {
    let handler = PatternHandler::when("echo", r"echo\s+(.+)", |m| Some(m.body().to_string())).unwrap();
    let response = handler.handle(&sample_event("echo hello world")).await.unwrap();
    assert_eq!(response.map(|r| r.text), Some("echo hello world".to_string()));
}

#[tokio::test]
async fn test_when_ignores_addressed() {
    let handler = PatternHandler::when("echo", r"echo\s+(.+)", |_| Some("hit".to_string())).unwrap();
    let event = inbound_event("nono echo hello");
    assert!(event.addressed);
    assert!(handler.handle(&event).await.unwrap().is_none());
}

#[tokio::test]
async fn test_pattern_must_match_whole_text() {
    let handler = PatternHandler::when("foo", "foobar", |_| Some("hit".to_string())).unwrap();
    assert!(handler.handle(&sample_event("foobar!")).await.unwrap().is_none());
    assert!(handler.handle(&sample_event("a foobar")).await.unwrap().is_none());
    assert!(handler.handle(&sample_event("foobar")).await.unwrap().is_some());
}

#[tokio::test]
async fn test_groups() {
    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let captured = seen.clone();
    let handler = PatternHandler::when("groups", "([a-z]+) ([0-9]+)", move |m| {
        let mut guard = captured.lock().unwrap();
        for i in 0..4 {
            guard.push(m.group(i).map(str::to_string));
        }
        None
    })
    .unwrap();

    let response = handler.handle(&sample_event("hello 12345")).await.unwrap();

    assert!(response.is_none());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![None, Some("hello".to_string()), Some("12345".to_string()), None]
    );
}

#[tokio::test]
async fn test_named_groups() {
    let handler = PatternHandler::when("greet", r"hi (?P<who>\w+)", |m| {
        m.name("who").map(|who| format!("hello {}", who))
    })
    .unwrap();
    let response = handler.handle(&sample_event("hi bob")).await.unwrap();
    assert_eq!(response.map(|r| r.text), Some("hello bob".to_string()));
}

#[test]
fn test_invalid_pattern_is_config_error() {
    let err = PatternHandler::when("broken", "([a-z", |_| None).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidProperty { ref name, .. } if name == "broken.pattern"));
}

#[tokio::test]
async fn test_create_from_config() {
    let config = MapConfig::new()
        .with("greet.pattern", r"hi (?P<who>\w+)")
        .with("greet.reply", "hello $who")
        .with("greet.description", "greets whoever you name");
    let handler = PatternHandler::create(&config, "greet").unwrap();

    assert_eq!(handler.mode(), Mode::Respond);
    assert_eq!(handler.description().as_deref(), Some("greets whoever you name"));
    let response = handler.handle(&inbound_event("nono hi bob")).await.unwrap();
    assert_eq!(response.map(|r| r.text), Some("hello bob".to_string()));
    assert!(handler.handle(&sample_event("hi bob")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_when_mode_expands_numbered_groups() {
    let config = MapConfig::new()
        .with("shout.pattern", r"(\w+)!")
        .with("shout.reply", "$1 indeed")
        .with("shout.mode", "when");
    let handler = PatternHandler::create(&config, "shout").unwrap();

    let response = handler.handle(&sample_event("wow!")).await.unwrap();
    assert_eq!(response.map(|r| r.text), Some("wow indeed".to_string()));
}

#[test]
fn test_create_requires_pattern_and_reply() {
    let err = PatternHandler::create(&MapConfig::new().with("greet.reply", "hello"), "greet").unwrap_err();
    assert_eq!(err, ConfigError::MissingProperty("greet.pattern".to_string()));

    let err = PatternHandler::create(&MapConfig::new().with("greet.pattern", "hi"), "greet").unwrap_err();
    assert_eq!(err, ConfigError::MissingProperty("greet.reply".to_string()));
}

#[test]
fn test_create_rejects_unknown_mode() {
    let config = MapConfig::new()
        .with("greet.pattern", "hi")
        .with("greet.reply", "hello")
        .with("greet.mode", "sometimes");
    let err = PatternHandler::create(&config, "greet").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidProperty { ref name, .. } if name == "greet.mode"));
}
