//! Config tests.

use crate::config::{parse_property, required_property, Config, EnvConfig, LayeredConfig, MapConfig};
use crate::error::ConfigError;
use crate::identity::BotIdentity;
use serial_test::serial;
use std::env;

#[test]
fn test_map_config_get_property() {
    let config = MapConfig::new().with("ping.reply", "pong!");
    assert_eq!(config.get_property("ping.reply").as_deref(), Some("pong!"));
    assert!(config.get_property("ping.trigger").is_none());
}

#[test]
fn test_required_property_missing() {
    let config = MapConfig::new();
    let err = required_property(&config, "help.trigger").unwrap_err();
    assert_eq!(err, ConfigError::MissingProperty("help.trigger".to_string()));
}

#[test]
fn test_parse_property_default_and_invalid() {
    let config = MapConfig::new().with("router.dedup_window", "abc");
    assert_eq!(parse_property(&config, "router.handler_timeout_ms", 5u64).unwrap(), 5);
    assert!(matches!(
        parse_property(&config, "router.dedup_window", 10usize),
        Err(ConfigError::InvalidProperty { .. })
    ));
}

#[test]
fn test_env_var_name() {
    let config = EnvConfig::default();
    assert_eq!(config.var_name("router.policy"), "NONOBOT_ROUTER_POLICY");
    assert_eq!(config.var_name("router.handler-timeout"), "NONOBOT_ROUTER_HANDLER_TIMEOUT");
    assert_eq!(EnvConfig::new("").var_name("bot.name"), "BOT_NAME");
}

#[test]
#[serial]
fn test_env_config_reads_environment() {
    env::remove_var("NONOBOT_BOT_NAME");
    let config = EnvConfig::default();
    assert!(config.get_property("bot.name").is_none());

    env::set_var("NONOBOT_BOT_NAME", "bb8");
    assert_eq!(config.get_property("bot.name").as_deref(), Some("bb8"));

    env::remove_var("NONOBOT_BOT_NAME");
}

#[test]
#[serial]
fn test_layered_config_prefers_overrides() {
    env::set_var("NONOBOT_BOT_NAME", "from_env");
    env::set_var("NONOBOT_BOT_ALIASES", "bb8, r2d2");
    let config = LayeredConfig::new(MapConfig::new().with("bot.name", "from_cli"), EnvConfig::default());

    let identity = BotIdentity::from_config(&config);
    assert_eq!(identity.name, "from_cli");
    assert_eq!(identity.aliases, vec!["bb8".to_string(), "r2d2".to_string()]);

    env::remove_var("NONOBOT_BOT_NAME");
    env::remove_var("NONOBOT_BOT_ALIASES");
}

#[test]
fn test_identity_defaults() {
    let identity = BotIdentity::from_config(&MapConfig::new());
    assert_eq!(identity.name, "nono");
    assert!(identity.aliases.is_empty());
}
