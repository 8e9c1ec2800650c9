//! CLI parser and config loading.

use clap::{Args, Parser, Subcommand};
use nonobot_core::{EnvConfig, LayeredConfig, MapConfig};

#[derive(Parser)]
#[command(name = "nonobot")]
#[command(about = "Chat bot CLI: run on the console, list handlers", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot on stdin/stdout (config from env; flags override NONOBOT_* variables).
    Run {
        #[command(flatten)]
        bot: BotArgs,
        /// Log file; console output stays reserved for the conversation.
        #[arg(long, default_value = "logs/nonobot.log")]
        log_file: String,
    },
    /// Print the registered handlers and their descriptions.
    Handlers {
        #[command(flatten)]
        bot: BotArgs,
    },
}

/// Flags shared by every command. Each maps onto one config property.
#[derive(Args, Debug, Default, Clone)]
pub struct BotArgs {
    /// Bot name (bot.name)
    #[arg(short, long)]
    pub name: Option<String>,
    /// Comma-separated aliases (bot.aliases)
    #[arg(short, long)]
    pub aliases: Option<String>,
    /// first_match or all (router.policy)
    #[arg(short, long)]
    pub policy: Option<String>,
    /// Per-handler timeout in milliseconds, 0 disables (router.handler_timeout_ms)
    #[arg(long)]
    pub handler_timeout_ms: Option<u64>,
}

impl BotArgs {
    /// Properties set on the command line.
    pub fn overrides(&self) -> MapConfig {
        let mut config = MapConfig::new();
        if let Some(name) = &self.name {
            config = config.with("bot.name", name.as_str());
        }
        if let Some(aliases) = &self.aliases {
            config = config.with("bot.aliases", aliases.as_str());
        }
        if let Some(policy) = &self.policy {
            config = config.with("router.policy", policy.as_str());
        }
        if let Some(ms) = self.handler_timeout_ms {
            config = config.with("router.handler_timeout_ms", ms.to_string());
        }
        config
    }
}

/// Command-line flags layered over `NONOBOT_*` environment variables.
pub fn load_config(bot: &BotArgs) -> LayeredConfig<MapConfig, EnvConfig> {
    LayeredConfig::new(bot.overrides(), EnvConfig::default())
}
