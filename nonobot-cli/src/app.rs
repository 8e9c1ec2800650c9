//! Wires the default handler set into a router and runs it on the console.

use std::sync::Arc;

use anyhow::{Context, Result};
use bot_runtime::{BotRuntime, ConsolePublisher, ConsoleSource};
use chat_router::{ChatRouter, RouterConfig};
use handlers::{HelpHandler, LoggingHandler, PatternHandler, PingHandler};
use nonobot_core::{BotIdentity, Config};
use tracing::info;

/// Builds a router with logging, ping and echo handlers, then one canned reply handler per id in
/// the comma separated `bot.replies`, then help.
pub fn build_router(config: &dyn Config) -> Result<ChatRouter> {
    let router = ChatRouter::new(RouterConfig::from_config(config).context("router config")?);

    router.register(Arc::new(LoggingHandler))?;
    router.register(Arc::new(PingHandler::create(config).context("ping handler")?))?;
    router.register(Arc::new(
        PatternHandler::respond("echo", r"echo\s+(.+)", |m| m.group(1).map(str::to_string))?
            .with_description("repeats what follows \"echo\" when addressed"),
    ))?;
    for id in reply_ids(config) {
        let handler = PatternHandler::create(config, &id).with_context(|| format!("reply handler {}", id))?;
        router.register(Arc::new(handler))?;
    }
    router.register(Arc::new(
        HelpHandler::create(config, router.registry()).context("help handler")?,
    ))?;

    Ok(router)
}

fn reply_ids(config: &dyn Config) -> Vec<String> {
    config
        .get_property("bot.replies")
        .map(|ids| {
            ids.split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Runs the bot on stdin/stdout until EOF or Ctrl-C.
pub async fn run_console(config: &dyn Config) -> Result<()> {
    let identity = BotIdentity::from_config(config);
    let router = build_router(config)?;
    let runtime = BotRuntime::new(router, Arc::new(ConsolePublisher::stdout(&identity)));

    let shutdown = runtime.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down");
            shutdown.cancel();
        }
    });

    info!(name = %identity.name, aliases = ?identity.aliases, "Bot ready on console");
    runtime.run(ConsoleSource::stdin(identity)).await
}

/// One `id - description` line per registered handler, in dispatch order.
pub fn handler_listing(router: &ChatRouter) -> Vec<String> {
    router
        .handler_descriptions()
        .into_iter()
        .map(|d| match d.description {
            Some(description) => format!("{} - {}", d.id, description),
            None => d.id,
        })
        .collect()
}
