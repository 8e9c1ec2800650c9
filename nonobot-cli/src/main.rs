//! nonobot CLI: run the bot on the console or list its handlers. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use nonobot_cli::{build_router, handler_listing, load_config, run_console, Cli, Commands};
use nonobot_core::init_file_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { bot, log_file } => {
            init_file_tracing(&log_file)?;
            let config = load_config(&bot);
            run_console(&config).await
        }
        Commands::Handlers { bot } => {
            let config = load_config(&bot);
            let router = build_router(&config)?;
            for line in handler_listing(&router) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}
