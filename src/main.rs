mod config;
mod handlers;
mod platform;
mod router;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::handlers::{is_start_command, EchoHandler, StartHandler};
use crate::platform::telegram;
use crate::router::Router;

/// Build the routing table. `/start` is registered first so it wins over the
/// catch-all echo.
fn build_router(config: &Config, bot_username: Option<String>) -> Router {
    let mut router = Router::new();
    router
        .register(
            "start",
            move |msg| is_start_command(msg, bot_username.as_deref()),
            Arc::new(StartHandler::new(config.greeting.clone())),
        )
        .register(
            "echo",
            |_| true,
            Arc::new(EchoHandler::new(config.fallback_text.clone())),
        );
    router
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,echobot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    // Load configuration
    let config = match Config::load(Path::new(config::DOTENV_FILE)) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Configuration loaded: {:?}", config);

    let bot = telegram::html_bot(&config.bot_token);
    let me = bot
        .get_me()
        .await
        .context("Failed to fetch bot identity from the Telegram Bot API")?;
    let bot_username = me.user.username.clone();
    info!("Authorized as @{}", bot_username.as_deref().unwrap_or("<unknown>"));

    let router = Arc::new(build_router(&config, bot_username));
    info!("Registered {} routes", router.len());

    info!("Bot is starting...");
    telegram::run(bot, router).await?;

    Ok(())
}
