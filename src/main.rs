use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{error, info};

use kittybot::animal_api::{AnimalImageProvider, HttpImageFetcher};
use kittybot::bot::gateway::TelegramGateway;
use kittybot::bot::{
    command_handler, message_handler, setup_bot_commands, Command, CommandDispatcher, LuckyNumber,
};
use kittybot::config::{log_dir_from_env, BotConfig};
use kittybot::localization::LocalizationManager;
use kittybot::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    logging::init_logging(log_dir_from_env())?;

    info!("Starting KittyBot");

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };

    info!(
        cat_api = %config.cat_source.endpoint,
        dog_api = %config.dog_source.endpoint,
        timeout = ?config.cat_source.timeout,
        "Initializing bot components"
    );

    let messages = Arc::new(LocalizationManager::new()?);
    let fetcher = Arc::new(HttpImageFetcher::new(reqwest::Client::new()));
    let provider = AnimalImageProvider::new(
        fetcher,
        config.cat_source.clone(),
        config.dog_source.clone(),
        Arc::clone(&messages),
    );

    let bot = Bot::new(config.token.clone());
    let gateway = Arc::new(TelegramGateway::new(bot.clone()));
    let dispatcher = Arc::new(CommandDispatcher::new(
        provider,
        gateway,
        messages,
        LuckyNumber::from_entropy(),
    ));

    if let Err(e) = setup_bot_commands(&bot).await {
        error!(error = %e, "Failed to register bot commands");
        return Err(e);
    }

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(dptree::endpoint(message_handler));

    info!("Bot ready, starting dispatcher");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
