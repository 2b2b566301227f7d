//! Slash commands and their registration in the Telegram command menu

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::MenuButton;
use teloxide::utils::command::BotCommands;
use tracing::info;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "KittyBot commands:")]
pub enum Command {
    /// Start the bot
    Start,
    /// Help
    Help,
    /// New cat
    #[command(rename = "newcat")]
    NewCat,
}

/// Publish the command list and show it behind the chat menu button
pub async fn setup_bot_commands(bot: &Bot) -> Result<()> {
    info!("Registering bot commands");
    bot.set_my_commands(Command::bot_commands()).await?;
    bot.set_chat_menu_button()
        .menu_button(MenuButton::Commands)
        .await?;
    Ok(())
}
