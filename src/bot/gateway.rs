//! Outbound chat transport.
//!
//! [`ChatGateway`] is the only way the dispatcher talks to users;
//! [`TelegramGateway`] implements it with teloxide.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use url::Url;

use super::ui_builder::{create_keyboard, MenuKeyboard};
use crate::errors::GatewayError;

/// How the text of a message should be interpreted by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// Sink for replies. Implementations map to a transport.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Sends a text message, optionally replacing the reply keyboard.
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<MenuKeyboard>,
        format: TextFormat,
    ) -> Result<(), GatewayError>;

    /// Sends a photo referenced by URL with a caption and a reply keyboard.
    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: &str,
        keyboard: MenuKeyboard,
    ) -> Result<(), GatewayError>;
}

/// Teloxide-based implementation of [`ChatGateway`].
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Validates a photo URL before handing it to Telegram
pub fn parse_photo_url(url: &str) -> Result<Url, GatewayError> {
    Url::parse(url).map_err(|e| GatewayError::InvalidPhotoUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<MenuKeyboard>,
        format: TextFormat,
    ) -> Result<(), GatewayError> {
        let mut request = self.bot.send_message(chat_id, text);
        if let Some(menu) = keyboard {
            request = request.reply_markup(create_keyboard(menu));
        }
        if format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        request.await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: &str,
        keyboard: MenuKeyboard,
    ) -> Result<(), GatewayError> {
        let photo = InputFile::url(parse_photo_url(url)?);
        self.bot
            .send_photo(chat_id, photo)
            .caption(caption)
            .reply_markup(create_keyboard(keyboard))
            .await?;
        Ok(())
    }
}
