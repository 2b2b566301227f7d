//! Message Handler module: classifies inbound events and sends the replies

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

use super::commands::Command;
use super::gateway::{ChatGateway, TextFormat};
use super::ui_builder::{
    MenuKeyboard, BACK_BUTTON, CAT_PHOTO_BUTTON, IP_BUTTON, RANDOM_NUMBER_BUTTON, TIME_BUTTON,
};
use crate::animal_api::AnimalImageProvider;
use crate::errors::{DispatchError, GatewayError};
use crate::localization::LocalizationManager;

/// Substring that turns any text message into a cat request
pub const CAT_KEYWORD: &str = "cat";

/// Name used in the greeting when Telegram gives us none
const FALLBACK_DISPLAY_NAME: &str = "friend";

/// An inbound event the dispatcher reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Start { display_name: String },
    Help,
    NewCat,
    Text(String),
}

/// What a plain text message asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextIntent {
    CatPhoto,
    Time,
    Ip,
    RandomNumber,
    Back,
    Ignored,
}

/// Classify a text message. Rules are checked in order and the first match wins.
///
/// Anything starting with `/` is an unknown command and is never classified.
pub fn classify_text(text: &str) -> TextIntent {
    if text.starts_with('/') {
        TextIntent::Ignored
    } else if text.to_lowercase().contains(CAT_KEYWORD) || text == CAT_PHOTO_BUTTON {
        TextIntent::CatPhoto
    } else if text == TIME_BUTTON {
        TextIntent::Time
    } else if text == IP_BUTTON {
        TextIntent::Ip
    } else if text == RANDOM_NUMBER_BUTTON {
        TextIntent::RandomNumber
    } else if text == BACK_BUTTON {
        TextIntent::Back
    } else {
        TextIntent::Ignored
    }
}

/// The number behind the "random number" button.
///
/// Deliberately not random per request: the value is a hash of the button
/// label salted with a seed drawn once per process, so every press during one
/// run gets the same number and a restart picks a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckyNumber {
    seed: u64,
}

impl LuckyNumber {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Draw the per-process seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Value in `0..100` for the given label
    pub fn for_label(&self, label: &str) -> u8 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        label.hash(&mut hasher);
        (hasher.finish() % 100) as u8
    }
}

/// Routes inbound events to replies.
///
/// Holds no per-chat state; one instance serves every update concurrently.
pub struct CommandDispatcher {
    provider: AnimalImageProvider,
    gateway: Arc<dyn ChatGateway>,
    messages: Arc<LocalizationManager>,
    lucky_number: LuckyNumber,
}

impl CommandDispatcher {
    pub fn new(
        provider: AnimalImageProvider,
        gateway: Arc<dyn ChatGateway>,
        messages: Arc<LocalizationManager>,
        lucky_number: LuckyNumber,
    ) -> Self {
        Self {
            provider,
            gateway,
            messages,
            lucky_number,
        }
    }

    /// Handle one inbound event for `chat_id`
    pub async fn handle(&self, incoming: Incoming, chat_id: ChatId) -> Result<(), DispatchError> {
        match incoming {
            Incoming::Start { display_name } => {
                self.handle_start(&display_name, chat_id).await.map_err(|e| {
                    error!(chat_id = %chat_id, error = %e, "Failed to handle /start");
                    e
                })
            }
            Incoming::Help => self.handle_help(chat_id).await,
            Incoming::NewCat => self.send_random_animal(chat_id).await,
            Incoming::Text(text) => self.handle_text(&text, chat_id).await,
        }
    }

    async fn handle_start(&self, display_name: &str, chat_id: ChatId) -> Result<(), DispatchError> {
        info!(chat_id = %chat_id, name = %display_name, "Handling /start");
        let greeting = self
            .messages
            .get_message_with_args("welcome", &[("name", display_name)]);
        self.send_text(chat_id, &greeting, Some(MenuKeyboard::Main), TextFormat::Plain)
            .await
    }

    async fn handle_help(&self, chat_id: ChatId) -> Result<(), DispatchError> {
        debug!(chat_id = %chat_id, "Handling /help");
        let help = self.messages.t("help-text");
        self.send_text(chat_id, &help, None, TextFormat::Html).await
    }

    async fn handle_text(&self, text: &str, chat_id: ChatId) -> Result<(), DispatchError> {
        let intent = classify_text(text);
        debug!(chat_id = %chat_id, intent = ?intent, "Classified text message");

        let reply = match intent {
            TextIntent::CatPhoto => return self.send_random_animal(chat_id).await,
            TextIntent::Time => self.messages.t("time-joke"),
            TextIntent::Ip => self.messages.t("ip-placeholder"),
            TextIntent::RandomNumber => {
                let number = self.lucky_number.for_label(text).to_string();
                self.messages
                    .get_message_with_args("lucky-number", &[("number", number.as_str())])
            }
            TextIntent::Back => self.messages.t("back-to-menu"),
            TextIntent::Ignored => return Ok(()),
        };

        self.send_text(chat_id, &reply, Some(MenuKeyboard::Main), TextFormat::Plain)
            .await
    }

    /// Shared by `/newcat` and the cat text/button path
    async fn send_random_animal(&self, chat_id: ChatId) -> Result<(), DispatchError> {
        info!(chat_id = %chat_id, "Requesting animal image");
        let reply = self.provider.get_random_image().await;

        let Some(url) = reply.image_url else {
            warn!(chat_id = %chat_id, "No animal image available");
            return self
                .send_text(chat_id, &reply.caption, Some(MenuKeyboard::Main), TextFormat::Plain)
                .await;
        };

        match self
            .gateway
            .send_photo(chat_id, &url, &reply.caption, MenuKeyboard::CatMenu)
            .await
        {
            Ok(()) => {
                info!(chat_id = %chat_id, "Animal image sent");
                Ok(())
            }
            Err(e) => {
                error!(chat_id = %chat_id, url = %url, error = %e, "Failed to send photo");
                let notice = self.messages.t("photo-delivery-failed");
                self.send_text(chat_id, &notice, Some(MenuKeyboard::Main), TextFormat::Plain)
                    .await
            }
        }
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<MenuKeyboard>,
        format: TextFormat,
    ) -> Result<(), DispatchError> {
        self.gateway
            .send_text(chat_id, text, keyboard, format)
            .await
            .map_err(|source| delivery_error(chat_id, source))
    }
}

fn delivery_error(chat_id: ChatId, source: GatewayError) -> DispatchError {
    DispatchError::Delivery {
        chat_id: chat_id.0,
        source,
    }
}

/// Name to greet: the chat's first name, then the sender's, then a default
pub fn display_name(msg: &Message) -> String {
    msg.chat
        .first_name()
        .map(str::to_string)
        .or_else(|| msg.from.as_ref().map(|user| user.first_name.clone()))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string())
}

/// Teloxide endpoint for `/start`, `/help` and `/newcat`
pub async fn command_handler(
    msg: Message,
    cmd: Command,
    dispatcher: Arc<CommandDispatcher>,
) -> Result<()> {
    let incoming = match cmd {
        Command::Start => Incoming::Start {
            display_name: display_name(&msg),
        },
        Command::Help => Incoming::Help,
        Command::NewCat => Incoming::NewCat,
    };
    dispatcher.handle(incoming, msg.chat.id).await?;
    Ok(())
}

/// Teloxide endpoint for every other text message and button press
pub async fn message_handler(msg: Message, dispatcher: Arc<CommandDispatcher>) -> Result<()> {
    if let Some(text) = msg.text() {
        debug!(chat_id = %msg.chat.id, message_length = text.len(), "Received text message");
        dispatcher
            .handle(Incoming::Text(text.to_string()), msg.chat.id)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_buttons() {
        assert_eq!(classify_text(CAT_PHOTO_BUTTON), TextIntent::CatPhoto);
        assert_eq!(classify_text(TIME_BUTTON), TextIntent::Time);
        assert_eq!(classify_text(IP_BUTTON), TextIntent::Ip);
        assert_eq!(classify_text(RANDOM_NUMBER_BUTTON), TextIntent::RandomNumber);
        assert_eq!(classify_text(BACK_BUTTON), TextIntent::Back);
    }

    #[test]
    fn test_cat_keyword_is_case_insensitive_substring() {
        assert_eq!(classify_text("show me a CAT please"), TextIntent::CatPhoto);
        assert_eq!(classify_text("Cats!"), TextIntent::CatPhoto);
        assert_eq!(classify_text(crate::bot::ui_builder::NEW_CAT_BUTTON), TextIntent::CatPhoto);
    }

    #[test]
    fn test_unknown_text_is_ignored() {
        assert_eq!(classify_text("hello"), TextIntent::Ignored);
        assert_eq!(classify_text(""), TextIntent::Ignored);
        // Labels only match exactly
        assert_eq!(classify_text("🌐 My IP address"), TextIntent::Ignored);
    }

    #[test]
    fn test_unknown_commands_are_ignored() {
        assert_eq!(classify_text("/catnip"), TextIntent::Ignored);
        assert_eq!(classify_text("/CAT"), TextIntent::Ignored);
        // Only a leading slash marks a command
        assert_eq!(classify_text("cat/dog"), TextIntent::CatPhoto);
    }

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).expect("valid message json")
    }

    #[test]
    fn test_display_name_prefers_chat_first_name() {
        let msg = message(serde_json::json!({
            "message_id": 1,
            "date": 1706529600,
            "chat": {"id": 1, "type": "private", "first_name": "Ann"},
            "from": {"id": 2, "is_bot": false, "first_name": "Bob"},
            "text": "/start"
        }));
        assert_eq!(display_name(&msg), "Ann");
    }

    #[test]
    fn test_display_name_falls_back_to_sender() {
        let msg = message(serde_json::json!({
            "message_id": 1,
            "date": 1706529600,
            "chat": {"id": -100, "type": "group", "title": "Cat lovers"},
            "from": {"id": 2, "is_bot": false, "first_name": "Bob"},
            "text": "/start"
        }));
        assert_eq!(display_name(&msg), "Bob");
    }

    #[test]
    fn test_display_name_defaults_without_any_name() {
        let msg = message(serde_json::json!({
            "message_id": 1,
            "date": 1706529600,
            "chat": {"id": -1001, "type": "channel", "title": "Cats"},
            "text": "/start"
        }));
        assert_eq!(display_name(&msg), FALLBACK_DISPLAY_NAME);
    }

    #[test]
    fn test_lucky_number_is_stable_per_seed() {
        let lucky = LuckyNumber::new(7);
        let first = lucky.for_label(RANDOM_NUMBER_BUTTON);
        assert!(first < 100);
        assert_eq!(first, lucky.for_label(RANDOM_NUMBER_BUTTON));
        assert_eq!(first, LuckyNumber::new(7).for_label(RANDOM_NUMBER_BUTTON));
    }
}
