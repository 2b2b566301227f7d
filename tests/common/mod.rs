//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kittybot::animal_api::{FetchResult, ImageFetcher};
use kittybot::bot::gateway::{ChatGateway, TextFormat};
use kittybot::bot::ui_builder::MenuKeyboard;
use kittybot::config::ImageSource;
use kittybot::errors::GatewayError;
use kittybot::localization::LocalizationManager;
use teloxide::types::ChatId;

pub fn messages() -> Arc<LocalizationManager> {
    Arc::new(LocalizationManager::new().expect("Failed to create localization manager"))
}

pub fn ok(url: &str) -> FetchResult {
    FetchResult::Success(url.to_string())
}

pub fn failed() -> FetchResult {
    FetchResult::Failure("unavailable".to_string())
}

/// Fetcher answering from a fixed table keyed by source label
pub struct ScriptedFetcher {
    responses: HashMap<String, FetchResult>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new(cat: FetchResult, dog: FetchResult) -> Self {
        let mut responses = HashMap::new();
        responses.insert("cat".to_string(), cat);
        responses.insert("dog".to_string(), dog);
        Self {
            responses,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for ScriptedFetcher {
    async fn fetch(&self, source: &ImageSource) -> FetchResult {
        self.calls.lock().unwrap().push(source.label.clone());
        self.responses
            .get(&source.label)
            .cloned()
            .unwrap_or_else(|| FetchResult::Failure("unscripted source".to_string()))
    }
}

/// A message the recording gateway was asked to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: Option<MenuKeyboard>,
        format: TextFormat,
    },
    Photo {
        chat_id: ChatId,
        url: String,
        caption: String,
        keyboard: MenuKeyboard,
    },
}

/// Gateway that records every send and can be told to reject photos or texts
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<Sent>>,
    photo_attempts: Mutex<usize>,
    reject_photos: bool,
    reject_texts: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_photos() -> Self {
        Self {
            reject_photos: true,
            ..Self::default()
        }
    }

    pub fn rejecting_texts() -> Self {
        Self {
            reject_texts: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn photo_attempts(&self) -> usize {
        *self.photo_attempts.lock().unwrap()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<MenuKeyboard>,
        format: TextFormat,
    ) -> Result<(), GatewayError> {
        if self.reject_texts {
            return Err(GatewayError::Telegram(teloxide::RequestError::Api(
                teloxide::ApiError::ChatNotFound,
            )));
        }
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard,
            format,
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: &str,
        keyboard: MenuKeyboard,
    ) -> Result<(), GatewayError> {
        *self.photo_attempts.lock().unwrap() += 1;
        if self.reject_photos {
            return Err(GatewayError::InvalidPhotoUrl {
                url: url.to_string(),
                reason: "wrong file identifier".to_string(),
            });
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            url: url.to_string(),
            caption: caption.to_string(),
            keyboard,
        });
        Ok(())
    }
}

/// Endpoint that accepts connections and never answers
pub async fn silent_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}/v1/images/search")
}

/// HTTP fetcher that talks to local mock servers directly, ignoring proxy settings
pub fn local_fetcher() -> kittybot::animal_api::HttpImageFetcher {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build HTTP client");
    kittybot::animal_api::HttpImageFetcher::new(client)
}
