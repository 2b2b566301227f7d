//! # Error Types Module
//!
//! Typed errors for startup configuration and outbound chat delivery.
//! Image fetch failures are not errors here: they travel as
//! [`FetchResult::Failure`](crate::animal_api::FetchResult) values.

use thiserror::Error;

/// Startup configuration errors. Any of these stops the process.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("bot token not found: set {0}")]
    MissingToken(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Failures reported by a [`ChatGateway`](crate::bot::gateway::ChatGateway)
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("invalid photo URL {url}: {reason}")]
    InvalidPhotoUrl { url: String, reason: String },
}

/// Errors surfaced by the command dispatcher to the update loop
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to deliver reply to chat {chat_id}: {source}")]
    Delivery {
        chat_id: i64,
        #[source]
        source: GatewayError,
    },
}
