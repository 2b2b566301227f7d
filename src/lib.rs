//! # KittyBot
//!
//! A Telegram bot that answers menu buttons with small jokes and sends
//! random cat pictures, falling back to dogs when the cat API is down.

pub mod animal_api;
pub mod bot;
pub mod config;
pub mod errors;
pub mod localization;
pub mod logging;
