//! Bot module for handling Telegram interactions
//!
//! - `commands`: slash commands and command menu registration
//! - `gateway`: outbound transport seam and its teloxide implementation
//! - `message_handler`: classification and the command dispatcher
//! - `ui_builder`: reply keyboards and button labels

pub mod commands;
pub mod gateway;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use commands::{setup_bot_commands, Command};
pub use message_handler::{command_handler, message_handler, CommandDispatcher, LuckyNumber};
