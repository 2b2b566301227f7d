//! UI Builder module for creating reply keyboards
//!
//! Button labels double as dispatch keys: a button press arrives as a plain
//! text message carrying the label.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

pub const CAT_PHOTO_BUTTON: &str = "🐱 Cat photo";
pub const TIME_BUTTON: &str = "🕒 What time is it?";
pub const IP_BUTTON: &str = "🌐 My IP";
pub const RANDOM_NUMBER_BUTTON: &str = "🎲 Random number";
pub const NEW_CAT_BUTTON: &str = "🐱 New cat";
pub const BACK_BUTTON: &str = "🔙 Back";

/// Reply keyboards the bot can attach to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKeyboard {
    /// Cat photo, time, IP and random number
    Main,
    /// New cat and back
    CatMenu,
}

impl MenuKeyboard {
    /// Button labels row by row
    pub fn rows(self) -> Vec<Vec<&'static str>> {
        match self {
            MenuKeyboard::Main => vec![
                vec![CAT_PHOTO_BUTTON, TIME_BUTTON],
                vec![IP_BUTTON, RANDOM_NUMBER_BUTTON],
            ],
            MenuKeyboard::CatMenu => vec![vec![NEW_CAT_BUTTON, BACK_BUTTON]],
        }
    }
}

/// Create the Telegram reply keyboard for a menu
pub fn create_keyboard(menu: MenuKeyboard) -> KeyboardMarkup {
    let buttons = menu
        .rows()
        .into_iter()
        .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    KeyboardMarkup::new(buttons).resize_keyboard()
}
