//! Reply and inline keyboards in Bot API JSON shape, plus the fixed menus.
//!
//! Keyboards are plain serde structs so pending notifications can be stored
//! as JSON and tests can compare them directly.

use serde::{Deserialize, Serialize};

use crate::core::types::UserCategory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub request_contact: bool,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: false,
        }
    }

    pub fn contact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyKeyboard {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
    pub one_time_keyboard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineButton {
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
        }
    }

    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { inline_keyboard: rows }
    }

    pub fn single(button: InlineButton) -> Self {
        Self::new(vec![vec![button]])
    }
}

/// Markup attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Markup {
    Reply(ReplyKeyboard),
    Inline(InlineKeyboard),
}

impl Markup {
    /// Resizable reply keyboard from rows of labels.
    pub fn reply(rows: &[&[&str]]) -> Self {
        Self::reply_keyboard(rows, false)
    }

    /// Resizable reply keyboard that hides after one press.
    pub fn one_time(rows: &[&[&str]]) -> Self {
        Self::reply_keyboard(rows, true)
    }

    fn reply_keyboard(rows: &[&[&str]], one_time_keyboard: bool) -> Self {
        Markup::Reply(ReplyKeyboard {
            keyboard: rows
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect())
                .collect(),
            resize_keyboard: true,
            one_time_keyboard,
        })
    }

    pub fn inline(rows: Vec<Vec<InlineButton>>) -> Self {
        Markup::Inline(InlineKeyboard::new(rows))
    }

    pub fn inline_button(button: InlineButton) -> Self {
        Markup::Inline(InlineKeyboard::single(button))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Every label or button text, row by row. Handy for assertions.
    pub fn labels(&self) -> Vec<Vec<String>> {
        match self {
            Markup::Reply(keyboard) => keyboard
                .keyboard
                .iter()
                .map(|row| row.iter().map(|b| b.text.clone()).collect())
                .collect(),
            Markup::Inline(keyboard) => keyboard
                .inline_keyboard
                .iter()
                .map(|row| row.iter().map(|b| b.text.clone()).collect())
                .collect(),
        }
    }

    /// Callback payloads of an inline keyboard, flattened.
    pub fn callback_data(&self) -> Vec<String> {
        match self {
            Markup::Reply(_) => Vec::new(),
            Markup::Inline(keyboard) => keyboard
                .inline_keyboard
                .iter()
                .flatten()
                .filter_map(|b| b.callback_data.clone())
                .collect(),
        }
    }
}

/// Lays items out two per row; an odd last item sits alone.
pub fn two_per_row<T: Clone>(items: Vec<T>) -> Vec<Vec<T>> {
    items.chunks(2).map(<[T]>::to_vec).collect()
}

/// Main menu; job seekers cannot post jobs so they get no "Post Job" button.
pub fn main_menu(category: UserCategory) -> Markup {
    if category == UserCategory::JobSeeker {
        Markup::reply(&[&["💼 Manage Jobs"], &["🔔 Job Subscriptions", "⚙️ Settings"]])
    } else {
        Markup::reply(&[&["📋 Post Job", "💼 Manage Jobs"], &["🔔 Job Subscriptions", "⚙️ Settings"]])
    }
}

pub fn subscription_menu() -> Markup {
    Markup::reply(&[&["➕ Add Subscription", "📝 Edit Subscriptions"], &["🔙 Main Menu"]])
}

pub fn job_status_menu() -> Markup {
    Markup::reply(&[&["⌛ Pending", "📖 Opened"], &["📕 Closed", "🚫 Declined"], &["🔙 Main Menu"]])
}

pub fn settings_menu() -> Markup {
    Markup::reply(&[&["👥 Profile", "🗣️ Feedback"], &["🔙 Main Menu"]])
}

pub fn profile_menu() -> Markup {
    Markup::reply(&[&["🔧 Update Profile", "🔙 Main Menu"]])
}

pub fn skip_menu() -> Markup {
    Markup::reply(&[&["↖️ Skip", "🔙 Main Menu"]])
}

pub fn update_category_menu() -> Markup {
    Markup::reply(&[&["አሰሪ", "Job Seeker", "Agent"], &["↖️ Skip", "🔙 Main Menu"]])
}

pub fn back_menu() -> Markup {
    Markup::reply(&[&["🔙 Main Menu"]])
}

pub fn cancel_application_menu() -> Markup {
    Markup::reply(&[&["🔙 Cancel Application"]])
}

pub fn start_menu() -> Markup {
    Markup::one_time(&[&["🏁 Start"]])
}

pub fn registration_category_menu() -> Markup {
    Markup::one_time(&[&["አሰሪ", "Job Seeker"], &["Agent"]])
}

pub fn contact_request_menu() -> Markup {
    Markup::Reply(ReplyKeyboard {
        keyboard: vec![vec![KeyboardButton::contact("Add 📱")]],
        resize_keyboard: true,
        one_time_keyboard: false,
    })
}
