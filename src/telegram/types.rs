//! Webhook update envelope.
//!
//! Only the fields the dispatcher reads are modelled. Every field defaults, so
//! a message update has an empty `callback_query` and vice versa.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Update {
    pub update_id: i64,
    pub message: IncomingMessage,
    pub callback_query: CallbackQuery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomingMessage {
    pub text: String,
    pub chat: Chat,
    pub from: Sender,
    pub document: Option<Document>,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub id: i64,
    pub language_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_name: String,
    pub mime_type: String,
}

impl Document {
    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackQuery {
    pub id: String,
    pub data: String,
    pub from: Sender,
}

impl Update {
    /// Telegram identity of whoever caused the update.
    pub fn sender_id(&self) -> i64 {
        if self.message.from.id != 0 {
            self.message.from.id
        } else {
            self.callback_query.from.id
        }
    }

    /// Chat replies go to; callback updates carry no message, so the presser's id is used.
    pub fn reply_chat_id(&self) -> i64 {
        if self.message.chat.id != 0 {
            self.message.chat.id
        } else {
            self.callback_query.from.id
        }
    }

    pub fn is_callback(&self) -> bool {
        !self.callback_query.id.is_empty()
    }

    pub fn contact_phone(&self) -> &str {
        self.message
            .contact
            .as_ref()
            .map(|contact| contact.phone_number.as_str())
            .unwrap_or("")
    }
}
