//! Builders for webhook updates
//!
//! Private chats share the sender's id, so every builder uses `from` for both.

#![allow(dead_code)]

use jobboard::telegram::types::{CallbackQuery, Chat, Contact, Document, IncomingMessage, Sender, Update};

fn message(from: i64) -> IncomingMessage {
    IncomingMessage {
        chat: Chat { id: from },
        from: Sender {
            id: from,
            language_code: "en".to_string(),
        },
        ..IncomingMessage::default()
    }
}

pub fn text_update(from: i64, text: &str) -> Update {
    Update {
        update_id: 1,
        message: IncomingMessage {
            text: text.to_string(),
            ..message(from)
        },
        ..Update::default()
    }
}

pub fn contact_update(from: i64, phone: &str) -> Update {
    Update {
        update_id: 1,
        message: IncomingMessage {
            contact: Some(Contact {
                phone_number: phone.to_string(),
                first_name: "Test".to_string(),
                last_name: String::new(),
            }),
            ..message(from)
        },
        ..Update::default()
    }
}

pub fn document_update(from: i64, file_id: &str, mime_type: &str) -> Update {
    Update {
        update_id: 1,
        message: IncomingMessage {
            document: Some(Document {
                file_id: file_id.to_string(),
                file_unique_id: format!("unique-{}", file_id),
                file_name: "cv.pdf".to_string(),
                mime_type: mime_type.to_string(),
            }),
            ..message(from)
        },
        ..Update::default()
    }
}

pub fn callback_update(from: i64, data: &str) -> Update {
    Update {
        update_id: 1,
        callback_query: CallbackQuery {
            id: format!("query-{}", from),
            data: data.to_string(),
            from: Sender {
                id: from,
                language_code: "en".to_string(),
            },
        },
        ..Update::default()
    }
}
