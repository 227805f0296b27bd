//! Messenger fake that records every outbound Bot API call
//!
//! Deliveries succeed unless a chat was scripted to be throttled, which
//! lets the push tests reproduce 429 answers deterministically.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use jobboard::telegram::api::{Delivery, Messenger};
use jobboard::telegram::keyboards::Markup;

/// One recorded Bot API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Text {
        chat_id: i64,
        text: String,
        markup: Option<Markup>,
    },
    Document {
        chat_id: i64,
        file_id: String,
        caption: String,
        markup: Option<Markup>,
    },
    Callback {
        query_id: String,
        text: String,
    },
    Channel {
        text: String,
        markup: Option<Markup>,
    },
}

#[derive(Default)]
struct Script {
    /// Remaining throttled answers per chat
    throttles: HashMap<i64, usize>,
    usernames: HashMap<i64, String>,
    failing_documents: bool,
}

#[derive(Default)]
pub struct RecordingMessenger {
    calls: Mutex<Vec<ApiCall>>,
    script: Mutex<Script>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `times` sends to `chat_id` answer as throttled.
    pub fn throttle(&self, chat_id: i64, times: usize) {
        self.script.lock().unwrap().throttles.insert(chat_id, times);
    }

    pub fn set_username(&self, chat_id: i64, username: &str) {
        self.script.lock().unwrap().usernames.insert(chat_id, username.to_string());
    }

    pub fn fail_documents(&self) {
        self.script.lock().unwrap().failing_documents = true;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Texts sent to a chat, in order.
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Text { chat_id: to, text, .. } if to == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Markup attached to the last text sent to a chat.
    pub fn last_markup_to(&self, chat_id: i64) -> Option<Markup> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ApiCall::Text { chat_id: to, markup, .. } if to == chat_id => Some(markup),
            _ => None,
        })?
    }

    pub fn channel_posts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Channel { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn callback_answers(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Callback { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn documents_to(&self, chat_id: i64) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, ApiCall::Document { chat_id: to, .. } if *to == chat_id))
            .collect()
    }

    fn take_throttle(&self, chat_id: i64) -> bool {
        let mut script = self.script.lock().unwrap();
        match script.throttles.get_mut(&chat_id) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<&Markup>) -> Delivery {
        if self.take_throttle(chat_id) {
            return Delivery::Throttled;
        }
        self.calls.lock().unwrap().push(ApiCall::Text {
            chat_id,
            text: text.to_string(),
            markup: markup.cloned(),
        });
        Delivery::Delivered
    }

    async fn send_document(&self, chat_id: i64, file_id: &str, caption: &str, markup: Option<&Markup>) -> Delivery {
        if self.script.lock().unwrap().failing_documents {
            return Delivery::Failed("Bad Request: wrong file identifier".to_string());
        }
        self.calls.lock().unwrap().push(ApiCall::Document {
            chat_id,
            file_id: file_id.to_string(),
            caption: caption.to_string(),
            markup: markup.cloned(),
        });
        Delivery::Delivered
    }

    async fn answer_callback(&self, query_id: &str, text: &str) -> Delivery {
        self.calls.lock().unwrap().push(ApiCall::Callback {
            query_id: query_id.to_string(),
            text: text.to_string(),
        });
        Delivery::Delivered
    }

    async fn post_to_channel(&self, text: &str, markup: Option<&Markup>) -> Delivery {
        self.calls.lock().unwrap().push(ApiCall::Channel {
            text: text.to_string(),
            markup: markup.cloned(),
        });
        Delivery::Delivered
    }

    async fn public_username(&self, chat_id: i64) -> Option<String> {
        self.script.lock().unwrap().usernames.get(&chat_id).cloned()
    }
}
