//! Outbound Bot API calls.
//!
//! Handlers talk to Telegram through the [`Messenger`] trait so the whole
//! conversation flow can run against a recording fake in tests.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, ChatFullInfo, FileId, InputFile, ParseMode, Recipient, ReplyMarkup};
use teloxide::RequestError;

use crate::telegram::keyboards::Markup;

/// Outcome of a single Bot API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Telegram answered 429; the call may be retried later
    Throttled,
    Failed(String),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends an HTML message to a chat.
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<&Markup>) -> Delivery;

    /// Re-sends an already uploaded document by its file id.
    async fn send_document(&self, chat_id: i64, file_id: &str, caption: &str, markup: Option<&Markup>) -> Delivery;

    /// Answers a callback query; an empty text just stops the button spinner.
    async fn answer_callback(&self, query_id: &str, text: &str) -> Delivery;

    /// Posts an HTML message to the configured public channel.
    async fn post_to_channel(&self, text: &str, markup: Option<&Markup>) -> Delivery;

    /// Public `@username` of a chat, without the `@`.
    async fn public_username(&self, chat_id: i64) -> Option<String>;
}

/// [`Messenger`] backed by a teloxide [`Bot`]
pub struct TeloxideMessenger {
    bot: Bot,
    channel: Recipient,
}

impl TeloxideMessenger {
    pub fn new(bot: Bot, channel: &str) -> Self {
        Self {
            bot,
            channel: channel_recipient(channel),
        }
    }
}

/// `@name` or a numeric chat id.
fn channel_recipient(channel: &str) -> Recipient {
    match channel.trim().parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(channel.trim().to_string()),
    }
}

fn to_reply_markup(markup: &Markup) -> Result<ReplyMarkup, serde_json::Error> {
    serde_json::from_value(serde_json::to_value(markup)?)
}

fn classify<T>(result: Result<T, RequestError>) -> Delivery {
    match result {
        Ok(_) => Delivery::Delivered,
        Err(RequestError::RetryAfter(seconds)) => {
            log::warn!("Bot API throttled, retry after {:?}", seconds.duration());
            Delivery::Throttled
        }
        Err(e) => {
            log::error!("Bot API request failed: {}", e);
            Delivery::Failed(e.to_string())
        }
    }
}

/// Public handle of a chat; group chats and hidden profiles have none.
fn chat_username(chat: &ChatFullInfo) -> Option<String> {
    chat.username().filter(|name| !name.is_empty()).map(str::to_string)
}

#[async_trait]
impl Messenger for TeloxideMessenger {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<&Markup>) -> Delivery {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            match to_reply_markup(markup) {
                Ok(markup) => request = request.reply_markup(markup),
                Err(e) => return Delivery::Failed(format!("invalid markup: {}", e)),
            }
        }
        classify(request.await)
    }

    async fn send_document(&self, chat_id: i64, file_id: &str, caption: &str, markup: Option<&Markup>) -> Delivery {
        let mut request = self
            .bot
            .send_document(ChatId(chat_id), InputFile::file_id(FileId(file_id.to_string())))
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            match to_reply_markup(markup) {
                Ok(markup) => request = request.reply_markup(markup),
                Err(e) => return Delivery::Failed(format!("invalid markup: {}", e)),
            }
        }
        classify(request.await)
    }

    async fn answer_callback(&self, query_id: &str, text: &str) -> Delivery {
        let mut request = self.bot.answer_callback_query(CallbackQueryId(query_id.to_string()));
        if !text.is_empty() {
            request = request.text(text);
        }
        classify(request.await)
    }

    async fn post_to_channel(&self, text: &str, markup: Option<&Markup>) -> Delivery {
        let mut request = self
            .bot
            .send_message(self.channel.clone(), text)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            match to_reply_markup(markup) {
                Ok(markup) => request = request.reply_markup(markup),
                Err(e) => return Delivery::Failed(format!("invalid markup: {}", e)),
            }
        }
        classify(request.await)
    }

    async fn public_username(&self, chat_id: i64) -> Option<String> {
        match self.bot.get_chat(ChatId(chat_id)).await {
            Ok(chat) => chat_username(&chat),
            Err(e) => {
                log::warn!("getChat {} failed: {}", chat_id, e);
                None
            }
        }
    }
}
