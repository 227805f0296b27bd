//! Handler dependencies and the per-update chat context

use std::sync::Arc;

use crate::core::config::BotConfig;
use crate::core::error::AppResult;
use crate::core::types::{Client, User};
use crate::push::PushQueue;
use crate::storage::{clients, get_connection, DbConnection, DbPool};
use crate::telegram::api::{Delivery, Messenger};
use crate::telegram::keyboards::{self, Markup};
use crate::telegram::state::Cursor;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
    pub messenger: Arc<dyn Messenger>,
    pub push_queue: Arc<PushQueue>,
    pub config: Arc<BotConfig>,
}

impl HandlerDeps {
    pub fn new(
        db_pool: Arc<DbPool>,
        messenger: Arc<dyn Messenger>,
        push_queue: Arc<PushQueue>,
        config: Arc<BotConfig>,
    ) -> Self {
        Self {
            db_pool,
            messenger,
            push_queue,
            config,
        }
    }

    pub fn connection(&self) -> AppResult<DbConnection> {
        Ok(get_connection(&self.db_pool)?)
    }

    /// Sends an HTML reply. Failures are already logged by the messenger.
    pub async fn reply(&self, chat_id: i64, text: &str) -> Delivery {
        self.messenger.send_text(chat_id, text, None).await
    }

    pub async fn reply_with(&self, chat_id: i64, text: &str, markup: &Markup) -> Delivery {
        self.messenger.send_text(chat_id, text, Some(markup)).await
    }
}

/// Who sent the update and where to answer
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub chat_id: i64,
    pub user: User,
    pub client: Client,
}

impl ChatContext {
    pub fn cursor(&self) -> Cursor {
        Cursor::from_label(&self.client.prev_command)
    }
}

/// Shows the category dependent main menu.
pub async fn show_main_menu(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply_with(ctx.chat_id, "Select option", &keyboards::main_menu(ctx.user.category))
        .await;
}

/// Stores the chat's cursor. Not transactional with the messages already sent.
pub fn register_cursor(deps: &HandlerDeps, ctx: &mut ChatContext, cursor: &Cursor) {
    let label = cursor.label();
    let result = deps
        .connection()
        .and_then(|conn| clients::set_prev_command(&conn, &ctx.user.id, &label));
    match result {
        Ok(()) => ctx.client.prev_command = label,
        Err(e) => log::error!("Failed to store cursor '{}' for user {}: {}", label, ctx.user.id, e),
    }
}
