//! Conversation handlers
//!
//! Every webhook update enters through [`handle_update`]. Handlers reach
//! Telegram only through the [`Messenger`](crate::telegram::api::Messenger)
//! held by [`HandlerDeps`], so the same tree runs against a recording fake
//! in the integration tests.

mod dispatch;
pub mod jobs;
pub mod profile;
pub mod registration;
pub mod subscriptions;
mod types;

pub use dispatch::handle_update;
pub use types::{register_cursor, show_main_menu, ChatContext, HandlerDeps};
