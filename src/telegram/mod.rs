//! Telegram bot integration and handlers

pub mod api;
pub mod bot;
pub mod handlers;
pub mod keyboards;
pub mod notifications;
pub mod state;
pub mod types;

// Re-exports for convenience
pub use api::{Delivery, Messenger, TeloxideMessenger};
pub use handlers::{handle_update, HandlerDeps};
pub use types::Update;
