//! Jobboard - Telegram job board bot
//!
//! Employers post jobs through a web form, an admin approves them and the bot
//! announces opened jobs on a channel and to matching subscribers. Job
//! seekers register in chat, subscribe to alerts and apply with a CV.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, domain types, validation and the HTTP server
//! - `storage`: SQLite pool, migrations and one module per entity
//! - `telegram`: Bot API access, keyboards, conversation state and handlers
//! - `push`: Durable queue of subscriber notifications and its drain worker

pub mod cli;
pub mod core;
pub mod push;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{AppError, AppResult, BotConfig};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
pub use telegram::{handle_update, HandlerDeps};
