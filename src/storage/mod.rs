//! SQLite persistence: connection pool, migrations and one module per entity.

pub mod catalog;
pub mod clients;
pub mod db;
pub mod feedback;
pub mod jobs;
pub mod migrations;
pub mod push;
pub mod subscriptions;
pub mod users;

// Re-exports for convenience
pub use db::{create_pool, get_connection, new_id, DbConnection, DbPool};
