//! Chat bindings and the persisted conversation cursor.

use rusqlite::{params, Connection, OptionalExtension};

use crate::core::error::AppResult;
use crate::core::types::Client;

fn parse_client(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        user_id: row.get(0)?,
        telegram_id: row.get(1)?,
        prev_command: row.get(2)?,
    })
}

pub fn add_client(conn: &Connection, client: &Client) -> AppResult<()> {
    conn.execute(
        "INSERT INTO clients (user_id, telegram_id, prev_command) VALUES (?1, ?2, ?3)",
        params![client.user_id, client.telegram_id, client.prev_command],
    )?;
    Ok(())
}

pub fn find_client_by_telegram_id(conn: &Connection, telegram_id: i64) -> AppResult<Option<Client>> {
    let client = conn
        .query_row(
            "SELECT user_id, telegram_id, prev_command FROM clients WHERE telegram_id = ?1",
            params![telegram_id],
            parse_client,
        )
        .optional()?;
    Ok(client)
}

pub fn find_client_by_user_id(conn: &Connection, user_id: &str) -> AppResult<Option<Client>> {
    let client = conn
        .query_row(
            "SELECT user_id, telegram_id, prev_command FROM clients WHERE user_id = ?1",
            params![user_id],
            parse_client,
        )
        .optional()?;
    Ok(client)
}

/// Persists the conversation cursor of a chat.
pub fn set_prev_command(conn: &Connection, user_id: &str, prev_command: &str) -> AppResult<()> {
    conn.execute(
        "UPDATE clients SET prev_command = ?2 WHERE user_id = ?1",
        params![user_id, prev_command],
    )?;
    Ok(())
}
