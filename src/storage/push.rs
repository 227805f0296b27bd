//! Persistence of undelivered subscriber notifications.

use rusqlite::{params, Connection};

use crate::core::error::AppResult;

/// A pending notification as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPush {
    pub id: i64,
    pub chat_id: i64,
    pub body: String,
    /// Inline keyboard as Bot API JSON
    pub markup: Option<String>,
}

pub fn insert_push_request(conn: &Connection, chat_id: i64, body: &str, markup: Option<&str>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO push_requests (chat_id, body, markup) VALUES (?1, ?2, ?3)",
        params![chat_id, body, markup],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_push_request(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM push_requests WHERE id = ?1", params![id])?;
    Ok(())
}

/// Pending requests in insertion order.
pub fn load_push_requests(conn: &Connection) -> AppResult<Vec<StoredPush>> {
    let mut stmt = conn.prepare("SELECT id, chat_id, body, markup FROM push_requests ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredPush {
                id: row.get(0)?,
                chat_id: row.get(1)?,
                body: row.get(2)?,
                markup: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
