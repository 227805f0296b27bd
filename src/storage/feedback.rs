//! User feedback and job-posting access tokens.

use rusqlite::{params, Connection};

use crate::core::error::AppResult;

pub fn add_feedback(conn: &Connection, user_id: &str, comment: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO feedbacks (user_id, comment) VALUES (?1, ?2)",
        params![user_id, comment],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn count_feedback(conn: &Connection, user_id: &str) -> AppResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM feedbacks WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Stores a token the web form accepts as proof that `employer_id` asked to post a job.
pub fn add_post_token(conn: &Connection, token: &str, employer_id: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO post_tokens (token, employer_id) VALUES (?1, ?2)",
        params![token, employer_id],
    )?;
    Ok(())
}

pub fn find_post_token_owner(conn: &Connection, token: &str) -> AppResult<Option<String>> {
    use rusqlite::OptionalExtension;

    let owner = conn
        .query_row(
            "SELECT employer_id FROM post_tokens WHERE token = ?1",
            params![token],
            |row| row.get(0),
        )
        .optional()?;
    Ok(owner)
}
