//! Registered users and half-finished registrations.

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::core::error::AppResult;
use crate::core::types::{RegistrationStage, TempUser, User};

fn parse_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let category: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        user_name: row.get(1)?,
        phone_number: row.get(2)?,
        category: category
            .parse()
            .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?,
    })
}

fn parse_temp_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<TempUser> {
    Ok(TempUser {
        telegram_id: row.get(0)?,
        user_name: row.get(1)?,
        phone_number: row.get(2)?,
        category: row.get(3)?,
        stage: RegistrationStage::from_i64(row.get(4)?),
    })
}

pub fn add_user(conn: &Connection, user: &User) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (id, user_name, phone_number, category) VALUES (?1, ?2, ?3, ?4)",
        params![user.id, user.user_name, user.phone_number, user.category.as_str()],
    )?;
    Ok(())
}

pub fn find_user(conn: &Connection, id: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, user_name, phone_number, category FROM users WHERE id = ?1",
            params![id],
            parse_user,
        )
        .optional()?;
    Ok(user)
}

pub fn update_user(conn: &Connection, user: &User) -> AppResult<()> {
    conn.execute(
        "UPDATE users SET user_name = ?2, phone_number = ?3, category = ?4 WHERE id = ?1",
        params![user.id, user.user_name, user.phone_number, user.category.as_str()],
    )?;
    Ok(())
}

pub fn delete_user(conn: &Connection, id: &str) -> AppResult<()> {
    conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(())
}

/// Whether a phone number is already taken by a user or a pending registration.
///
/// `owner` is excluded: either the user id or the registrant's telegram id
/// doing the check, so re-saving one's own number is allowed.
pub fn phone_in_use(conn: &Connection, phone: &str, owner: PhoneOwner<'_>) -> AppResult<bool> {
    let (user_id, telegram_id) = match owner {
        PhoneOwner::User(id) => (id, 0),
        PhoneOwner::Registrant(telegram_id) => ("", telegram_id),
    };
    let count: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM users WHERE phone_number = ?1 AND id != ?2)
              + (SELECT COUNT(*) FROM temp_users WHERE phone_number = ?1 AND telegram_id != ?3)",
        params![phone, user_id, telegram_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Whose phone number is being checked in [`phone_in_use`]
#[derive(Debug, Clone, Copy)]
pub enum PhoneOwner<'a> {
    User(&'a str),
    Registrant(i64),
}

pub fn add_temp_user(conn: &Connection, telegram_id: i64) -> AppResult<TempUser> {
    conn.execute(
        "INSERT INTO temp_users (telegram_id, stage) VALUES (?1, ?2)",
        params![telegram_id, RegistrationStage::Init.as_i64()],
    )?;
    Ok(TempUser {
        telegram_id,
        ..TempUser::default()
    })
}

pub fn find_temp_user(conn: &Connection, telegram_id: i64) -> AppResult<Option<TempUser>> {
    let temp_user = conn
        .query_row(
            "SELECT telegram_id, user_name, phone_number, category, stage FROM temp_users WHERE telegram_id = ?1",
            params![telegram_id],
            parse_temp_user,
        )
        .optional()?;
    Ok(temp_user)
}

pub fn update_temp_user(conn: &Connection, temp_user: &TempUser) -> AppResult<()> {
    conn.execute(
        "UPDATE temp_users SET user_name = ?2, phone_number = ?3, category = ?4, stage = ?5 WHERE telegram_id = ?1",
        params![
            temp_user.telegram_id,
            temp_user.user_name,
            temp_user.phone_number,
            temp_user.category,
            temp_user.stage.as_i64()
        ],
    )?;
    Ok(())
}

pub fn delete_temp_user(conn: &Connection, telegram_id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM temp_users WHERE telegram_id = ?1", params![telegram_id])?;
    Ok(())
}
