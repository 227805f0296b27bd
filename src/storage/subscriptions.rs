//! Job alert subscriptions, drafts included.

use rusqlite::{params, Connection, OptionalExtension};

use crate::core::error::AppResult;
use crate::core::types::{Preference, Subscription};

fn parse_subscription(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subscription> {
    let job_type: String = row.get(3)?;
    let education_level: String = row.get(4)?;
    let experience: String = row.get(5)?;
    Ok(Subscription {
        id: row.get(0)?,
        user_id: row.get(1)?,
        sector: row.get(2)?,
        job_type: Preference::from_stored(&job_type),
        education_level: Preference::from_stored(&education_level),
        experience: Preference::from_stored(&experience),
    })
}

pub fn add_subscription(conn: &Connection, subscription: &Subscription) -> AppResult<()> {
    conn.execute(
        "INSERT INTO subscriptions (id, user_id, sector, job_type, education_level, experience)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            subscription.id,
            subscription.user_id,
            subscription.sector,
            subscription.job_type.as_stored(),
            subscription.education_level.as_stored(),
            subscription.experience.as_stored()
        ],
    )?;
    Ok(())
}

pub fn find_subscription(conn: &Connection, id: &str) -> AppResult<Option<Subscription>> {
    let subscription = conn
        .query_row(
            "SELECT id, user_id, sector, job_type, education_level, experience FROM subscriptions WHERE id = ?1",
            params![id],
            parse_subscription,
        )
        .optional()?;
    Ok(subscription)
}

pub fn find_subscriptions_by_user(conn: &Connection, user_id: &str) -> AppResult<Vec<Subscription>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, sector, job_type, education_level, experience
         FROM subscriptions WHERE user_id = ?1 ORDER BY created_at, rowid",
    )?;
    let subscriptions = stmt
        .query_map(params![user_id], parse_subscription)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(subscriptions)
}

/// Subscriptions pinned to any of the given sectors, in creation order.
pub fn find_subscriptions_in_sectors(conn: &Connection, sectors: &[String]) -> AppResult<Vec<Subscription>> {
    if sectors.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; sectors.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT id, user_id, sector, job_type, education_level, experience
         FROM subscriptions WHERE sector IN ({}) ORDER BY created_at, rowid",
        placeholders
    ))?;
    let subscriptions = stmt
        .query_map(rusqlite::params_from_iter(sectors.iter()), parse_subscription)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(subscriptions)
}

pub fn update_subscription(conn: &Connection, subscription: &Subscription) -> AppResult<()> {
    conn.execute(
        "UPDATE subscriptions SET sector = ?2, job_type = ?3, education_level = ?4, experience = ?5 WHERE id = ?1",
        params![
            subscription.id,
            subscription.sector,
            subscription.job_type.as_stored(),
            subscription.education_level.as_stored(),
            subscription.experience.as_stored()
        ],
    )?;
    Ok(())
}

/// Deletes a subscription and returns what was removed.
pub fn delete_subscription(conn: &Connection, id: &str) -> AppResult<Option<Subscription>> {
    let existing = find_subscription(conn, id)?;
    if existing.is_some() {
        conn.execute("DELETE FROM subscriptions WHERE id = ?1", params![id])?;
    }
    Ok(existing)
}
