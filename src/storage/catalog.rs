//! Attribute catalogs: job types, sectors, education levels.

use rusqlite::{params, Connection};

use crate::core::error::{AppError, AppResult};
use crate::core::types::{AttributeKind, CatalogEntry};
use crate::storage::db::new_id;

pub fn list_attributes(conn: &Connection, kind: AttributeKind) -> AppResult<Vec<CatalogEntry>> {
    let mut stmt = conn.prepare(&format!("SELECT id, name FROM {} ORDER BY rowid", kind.table()))?;
    let entries = stmt
        .query_map([], |row| Ok(CatalogEntry::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// Adds a catalog entry with a generated id. Names are unique per catalog, ignoring case.
pub fn add_attribute(conn: &Connection, kind: AttributeKind, name: &str) -> AppResult<CatalogEntry> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("job attribute name can not be empty".into()));
    }

    let existing: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE lower(name) = lower(?1)", kind.table()),
        params![name],
        |row| row.get(0),
    )?;
    if existing > 0 {
        return Err(AppError::Validation("job attribute already exist".into()));
    }

    let entry = CatalogEntry::new(new_id(kind.id_prefix()), name);
    conn.execute(
        &format!("INSERT INTO {} (id, name) VALUES (?1, ?2)", kind.table()),
        params![entry.id, entry.name],
    )?;
    Ok(entry)
}

pub fn delete_attribute(conn: &Connection, kind: AttributeKind, id: &str) -> AppResult<()> {
    let removed = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", kind.table()), params![id])?;
    if removed == 0 {
        return Err(AppError::NotFound("job attribute not found".into()));
    }
    Ok(())
}
