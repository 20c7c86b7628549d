use rusqlite::{params, Connection, OptionalExtension};

use crate::error::AppError;
use crate::models::favorite::FavoriteRecord;

pub fn favorite_exists(conn: &Connection, path: &str) -> Result<bool, AppError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM favorites WHERE path = ?1",
            params![path],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Returns `true` when a row was inserted, `false` when `path` was already present.
pub fn insert_favorite(conn: &Connection, path: &str, name: &str) -> Result<bool, AppError> {
    let count = conn.execute(
        "INSERT OR IGNORE INTO favorites (path, name) VALUES (?1, ?2)",
        params![path, name],
    )?;
    Ok(count > 0)
}

pub fn delete_favorite(conn: &Connection, path: &str) -> Result<usize, AppError> {
    let count = conn.execute("DELETE FROM favorites WHERE path = ?1", params![path])?;
    Ok(count)
}

pub fn list_favorites(conn: &Connection) -> Result<Vec<FavoriteRecord>, AppError> {
    let mut stmt =
        conn.prepare("SELECT path, name FROM favorites ORDER BY created_at DESC, id DESC")?;

    let records = stmt
        .query_map([], |row| {
            Ok(FavoriteRecord {
                path: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}
