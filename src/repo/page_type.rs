use rusqlite::{Connection, OptionalExtension};
use crate::models::PageType;
use anyhow::{Context, Result};

/// Page type repository
pub struct PageTypeRepo;

impl PageTypeRepo {
    pub fn get_by_handle(conn: &Connection, handle: &str) -> Result<Option<PageType>> {
        conn.query_row(
            "SELECT id, handle, name FROM page_types WHERE handle = ?1",
            [handle],
            |row| {
                Ok(PageType {
                    id: row.get(0)?,
                    handle: row.get(1)?,
                    name: row.get(2)?,
                })
            },
        )
        .optional()
        .with_context(|| format!("Failed to load page type {}", handle))
    }

    /// Get the page type with `handle`, creating it if missing
    pub fn ensure(conn: &Connection, handle: &str, name: &str) -> Result<PageType> {
        if let Some(existing) = Self::get_by_handle(conn, handle)? {
            return Ok(existing);
        }

        conn.execute(
            "INSERT INTO page_types (handle, name) VALUES (?1, ?2)",
            rusqlite::params![handle, name],
        )
        .with_context(|| format!("Failed to create page type {}", handle))?;

        Ok(PageType {
            id: conn.last_insert_rowid(),
            handle: handle.to_string(),
            name: name.to_string(),
        })
    }
}
