use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::ListingError;
use crate::models::{Page, PageVersion, VersionToRetrieve};
use anyhow::{Context, Result};

/// Columns selected for a page joined with its page type (`pt`) and resolved
/// version (`cv`). Mapped by [`page_from_row`].
pub(crate) const PAGE_COLUMNS: &str =
    "p.id, p.parent_id, p.path, p.page_type_id, pt.handle, p.is_system, p.is_active, \
     p.display_order, p.created_ts, cv.id, cv.name, cv.is_approved, cv.created_ts";

/// Number of columns in [`PAGE_COLUMNS`]
pub(crate) const PAGE_COLUMN_COUNT: usize = 13;

/// Join condition selecting the version a listing resolves for page `p`
pub(crate) fn version_condition(version: VersionToRetrieve) -> &'static str {
    match version {
        VersionToRetrieve::Active => {
            "cv.page_id = p.id AND cv.id = (SELECT MAX(v.id) FROM page_versions v \
             WHERE v.page_id = p.id AND v.is_approved = 1)"
        }
        VersionToRetrieve::Recent => {
            "cv.page_id = p.id AND cv.id = (SELECT MAX(v.id) FROM page_versions v \
             WHERE v.page_id = p.id)"
        }
    }
}

/// Map the [`PAGE_COLUMNS`] of a row to a page
pub(crate) fn page_from_row(row: &Row) -> rusqlite::Result<Page> {
    let version_id: Option<i64> = row.get(9)?;
    let version = match version_id {
        Some(id) => Some(PageVersion {
            id,
            name: row.get(10)?,
            is_approved: row.get(11)?,
            created_ts: row.get(12)?,
        }),
        None => None,
    };

    Ok(Page {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        path: row.get(2)?,
        page_type_id: row.get(3)?,
        page_type_handle: row.get(4)?,
        is_system: row.get(5)?,
        is_active: row.get(6)?,
        display_order: row.get(7)?,
        created_ts: row.get(8)?,
        version,
    })
}

/// Turn a display name into a path segment
pub fn path_segment(name: &str) -> String {
    let segment: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' { '-' } else { c })
        .collect();
    if segment.is_empty() {
        "page".to_string()
    } else {
        segment
    }
}

/// Fields of a page to insert
#[derive(Debug, Clone)]
pub struct NewPage<'a> {
    pub name: &'a str,
    pub parent: Option<&'a Page>,
    pub page_type_id: Option<i64>,
    pub is_system: bool,
    pub approved: bool,
}

/// Page repository for database operations
pub struct PageRepo;

impl PageRepo {
    /// Create a page with its first version.
    ///
    /// The path is the parent's path plus a segment derived from the name,
    /// suffixed with `-2`, `-3`, ... when a sibling already uses it.
    pub fn create(conn: &Connection, new_page: &NewPage) -> Result<Page> {
        let parent_path = new_page
            .parent
            .and_then(|p| p.path.as_deref())
            .unwrap_or("");
        let base_path = format!("{}/{}", parent_path, path_segment(new_page.name));
        Self::create_at_path(conn, new_page, &base_path)
    }

    /// Create a page at an explicit path (made unique if taken)
    pub fn create_at_path(conn: &Connection, new_page: &NewPage, base_path: &str) -> Result<Page> {
        let path = Self::unique_path(conn, base_path)?;
        let now = chrono::Utc::now().timestamp();
        let display_order: i64 = match new_page.parent {
            Some(parent) => conn.query_row(
                "SELECT COUNT(*) FROM pages WHERE parent_id = ?1",
                [parent.id],
                |row| row.get(0),
            )?,
            None => 0,
        };

        conn.execute(
            "INSERT INTO pages (parent_id, path, page_type_id, is_system, is_active, display_order, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?7)",
            rusqlite::params![
                new_page.parent.map(|p| p.id),
                path,
                new_page.page_type_id,
                new_page.is_system,
                display_order,
                now,
                now
            ],
        )
        .with_context(|| format!("Failed to create page: {}", new_page.name))?;
        let id = conn.last_insert_rowid();

        Self::add_version(conn, id, new_page.name, new_page.approved)?;

        Self::get_by_id(conn, id, VersionToRetrieve::Recent)?
            .ok_or_else(|| anyhow::anyhow!("Page {} vanished after insert", id))
    }

    fn unique_path(conn: &Connection, base_path: &str) -> Result<String> {
        let mut candidate = base_path.to_string();
        let mut suffix = 2;
        loop {
            let taken: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM pages WHERE path = ?1)",
                [&candidate],
                |row| row.get(0),
            )?;
            if !taken {
                return Ok(candidate);
            }
            candidate = format!("{}-{}", base_path, suffix);
            suffix += 1;
        }
    }

    /// Save a new version of a page. An approved version replaces the
    /// previously approved one.
    pub fn add_version(conn: &Connection, page_id: i64, name: &str, approved: bool) -> Result<PageVersion> {
        let now = chrono::Utc::now().timestamp();
        if approved {
            conn.execute(
                "UPDATE page_versions SET is_approved = 0 WHERE page_id = ?1",
                [page_id],
            )?;
        }
        conn.execute(
            "INSERT INTO page_versions (page_id, name, is_approved, created_ts) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![page_id, name, approved, now],
        )
        .with_context(|| format!("Failed to add version to page {}", page_id))?;
        conn.execute(
            "UPDATE pages SET modified_ts = ?1 WHERE id = ?2",
            rusqlite::params![now, page_id],
        )?;

        Ok(PageVersion {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            is_approved: approved,
            created_ts: now,
        })
    }

    /// Approve the most recent version of a page
    pub fn approve_recent(conn: &Connection, page_id: i64) -> Result<()> {
        let latest: Option<i64> = conn.query_row(
            "SELECT MAX(id) FROM page_versions WHERE page_id = ?1",
            [page_id],
            |row| row.get(0),
        )?;
        let latest = latest.ok_or(ListingError::PageNotFound { id: page_id })?;

        conn.execute(
            "UPDATE page_versions SET is_approved = (id = ?1) WHERE page_id = ?2",
            rusqlite::params![latest, page_id],
        )?;
        Ok(())
    }

    /// Move a page to the trash. Trashed pages never appear in listings.
    pub fn move_to_trash(conn: &Connection, page_id: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE pages SET is_active = 0, modified_ts = ?1 WHERE id = ?2",
            rusqlite::params![now, page_id],
        )?;
        if updated == 0 {
            return Err(ListingError::PageNotFound { id: page_id }.into());
        }
        Ok(())
    }

    /// Get page by ID, with the requested version resolved
    pub fn get_by_id(conn: &Connection, id: i64, version: VersionToRetrieve) -> Result<Option<Page>> {
        let sql = format!(
            "SELECT {} FROM pages p
             LEFT JOIN page_types pt ON pt.id = p.page_type_id
             LEFT JOIN page_versions cv ON {}
             WHERE p.id = ?1",
            PAGE_COLUMNS,
            version_condition(version)
        );
        conn.query_row(&sql, [id], page_from_row)
            .optional()
            .with_context(|| format!("Failed to load page {}", id))
    }

    /// Get an active (not trashed) page by its path
    pub fn get_by_path(conn: &Connection, path: &str, version: VersionToRetrieve) -> Result<Option<Page>> {
        let sql = format!(
            "SELECT {} FROM pages p
             LEFT JOIN page_types pt ON pt.id = p.page_type_id
             LEFT JOIN page_versions cv ON {}
             WHERE p.path = ?1 AND p.is_active = 1",
            PAGE_COLUMNS,
            version_condition(version)
        );
        conn.query_row(&sql, [path], page_from_row)
            .optional()
            .with_context(|| format!("Failed to load page at path {}", path))
    }
}
