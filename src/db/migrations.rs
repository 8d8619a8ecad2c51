use rusqlite::{Connection, Result};
use std::collections::HashMap;

/// Current database schema version
const CURRENT_VERSION: u32 = 2;

/// Applies the content store schema one version at a time
pub struct MigrationManager;

impl MigrationManager {
    /// Bring the content store up to the current schema version
    ///
    /// Each pending version runs in its own transaction
    pub fn initialize(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )?;

        let current_version: u32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for version in (current_version + 1)..=CURRENT_VERSION {
            Self::apply_migration(conn, version)?;
        }

        Ok(())
    }

    /// Apply a specific migration by version number
    fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
        let migrations = get_migrations();
        if let Some(migration) = migrations.get(&version) {
            let tx = conn.unchecked_transaction()?;
            migration(&tx)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [version],
            )?;
            tx.commit()?;
            log::debug!("Applied schema migration v{}", version);
            Ok(())
        } else {
            Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(format!("No migration found for version {}", version)),
            ))
        }
    }

    /// Get the current schema version
    pub fn get_version(conn: &Connection) -> Result<u32> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }
}

/// Get all migrations indexed by version
fn get_migrations() -> HashMap<u32, fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>> {
    let mut migrations: HashMap<u32, fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>> = HashMap::new();
    migrations.insert(1, migration_v1);
    migrations.insert(2, migration_v2);
    migrations
}

/// Migration v1: pages, versions, page types and stacks
fn migration_v1(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    tx.execute("PRAGMA foreign_keys=ON", [])?;

    tx.execute(
        "CREATE TABLE page_types (
            id INTEGER PRIMARY KEY,
            handle TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        )",
        [],
    )?;

    // Every node of the tree is a page: the stacks root, folders, categories,
    // stacks and global areas. Trashed pages keep their row with is_active = 0.
    tx.execute(
        "CREATE TABLE pages (
            id INTEGER PRIMARY KEY,
            parent_id INTEGER NULL REFERENCES pages(id),
            path TEXT NULL UNIQUE,
            page_type_id INTEGER NULL REFERENCES page_types(id),
            is_system INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            display_order INTEGER NOT NULL DEFAULT 0,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;
    tx.execute("CREATE INDEX idx_pages_parent_id ON pages(parent_id)", [])?;
    tx.execute("CREATE INDEX idx_pages_page_type_id ON pages(page_type_id)", [])?;

    tx.execute(
        "CREATE TABLE page_versions (
            id INTEGER PRIMARY KEY,
            page_id INTEGER NOT NULL REFERENCES pages(id),
            name TEXT NOT NULL,
            is_approved INTEGER NOT NULL DEFAULT 0,
            created_ts INTEGER NOT NULL
        )",
        [],
    )?;
    tx.execute("CREATE INDEX idx_page_versions_page_id ON page_versions(page_id)", [])?;

    // section_id is 0 or NULL for stacks that are not bound to a language section
    tx.execute(
        "CREATE TABLE stacks (
            page_id INTEGER PRIMARY KEY REFERENCES pages(id),
            name TEXT NOT NULL,
            stack_type INTEGER NOT NULL DEFAULT 0,
            section_id INTEGER NULL
        )",
        [],
    )?;
    tx.execute("CREATE INDEX idx_stacks_section_id ON stacks(section_id)", [])?;

    Ok(())
}

/// Migration v2: language sections and stack categories
fn migration_v2(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    tx.execute(
        "CREATE TABLE sections (
            page_id INTEGER PRIMARY KEY REFERENCES pages(id),
            locale TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE stack_categories (
            page_id INTEGER PRIMARY KEY REFERENCES pages(id),
            section_id INTEGER NULL REFERENCES sections(page_id)
        )",
        [],
    )?;

    Ok(())
}
