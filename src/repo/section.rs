use rusqlite::{Connection, OptionalExtension};
use crate::config::ListingConfig;
use crate::error::ListingError;
use crate::models::{LanguageSection, StackCategory, VersionToRetrieve};
use crate::repo::{NewPage, PageRepo, StackRepo};
use anyhow::{Context, Result};

/// Language section repository
pub struct SectionRepo;

impl SectionRepo {
    /// Create a language section rooted at `/<locale>`
    pub fn create(conn: &Connection, locale: &str) -> Result<LanguageSection> {
        let page = PageRepo::create(conn, &NewPage {
            name: locale,
            parent: None,
            page_type_id: None,
            is_system: false,
            approved: true,
        })?;

        conn.execute(
            "INSERT INTO sections (page_id, locale) VALUES (?1, ?2)",
            rusqlite::params![page.id, locale],
        )
        .with_context(|| format!("Failed to create language section: {}", locale))?;

        Ok(LanguageSection {
            page_id: page.id,
            locale: locale.to_string(),
        })
    }

    pub fn get_by_id(conn: &Connection, page_id: i64) -> Result<Option<LanguageSection>> {
        conn.query_row(
            "SELECT page_id, locale FROM sections WHERE page_id = ?1",
            [page_id],
            |row| {
                Ok(LanguageSection {
                    page_id: row.get(0)?,
                    locale: row.get(1)?,
                })
            },
        )
        .optional()
        .with_context(|| format!("Failed to load language section {}", page_id))
    }

    /// Get a section or fail with [`ListingError::SectionNotFound`]
    pub fn require(conn: &Connection, page_id: i64) -> Result<LanguageSection> {
        Self::get_by_id(conn, page_id)?
            .ok_or_else(|| ListingError::SectionNotFound { id: page_id }.into())
    }

    pub fn list_all(conn: &Connection) -> Result<Vec<LanguageSection>> {
        let mut stmt = conn.prepare("SELECT page_id, locale FROM sections ORDER BY locale")?;
        let rows = stmt.query_map([], |row| {
            Ok(LanguageSection {
                page_id: row.get(0)?,
                locale: row.get(1)?,
            })
        })?;

        let mut sections = Vec::new();
        for row in rows {
            sections.push(row?);
        }
        Ok(sections)
    }
}

/// Stack category repository
pub struct CategoryRepo;

impl CategoryRepo {
    /// Create the category page for `section` under the stacks root.
    ///
    /// The category is named after the section locale, or "Default" for
    /// stacks outside any language section. A section has at most one
    /// active category; if it already exists it is returned unchanged.
    pub fn create(
        conn: &Connection,
        config: &ListingConfig,
        section: Option<&LanguageSection>,
    ) -> Result<StackCategory> {
        let section_id = section.map(|s| s.page_id);
        if let Some(existing) = Self::get_for_section(conn, section_id)? {
            return Ok(existing);
        }

        let root = StackRepo::root_page(conn, config)?;
        let name = section.map(|s| s.locale.as_str()).unwrap_or("Default");
        let page = PageRepo::create(conn, &NewPage {
            name,
            parent: Some(&root),
            page_type_id: None,
            is_system: true,
            approved: true,
        })?;

        conn.execute(
            "INSERT INTO stack_categories (page_id, section_id) VALUES (?1, ?2)",
            rusqlite::params![page.id, section_id],
        )
        .with_context(|| format!("Failed to create stack category: {}", name))?;

        Ok(StackCategory { page, section_id })
    }

    pub fn get_by_id(conn: &Connection, page_id: i64) -> Result<Option<StackCategory>> {
        let section_id: Option<Option<i64>> = conn
            .query_row(
                "SELECT section_id FROM stack_categories WHERE page_id = ?1",
                [page_id],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to load stack category {}", page_id))?;

        let Some(section_id) = section_id else {
            return Ok(None);
        };
        let page = PageRepo::get_by_id(conn, page_id, VersionToRetrieve::Recent)?;
        Ok(page.map(|page| StackCategory { page, section_id }))
    }

    /// Active category of a language section (`None` for the default category)
    pub fn get_for_section(conn: &Connection, section_id: Option<i64>) -> Result<Option<StackCategory>> {
        let page_id: Option<i64> = conn
            .query_row(
                "SELECT c.page_id FROM stack_categories c
                 INNER JOIN pages p ON p.id = c.page_id
                 WHERE c.section_id IS ?1 AND p.is_active = 1
                 ORDER BY c.page_id LIMIT 1",
                [section_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to look up stack category")?;

        match page_id {
            Some(page_id) => Self::get_by_id(conn, page_id),
            None => Ok(None),
        }
    }

    /// Get a category or fail with [`ListingError::CategoryNotFound`]
    pub fn require(conn: &Connection, page_id: i64) -> Result<StackCategory> {
        Self::get_by_id(conn, page_id)?
            .ok_or_else(|| ListingError::CategoryNotFound { id: page_id }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbConnection, Installer};

    #[test]
    fn test_create_and_list_sections() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let fr = SectionRepo::create(&conn, "fr_FR").unwrap();
        SectionRepo::create(&conn, "en_US").unwrap();

        let sections = SectionRepo::list_all(&conn).unwrap();
        let locales: Vec<&str> = sections.iter().map(|s| s.locale.as_str()).collect();
        assert_eq!(locales, vec!["en_US", "fr_FR"]);
        assert_eq!(SectionRepo::require(&conn, fr.page_id).unwrap(), fr);
    }

    #[test]
    fn test_missing_section() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let err = SectionRepo::require(&conn, 42).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ListingError>(),
            Some(&ListingError::SectionNotFound { id: 42 })
        );
    }

    #[test]
    fn test_category_under_root() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let config = ListingConfig::default();
        let root = Installer::install(&conn, &config).unwrap();
        let section = SectionRepo::create(&conn, "de_DE").unwrap();

        let category = CategoryRepo::create(&conn, &config, Some(&section)).unwrap();
        assert_eq!(category.page.parent_id, Some(root.id));
        assert_eq!(category.page.path.as_deref(), Some("/!stacks/de_DE"));
        assert_eq!(category.section_id, Some(section.page_id));

        let loaded = CategoryRepo::require(&conn, category.parent_scope_id()).unwrap();
        assert_eq!(loaded, category);

        let default = CategoryRepo::create(&conn, &config, None).unwrap();
        assert_eq!(default.page.name(), "Default");
        assert_eq!(default.section_id, None);
    }

    #[test]
    fn test_category_create_is_idempotent() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let config = ListingConfig::default();
        Installer::install(&conn, &config).unwrap();
        let section = SectionRepo::create(&conn, "de_DE").unwrap();

        let first = CategoryRepo::create(&conn, &config, Some(&section)).unwrap();
        let second = CategoryRepo::create(&conn, &config, Some(&section)).unwrap();
        assert_eq!(first, second);
        assert!(PageRepo::get_by_path(&conn, "/!stacks/de_DE-2", VersionToRetrieve::Recent).unwrap().is_none());

        let default = CategoryRepo::create(&conn, &config, None).unwrap();
        assert_eq!(CategoryRepo::create(&conn, &config, None).unwrap(), default);
        assert_ne!(default.page.id, first.page.id);
    }
}
