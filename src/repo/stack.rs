use rusqlite::{Connection, OptionalExtension};
use crate::config::ListingConfig;
use crate::error::ListingError;
use crate::models::{Page, Stack, StackFolder, StackType, VersionToRetrieve};
use crate::repo::page::{page_from_row, version_condition, PAGE_COLUMNS, PAGE_COLUMN_COUNT};
use crate::repo::{CategoryRepo, NewPage, PageRepo, PageTypeRepo};
use anyhow::{Context, Result};

/// Fields of a stack to create
#[derive(Debug, Clone)]
pub struct NewStack<'a> {
    pub name: &'a str,
    /// Folder or category page the stack goes under; `None` for the stacks root
    pub parent_id: Option<i64>,
    pub stack_type: StackType,
    pub section_id: Option<i64>,
    /// Publish the first version. Unapproved stacks are drafts.
    pub approved: bool,
}

/// Stack repository for database operations
///
/// Stacks and folders are pages under the stacks root. A stack additionally
/// owns a row in `stacks` keyed by its page id; a folder is a page of the
/// folder page type.
///
/// # Example
///
/// ```no_run
/// use stacklist::config::ListingConfig;
/// use stacklist::db::{DbConnection, Installer};
/// use stacklist::models::StackType;
/// use stacklist::repo::{NewStack, StackRepo};
///
/// let conn = DbConnection::connect_in_memory().unwrap();
/// let config = ListingConfig::default();
/// Installer::install(&conn, &config).unwrap();
/// let stack = StackRepo::create_stack(&conn, &config, &NewStack {
///     name: "Footer",
///     parent_id: None,
///     stack_type: StackType::GlobalArea,
///     section_id: None,
///     approved: true,
/// }).unwrap();
/// ```
pub struct StackRepo;

impl StackRepo {
    /// Load the stacks root page or fail with [`ListingError::RootNotFound`]
    pub fn root_page(conn: &Connection, config: &ListingConfig) -> Result<Page> {
        PageRepo::get_by_path(conn, &config.stacks_root_path, VersionToRetrieve::Recent)?
            .ok_or_else(|| {
                ListingError::RootNotFound {
                    path: config.stacks_root_path.clone(),
                }
                .into()
            })
    }

    /// Resolve the parent page of a new stack.
    ///
    /// Only the stacks root, a folder or a stack category can hold stacks.
    /// Any other id fails with [`ListingError::FolderNotFound`].
    fn parent_page(conn: &Connection, config: &ListingConfig, parent_id: Option<i64>) -> Result<Page> {
        let Some(id) = parent_id else {
            return Self::root_page(conn, config);
        };

        if let Some(root) = PageRepo::get_by_path(conn, &config.stacks_root_path, VersionToRetrieve::Recent)? {
            if root.id == id {
                return Ok(root);
            }
        }
        if let Some(folder) = Self::get_folder(conn, config, id)? {
            return Ok(folder.page);
        }
        match CategoryRepo::get_by_id(conn, id)? {
            Some(category) if category.page.is_active => Ok(category.page),
            _ => Err(ListingError::FolderNotFound { id }.into()),
        }
    }

    /// Create a stack (or global area) page and its stack record
    pub fn create_stack(conn: &Connection, config: &ListingConfig, new_stack: &NewStack) -> Result<Stack> {
        let parent = Self::parent_page(conn, config, new_stack.parent_id)?;
        let page = PageRepo::create(conn, &NewPage {
            name: new_stack.name,
            parent: Some(&parent),
            page_type_id: None,
            is_system: true,
            approved: new_stack.approved,
        })?;

        conn.execute(
            "INSERT INTO stacks (page_id, name, stack_type, section_id) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![page.id, new_stack.name, new_stack.stack_type.code(), new_stack.section_id],
        )
        .with_context(|| format!("Failed to create stack: {}", new_stack.name))?;

        Ok(Stack {
            page,
            name: new_stack.name.to_string(),
            stack_type: new_stack.stack_type,
            section_id: new_stack.section_id,
        })
    }

    /// Create a folder under `parent` (or under the stacks root)
    pub fn create_folder(
        conn: &Connection,
        config: &ListingConfig,
        name: &str,
        parent: Option<&StackFolder>,
    ) -> Result<StackFolder> {
        let folder_type = PageTypeRepo::get_by_handle(conn, &config.folder_page_type)?
            .ok_or_else(|| ListingError::PageTypeNotFound {
                handle: config.folder_page_type.clone(),
            })?;
        let parent_page = match parent {
            Some(folder) => folder.page.clone(),
            None => Self::root_page(conn, config)?,
        };

        let page = PageRepo::create(conn, &NewPage {
            name,
            parent: Some(&parent_page),
            page_type_id: Some(folder_type.id),
            is_system: true,
            approved: true,
        })?;

        Ok(StackFolder { page })
    }

    /// Get a folder by its page id. Pages of another type are not folders.
    pub fn get_folder(conn: &Connection, config: &ListingConfig, page_id: i64) -> Result<Option<StackFolder>> {
        let page = PageRepo::get_by_id(conn, page_id, VersionToRetrieve::Recent)?;
        Ok(page
            .filter(|p| p.is_active && p.page_type_handle.as_deref() == Some(config.folder_page_type.as_str()))
            .map(|page| StackFolder { page }))
    }

    /// Load the active stack with the given page id.
    ///
    /// Returns `None` when the page has no stack record (folders, categories)
    /// or the page is in the trash. The page carries its approved version, if
    /// any.
    pub fn get_active(conn: &Connection, page_id: i64) -> Result<Option<Stack>> {
        let sql = format!(
            "SELECT {}, s.name, s.stack_type, s.section_id FROM stacks s
             INNER JOIN pages p ON p.id = s.page_id
             LEFT JOIN page_types pt ON pt.id = p.page_type_id
             LEFT JOIN page_versions cv ON {}
             WHERE s.page_id = ?1 AND p.is_active = 1",
            PAGE_COLUMNS,
            version_condition(VersionToRetrieve::Active)
        );

        let row = conn
            .query_row(&sql, [page_id], |row| {
                let page = page_from_row(row)?;
                let name: String = row.get(PAGE_COLUMN_COUNT)?;
                let code: i64 = row.get(PAGE_COLUMN_COUNT + 1)?;
                let section_id: Option<i64> = row.get(PAGE_COLUMN_COUNT + 2)?;
                Ok((page, name, code, section_id))
            })
            .optional()
            .with_context(|| format!("Failed to load stack {}", page_id))?;

        Ok(row.and_then(|(page, name, code, section_id)| {
            let stack_type = StackType::from_code(code);
            if stack_type.is_none() {
                log::warn!("Stack {} has unknown stack type {}", page_id, code);
            }
            stack_type.map(|stack_type| Stack {
                page,
                name,
                stack_type,
                section_id,
            })
        }))
    }
}
