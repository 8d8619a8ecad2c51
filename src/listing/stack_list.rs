//! Stack listing
//!
//! [`StackList`] turns a [`ListingRequest`] into a [`ListingQuery`] and maps
//! each row to a [`ResolvedItem`].
//!
//! # Query assembly
//!
//! Steps run in this order:
//!
//! 1. Folder scope. `RootOnly` and `WithinFolder` become a parent-id
//!    predicate (direct children only); `Unfiltered` becomes a path predicate
//!    on the stacks root subtree so nested folders are listed too. The
//!    category and user-added predicates follow.
//! 2. Language section: unscoped (NULL or 0) or exactly one section.
//! 3. Type filter over the folder / global area / stack flags.
//! 4. Ordering: the requested sort, with folders moved first on request.

use rusqlite::Connection;
use anyhow::Result;
use crate::config::ListingConfig;
use crate::error::ListingError;
use crate::listing::page_list::PageList;
use crate::listing::predicate::Predicate;
use crate::listing::query::{ListingQuery, ResultRow, SortKey};
use crate::listing::request::{FolderScope, ListingRequest};
use crate::models::{ResolvedItem, StackType, VersionToRetrieve};
use crate::repo::{PageTypeRepo, StackRepo};

/// Build the type filter for the three inclusion flags.
///
/// Returns `None` when everything is included. `folder_type_id` is only
/// called when folders are included in a mixed selection.
pub fn type_filter<F>(
    include_folders: bool,
    include_global_areas: bool,
    include_stacks: bool,
    folder_type_id: F,
) -> Result<Option<Predicate>>
where
    F: FnOnce() -> Result<i64>,
{
    if include_folders && include_global_areas && include_stacks {
        return Ok(None);
    }
    if !include_folders && !include_global_areas && !include_stacks {
        return Ok(Some(Predicate::Never));
    }

    let mut options = Vec::new();
    if include_folders {
        options.push(Predicate::PageTypeId(folder_type_id()?));
    }
    if include_global_areas {
        options.push(Predicate::StackTypeIs(StackType::GlobalArea));
    }
    if include_stacks {
        options.push(Predicate::StackTypeIsNot(StackType::GlobalArea));
    }
    Ok(Some(Predicate::AnyOf(options)))
}

pub struct StackList<'a> {
    request: ListingRequest,
    config: &'a ListingConfig,
}

impl<'a> StackList<'a> {
    pub fn new(request: ListingRequest, config: &'a ListingConfig) -> Self {
        Self { request, config }
    }

    pub fn request(&self) -> &ListingRequest {
        &self.request
    }

    /// Base listing for stacks: most recent versions so drafts show up,
    /// system pages included, no permission checks, sorted by name.
    fn base() -> PageList {
        PageList::new()
            .version(VersionToRetrieve::Recent)
            .include_system_pages()
            .ignore_permissions()
            .join_stacks()
            .sort_by_name()
    }

    fn folder_type_id(&self, conn: &Connection) -> Result<i64> {
        let handle = &self.config.folder_page_type;
        let page_type = PageTypeRepo::get_by_handle(conn, handle)?
            .ok_or_else(|| ListingError::PageTypeNotFound { handle: handle.clone() })?;
        Ok(page_type.id)
    }

    /// Compose the listing query.
    ///
    /// Fails with [`ListingError::RootNotFound`] when the scope needs the
    /// stacks root and it does not exist, and with
    /// [`ListingError::PageTypeNotFound`] when the folder page type is needed
    /// and missing.
    pub fn page_list(&self, conn: &Connection) -> Result<PageList> {
        let request = &self.request;
        let mut list = Self::base();

        list = match request.folder_scope() {
            FolderScope::RootOnly => {
                let root = StackRepo::root_page(conn, self.config)?;
                list.filter_by_parent_id(root.id)
            }
            FolderScope::WithinFolder(folder_id) => list.filter_by_parent_id(folder_id),
            FolderScope::Unfiltered => list.filter_by_path(&self.config.stacks_root_path),
        };
        if let Some(parent_id) = request.category_parent_id() {
            list = list.filter_by_parent_id(parent_id);
        }
        if request.user_added_only() {
            list = list.and_where(Predicate::StackTypeIs(StackType::UserAdded));
        }
        if let Some(keywords) = request.keywords() {
            list = list.filter_by_keywords(keywords);
        }

        list = match request.language_section_id() {
            None => list.and_where(Predicate::SectionUnscoped),
            Some(section_id) => list.and_where(Predicate::SectionId(section_id)),
        };

        if let Some(predicate) = type_filter(
            request.include_folders(),
            request.include_global_areas(),
            request.include_stacks(),
            || self.folder_type_id(conn),
        )? {
            list = list.and_where(predicate);
        }

        let (column, direction) = request.sort();
        list = list.sort_by(column, direction);
        if request.folders_first() {
            list = list.prepend_sort(SortKey::PageTypeFirst(self.folder_type_id(conn)?));
        }

        Ok(list.paginate(request.limit(), request.offset()))
    }

    pub fn query(&self, conn: &Connection) -> Result<ListingQuery> {
        Ok(self.page_list(conn)?.into_query())
    }

    /// Run the listing and resolve every row
    pub fn results(&self, conn: &Connection) -> Result<Vec<ResolvedItem>> {
        let rows = self.query(conn)?.fetch_rows(conn)?;
        log::debug!("Stack listing returned {} rows", rows.len());
        Ok(rows.into_iter().map(|row| resolve_row(conn, row)).collect())
    }

    /// Number of matching items, ignoring pagination
    pub fn count(&self, conn: &Connection) -> Result<u64> {
        self.query(conn)?.count(conn)
    }
}

/// Resolve a listing row to a stack, falling back to the page.
///
/// Rows without a stack record are folders or categories and skip the lookup.
/// A failed lookup is logged and falls back to the page as well.
pub fn resolve_row(conn: &Connection, row: ResultRow) -> ResolvedItem {
    if !row.has_stack_record() {
        return ResolvedItem::Page(row.page);
    }
    match StackRepo::get_active(conn, row.content_id()) {
        Ok(Some(stack)) => ResolvedItem::Stack(stack),
        Ok(None) => ResolvedItem::Page(row.page),
        Err(e) => {
            log::warn!("Failed to load stack {}: {:#}", row.content_id(), e);
            ResolvedItem::Page(row.page)
        }
    }
}
