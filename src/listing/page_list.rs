//! Generic page listing
//!
//! [`PageList`] accumulates predicates, ordering and pagination for a listing
//! of pages and runs it. By default it resolves the approved version of each
//! page (pages never approved are skipped), hides system pages, always hides
//! trashed pages, and sorts by name.
//!
//! Specialised listings such as [`crate::listing::StackList`] start from a
//! `PageList`, change its defaults and add their own predicates.

use rusqlite::Connection;
use anyhow::Result;
use crate::listing::predicate::Predicate;
use crate::listing::query::{ListingQuery, SortColumn, SortDirection, SortKey};
use crate::models::{Page, VersionToRetrieve};

/// Decides whether the current viewer may see a page
pub trait ViewPermission {
    fn can_view(&self, page: &Page) -> bool;
}

impl<F> ViewPermission for F
where
    F: Fn(&Page) -> bool,
{
    fn can_view(&self, page: &Page) -> bool {
        self(page)
    }
}

pub struct PageList {
    query: ListingQuery,
    permission_checker: Option<Box<dyn ViewPermission>>,
}

impl Default for PageList {
    fn default() -> Self {
        Self::new()
    }
}

impl PageList {
    pub fn new() -> Self {
        Self {
            query: ListingQuery::default(),
            permission_checker: None,
        }
    }

    pub fn version(mut self, version: VersionToRetrieve) -> Self {
        self.query.version = version;
        self
    }

    pub fn include_system_pages(mut self) -> Self {
        self.query.include_system_pages = true;
        self
    }

    /// Join the stacks table so stack columns are selected
    pub fn join_stacks(mut self) -> Self {
        self.query.join_stacks = true;
        self
    }

    /// Filter results through `checker` after they are loaded
    pub fn with_permission_checker(mut self, checker: Box<dyn ViewPermission>) -> Self {
        self.permission_checker = Some(checker);
        self
    }

    pub fn ignore_permissions(mut self) -> Self {
        self.permission_checker = None;
        self
    }

    pub fn checks_permissions(&self) -> bool {
        self.permission_checker.is_some()
    }

    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.query.predicates.push(predicate);
        self
    }

    pub fn filter_by_parent_id(self, parent_id: i64) -> Self {
        self.and_where(Predicate::ParentId(parent_id))
    }

    /// Pages anywhere below `path`, not including the page at `path`
    pub fn filter_by_path(self, path: &str) -> Self {
        self.and_where(Predicate::PathWithin(path.to_string()))
    }

    pub fn filter_by_page_type_id(self, page_type_id: i64) -> Self {
        self.and_where(Predicate::PageTypeId(page_type_id))
    }

    pub fn filter_by_keywords(self, keywords: &str) -> Self {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return self;
        }
        self.and_where(Predicate::NameContains(keywords.to_string()))
    }

    /// Replace the ordering with a single column
    pub fn sort_by(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.query.order_by = vec![SortKey::Column(column, direction)];
        self
    }

    pub fn sort_by_name(self) -> Self {
        self.sort_by(SortColumn::Name, SortDirection::Asc)
    }

    /// Put `key` in front of the current ordering, which becomes secondary
    pub fn prepend_sort(mut self, key: SortKey) -> Self {
        self.query.order_by.insert(0, key);
        self
    }

    pub fn paginate(mut self, limit: Option<u32>, offset: u32) -> Self {
        self.query.limit = limit;
        self.query.offset = offset;
        self
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn into_query(self) -> ListingQuery {
        self.query
    }

    /// Run the listing and return the visible pages.
    ///
    /// Permission filtering happens after pagination, so a page of results can
    /// hold fewer than `limit` entries when a checker hides some.
    pub fn results(&self, conn: &Connection) -> Result<Vec<Page>> {
        let pages = self
            .query
            .fetch_rows(conn)?
            .into_iter()
            .map(|row| row.page)
            .filter(|page| self.is_visible(page))
            .collect();
        Ok(pages)
    }

    /// Number of matching pages before pagination and permission filtering
    pub fn count(&self, conn: &Connection) -> Result<u64> {
        self.query.count(conn)
    }

    fn is_visible(&self, page: &Page) -> bool {
        self.permission_checker
            .as_ref()
            .map(|checker| checker.can_view(page))
            .unwrap_or(true)
    }
}
