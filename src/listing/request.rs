use crate::listing::query::{SortColumn, SortDirection};
use crate::models::{LanguageSection, StackCategory, StackFolder};

/// Which part of the stacks tree a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderScope {
    /// Everything below the stacks root, nested folders included
    #[default]
    Unfiltered,
    /// Direct children of the stacks root
    RootOnly,
    /// Direct children of the folder with this page id
    WithinFolder(i64),
}

/// Options of one stack listing. Built with [`ListingRequest::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    include_folders: bool,
    include_global_areas: bool,
    include_stacks: bool,
    folders_first: bool,
    language_section_id: Option<i64>,
    folder_scope: FolderScope,
    user_added_only: bool,
    category_parent_id: Option<i64>,
    sort: (SortColumn, SortDirection),
    keywords: Option<String>,
    limit: Option<u32>,
    offset: u32,
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self {
            include_folders: true,
            include_global_areas: true,
            include_stacks: true,
            folders_first: false,
            language_section_id: None,
            folder_scope: FolderScope::Unfiltered,
            user_added_only: false,
            category_parent_id: None,
            sort: (SortColumn::Name, SortDirection::Asc),
            keywords: None,
            limit: None,
            offset: 0,
        }
    }
}

impl ListingRequest {
    pub fn builder() -> ListingRequestBuilder {
        ListingRequestBuilder::default()
    }

    pub fn include_folders(&self) -> bool {
        self.include_folders
    }

    pub fn include_global_areas(&self) -> bool {
        self.include_global_areas
    }

    pub fn include_stacks(&self) -> bool {
        self.include_stacks
    }

    pub fn folders_first(&self) -> bool {
        self.folders_first
    }

    /// `None` lists stacks outside any language section
    pub fn language_section_id(&self) -> Option<i64> {
        self.language_section_id
    }

    pub fn folder_scope(&self) -> FolderScope {
        self.folder_scope
    }

    pub fn root_items_only(&self) -> bool {
        self.folder_scope == FolderScope::RootOnly
    }

    pub fn user_added_only(&self) -> bool {
        self.user_added_only
    }

    pub fn category_parent_id(&self) -> Option<i64> {
        self.category_parent_id
    }

    pub fn sort(&self) -> (SortColumn, SortDirection) {
        self.sort
    }

    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// Builder for [`ListingRequest`]
///
/// # Example
///
/// ```
/// use stacklist::listing::{FolderScope, ListingRequest};
///
/// let request = ListingRequest::builder()
///     .root_items_only(true)
///     .include_global_areas(false)
///     .folders_first(true)
///     .build();
/// assert_eq!(request.folder_scope(), FolderScope::RootOnly);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListingRequestBuilder {
    request: ListingRequest,
}

impl ListingRequestBuilder {
    /// Restrict to direct children of `folder`
    pub fn filter_by_folder(mut self, folder: &StackFolder) -> Self {
        self.request.folder_scope = FolderScope::WithinFolder(folder.id());
        self
    }

    /// `true` restricts to direct children of the stacks root.
    ///
    /// `false` does nothing: it does not clear a scope set earlier by this
    /// method or by [`Self::filter_by_folder`].
    pub fn root_items_only(mut self, value: bool) -> Self {
        if value {
            self.request.folder_scope = FolderScope::RootOnly;
        }
        self
    }

    /// `None` matches stacks with no language section (section id NULL or 0);
    /// `Some(section)` matches stacks of exactly that section.
    pub fn language_section(mut self, section: Option<&LanguageSection>) -> Self {
        self.request.language_section_id = section.map(|s| s.page_id);
        self
    }

    pub fn include_folders(mut self, value: bool) -> Self {
        self.request.include_folders = value;
        self
    }

    pub fn include_global_areas(mut self, value: bool) -> Self {
        self.request.include_global_areas = value;
        self
    }

    pub fn include_stacks(mut self, value: bool) -> Self {
        self.request.include_stacks = value;
        self
    }

    /// List global areas and nothing else
    pub fn global_areas_only(self) -> Self {
        self.include_folders(false)
            .include_global_areas(true)
            .include_stacks(false)
    }

    pub fn exclude_global_areas(self) -> Self {
        self.include_global_areas(false)
    }

    pub fn folders_first(mut self, value: bool) -> Self {
        self.request.folders_first = value;
        self
    }

    /// Only stacks created by editors
    pub fn user_added_only(mut self) -> Self {
        self.request.user_added_only = true;
        self
    }

    /// Restrict to direct children of the category's page
    pub fn stack_category(mut self, category: &StackCategory) -> Self {
        self.request.category_parent_id = Some(category.parent_scope_id());
        self
    }

    pub fn sort_by(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.request.sort = (column, direction);
        self
    }

    pub fn keywords(mut self, keywords: &str) -> Self {
        self.request.keywords = Some(keywords.to_string());
        self
    }

    pub fn paginate(mut self, limit: Option<u32>, offset: u32) -> Self {
        self.request.limit = limit;
        self.request.offset = offset;
        self
    }

    pub fn build(self) -> ListingRequest {
        self.request
    }
}
