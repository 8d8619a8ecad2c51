use serde::{Deserialize, Serialize};

/// Which version of a page a listing resolves names and approval from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionToRetrieve {
    /// Latest approved version; pages that were never approved are skipped
    Active,
    /// Latest version regardless of approval, so drafts are listed too
    Recent,
}

impl VersionToRetrieve {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionToRetrieve::Active => "active",
            VersionToRetrieve::Recent => "recent",
        }
    }
}

/// A page type, e.g. the type that marks stack folders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageType {
    pub id: i64,
    pub handle: String,
    pub name: String,
}

/// One saved revision of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageVersion {
    pub id: i64,
    pub name: String,
    pub is_approved: bool,
    pub created_ts: i64,
}

/// Page model
///
/// Every node of the content tree is a page: the stacks root, folders,
/// categories, stacks and global areas. `version` holds whichever version the
/// loader resolved (see [`VersionToRetrieve`]) and is `None` when no version
/// qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub path: Option<String>,
    pub page_type_id: Option<i64>,
    pub page_type_handle: Option<String>,
    pub is_system: bool,
    pub is_active: bool,
    pub display_order: i64,
    pub created_ts: i64,
    pub version: Option<PageVersion>,
}

impl Page {
    /// Name from the resolved version, or an empty string
    pub fn name(&self) -> &str {
        self.version.as_ref().map(|v| v.name.as_str()).unwrap_or("")
    }

    pub fn is_approved(&self) -> bool {
        self.version.as_ref().map(|v| v.is_approved).unwrap_or(false)
    }
}

/// A folder grouping stacks, backed by a page of the folder page type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFolder {
    pub page: Page,
}

impl StackFolder {
    pub fn id(&self) -> i64 {
        self.page.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(version: Option<PageVersion>) -> Page {
        Page {
            id: 7,
            parent_id: Some(1),
            path: Some("/!stacks/Header".to_string()),
            page_type_id: None,
            page_type_handle: None,
            is_system: true,
            is_active: true,
            display_order: 0,
            created_ts: 0,
            version,
        }
    }

    #[test]
    fn test_page_name_from_version() {
        let page = page_with(Some(PageVersion {
            id: 3,
            name: "Header".to_string(),
            is_approved: true,
            created_ts: 0,
        }));
        assert_eq!(page.name(), "Header");
        assert!(page.is_approved());
    }

    #[test]
    fn test_page_without_version() {
        let page = page_with(None);
        assert_eq!(page.name(), "");
        assert!(!page.is_approved());
    }
}
