use serde::{Deserialize, Serialize};
use crate::models::Page;

/// Language section: the root page of one locale of a multilingual site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSection {
    pub page_id: i64,
    pub locale: String,
}

/// Stack category: a page grouping the stacks of one language section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackCategory {
    pub page: Page,
    pub section_id: Option<i64>,
}

impl StackCategory {
    /// Parent id that scopes a listing to this category's children
    pub fn parent_scope_id(&self) -> i64 {
        self.page.id
    }
}
