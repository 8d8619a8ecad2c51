use serde::Serialize;
use crate::models::{Page, Stack};

/// One entry of a stack listing.
///
/// A listed row becomes a `Stack` when an active stack record exists for its
/// page id. Folders, categories and rows without a stack record stay plain
/// pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedItem {
    Stack(Stack),
    Page(Page),
}

impl ResolvedItem {
    pub fn id(&self) -> i64 {
        match self {
            ResolvedItem::Stack(stack) => stack.id(),
            ResolvedItem::Page(page) => page.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ResolvedItem::Stack(stack) => &stack.name,
            ResolvedItem::Page(page) => page.name(),
        }
    }

    pub fn as_stack(&self) -> Option<&Stack> {
        match self {
            ResolvedItem::Stack(stack) => Some(stack),
            ResolvedItem::Page(_) => None,
        }
    }

    pub fn page(&self) -> &Page {
        match self {
            ResolvedItem::Stack(stack) => &stack.page,
            ResolvedItem::Page(page) => page,
        }
    }
}
