use serde::{Deserialize, Serialize};
use crate::models::Page;

/// Stack type discriminator stored in `stacks.stack_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackType {
    /// Stack created by an editor
    UserAdded,
    /// Stack rendered in a fixed layout area across every page
    GlobalArea,
}

impl StackType {
    pub fn code(&self) -> i64 {
        match self {
            StackType::UserAdded => 0,
            StackType::GlobalArea => 20,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(StackType::UserAdded),
            20 => Some(StackType::GlobalArea),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StackType::UserAdded => "stack",
            StackType::GlobalArea => "global area",
        }
    }
}

/// Stack model: a named, reusable block of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub page: Page,
    pub name: String,
    pub stack_type: StackType,
    pub section_id: Option<i64>, // None or Some(0) when not bound to a language section
}

impl Stack {
    pub fn id(&self) -> i64 {
        self.page.id
    }

    pub fn is_global_area(&self) -> bool {
        self.stack_type == StackType::GlobalArea
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_type_codes() {
        assert_eq!(StackType::UserAdded.code(), 0);
        assert_eq!(StackType::GlobalArea.code(), 20);
        assert_eq!(StackType::from_code(0), Some(StackType::UserAdded));
        assert_eq!(StackType::from_code(20), Some(StackType::GlobalArea));
        assert_eq!(StackType::from_code(5), None);
    }
}
