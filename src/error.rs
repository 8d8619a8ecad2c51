//! Typed errors raised by the listing engine and the content repositories.
//!
//! Functions return `anyhow::Result`; these errors sit at the root of the chain
//! so callers can `downcast_ref::<ListingError>()` to tell configuration
//! problems from store failures.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    /// The configured stacks root page does not exist. Run `stacklist init`.
    #[error("Stacks root page not found at path '{path}'")]
    RootNotFound { path: String },

    #[error("Page type '{handle}' not found")]
    PageTypeNotFound { handle: String },

    #[error("Folder {id} not found")]
    FolderNotFound { id: i64 },

    #[error("Language section {id} not found")]
    SectionNotFound { id: i64 },

    #[error("Stack category {id} not found")]
    CategoryNotFound { id: i64 },

    #[error("Page {id} not found")]
    PageNotFound { id: i64 },
}

impl ListingError {
    /// Configuration errors are fatal: the store is not set up the way the
    /// configuration says it is.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ListingError::RootNotFound { .. } | ListingError::PageTypeNotFound { .. }
        )
    }
}
