pub mod page_list;
pub mod predicate;
pub mod query;
pub mod request;
pub mod stack_list;

pub use page_list::{PageList, ViewPermission};
pub use predicate::Predicate;
pub use query::{ListingQuery, ResultRow, SortColumn, SortDirection, SortKey};
pub use request::{FolderScope, ListingRequest, ListingRequestBuilder};
pub use stack_list::{resolve_row, type_filter, StackList};
