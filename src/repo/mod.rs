pub mod page;
pub mod page_type;
pub mod stack;
pub mod section;

pub use page::*;
pub use page_type::*;
pub use stack::*;
pub use section::*;
