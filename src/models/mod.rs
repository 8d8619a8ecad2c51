// Core data models for stacklist
// These structs represent the content tree entities

pub mod page;
pub mod stack;
pub mod section;
pub mod item;

pub use page::*;
pub use stack::*;
pub use section::*;
pub use item::*;
