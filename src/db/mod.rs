pub mod connection;
pub mod install;
pub mod migrations;

pub use connection::*;
pub use install::*;
pub use migrations::*;
