//! stacklist - filtered, sorted listings of stacks (reusable content blocks)
//!
//! This library provides:
//! - A SQLite content store for pages, versions, stacks, folders, language
//!   sections and stack categories, with migrations
//! - Repositories for reading and writing that content
//! - The listing engine: a generic page listing and the stack listing built
//!   on top of it
//! - The `stacklist` command-line interface
//!
//! # Example
//!
//! ```no_run
//! use stacklist::config::ListingConfig;
//! use stacklist::db::{DbConnection, Installer};
//! use stacklist::listing::{ListingRequest, StackList};
//!
//! let conn = DbConnection::connect_in_memory().unwrap();
//! let config = ListingConfig::default();
//! Installer::install(&conn, &config).unwrap();
//!
//! let request = ListingRequest::builder()
//!     .root_items_only(true)
//!     .folders_first(true)
//!     .build();
//! for item in StackList::new(request, &config).results(&conn).unwrap() {
//!     println!("{} {}", item.id(), item.name());
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repo;
pub mod listing;
pub mod cli;
