use rusqlite::Connection;
use anyhow::{Context, Result};
use crate::config::ListingConfig;
use crate::models::{Page, VersionToRetrieve};
use crate::repo::{NewPage, PageRepo, PageTypeRepo};

/// Seeds the pieces of the content tree the listing engine depends on
pub struct Installer;

impl Installer {
    /// Ensure the folder page type and the stacks root page exist.
    ///
    /// Safe to run repeatedly. Returns the stacks root page.
    pub fn install(conn: &Connection, config: &ListingConfig) -> Result<Page> {
        PageTypeRepo::ensure(conn, &config.folder_page_type, "Stack Folder")
            .context("Failed to install folder page type")?;

        if let Some(root) = PageRepo::get_by_path(conn, &config.stacks_root_path, VersionToRetrieve::Recent)? {
            log::debug!("Stacks root already installed at {}", config.stacks_root_path);
            return Ok(root);
        }

        let name = config
            .stacks_root_path
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("stacks")
            .trim_start_matches('!');
        let root = PageRepo::create_at_path(
            conn,
            &NewPage {
                name: if name.is_empty() { "stacks" } else { name },
                parent: None,
                page_type_id: None,
                is_system: true,
                approved: true,
            },
            &config.stacks_root_path,
        )
        .with_context(|| format!("Failed to install stacks root at {}", config.stacks_root_path))?;

        log::info!("Installed stacks root page {} at {}", root.id, config.stacks_root_path);
        Ok(root)
    }
}
