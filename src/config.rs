//! Runtime configuration
//!
//! Configuration lives in `~/.stacklist/rc` as `key=value` lines. Lines starting
//! with `#` are comments. Unknown keys are ignored (with a warning in the log),
//! as is a `stacks.root_path` that is not an absolute path below `/`.
//!
//! | Key                  | Default               |
//! |----------------------|-----------------------|
//! | `data.location`      | `~/.stacklist/content.db` |
//! | `stacks.root_path`   | `/!stacks`            |
//! | `stacks.folder_type` | `core_stack_category` |

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Path of the page every stack, folder and category lives under
pub const DEFAULT_STACKS_ROOT_PATH: &str = "/!stacks";

/// Handle of the page type that marks a page as a stack folder
pub const DEFAULT_FOLDER_PAGE_TYPE: &str = "core_stack_category";

/// Settings consumed by the listing engine.
///
/// Passed explicitly to [`crate::listing::StackList`] and the installer so the
/// stacks root is never a process-wide constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    pub stacks_root_path: String,
    pub folder_page_type: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            stacks_root_path: DEFAULT_STACKS_ROOT_PATH.to_string(),
            folder_page_type: DEFAULT_FOLDER_PAGE_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_location: PathBuf,
    pub listing: ListingConfig,
}

impl Config {
    /// Directory holding the rc file and the default database
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".stacklist"))
    }

    /// Get the configuration file path
    pub fn rc_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("rc"))
    }

    /// Load configuration from the rc file, falling back to defaults
    pub fn load() -> Result<Self> {
        let rc_path = Self::rc_path()?;
        let base_dir = Self::base_dir()?;
        if rc_path.exists() {
            let contents = std::fs::read_to_string(&rc_path)
                .with_context(|| format!("Failed to read config file: {}", rc_path.display()))?;
            Ok(Self::parse(&contents, &base_dir))
        } else {
            Ok(Self::parse("", &base_dir))
        }
    }

    /// Parse rc file contents. Relative paths resolve against `base_dir`.
    pub fn parse(contents: &str, base_dir: &Path) -> Self {
        let mut config = Config {
            data_location: base_dir.join("content.db"),
            listing: ListingConfig::default(),
        };

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("Ignoring malformed config line: {}", line);
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "data.location" => {
                    let path = PathBuf::from(value);
                    config.data_location = if path.is_relative() {
                        base_dir.join(path)
                    } else {
                        path
                    };
                }
                "stacks.root_path" => {
                    let path = value.trim_end_matches('/');
                    if path.starts_with('/') {
                        config.listing.stacks_root_path = path.to_string();
                    } else {
                        log::warn!(
                            "Ignoring stacks.root_path '{}': must be an absolute page path below '/'",
                            value
                        );
                    }
                }
                "stacks.folder_type" => {
                    config.listing.folder_page_type = value.to_string();
                }
                other => log::warn!("Ignoring unknown config key: {}", other),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("", Path::new("/home/u/.stacklist"));
        assert_eq!(config.data_location, PathBuf::from("/home/u/.stacklist/content.db"));
        assert_eq!(config.listing, ListingConfig::default());
        assert_eq!(config.listing.stacks_root_path, "/!stacks");
    }

    #[test]
    fn test_parse_all_keys() {
        let rc = "# comment\n\
                  data.location=./custom.db\n\
                  stacks.root_path = /blocks/\n\
                  stacks.folder_type=block_folder\n";
        let config = Config::parse(rc, Path::new("/cfg"));
        assert_eq!(config.data_location, PathBuf::from("/cfg/./custom.db"));
        assert_eq!(config.listing.stacks_root_path, "/blocks");
        assert_eq!(config.listing.folder_page_type, "block_folder");
    }

    #[test]
    fn test_absolute_data_location() {
        let config = Config::parse("data.location=/var/lib/content.db", Path::new("/cfg"));
        assert_eq!(config.data_location, PathBuf::from("/var/lib/content.db"));
    }

    #[test]
    fn test_invalid_root_path_keeps_default() {
        for rc in ["stacks.root_path=/", "stacks.root_path=", "stacks.root_path=blocks", "stacks.root_path=//"] {
            let config = Config::parse(rc, Path::new("/cfg"));
            assert_eq!(config.listing.stacks_root_path, DEFAULT_STACKS_ROOT_PATH, "rc: {}", rc);
        }
    }

    #[test]
    fn test_malformed_and_unknown_lines_ignored() {
        let config = Config::parse("garbage\nfoo.bar=1\n", Path::new("/cfg"));
        assert_eq!(config.listing, ListingConfig::default());
    }
}
