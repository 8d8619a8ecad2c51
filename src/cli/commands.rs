use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use crate::config::Config;
use crate::db::{DbConnection, Installer};
use crate::error::ListingError;
use crate::listing::{ListingRequest, SortColumn, SortDirection, StackList};
use crate::models::StackType;
use crate::repo::{CategoryRepo, NewStack, PageRepo, SectionRepo, StackRepo};
use crate::cli::abbrev;
use crate::cli::error::{user_error, validate_locale, validate_non_empty, validate_page_id};
use crate::cli::output::{format_listing_table, get_terminal_width, is_tty};
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "stacklist")]
#[command(about = "Stack listing engine - filtered, sorted listings of reusable content blocks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database, the folder page type and the stacks root page
    Init,
    /// Folder management commands
    Folders {
        #[command(subcommand)]
        subcommand: FolderCommands,
    },
    /// Stack management commands
    Stacks {
        #[command(subcommand)]
        subcommand: StackCommands,
    },
    /// Language section commands
    Sections {
        #[command(subcommand)]
        subcommand: SectionCommands,
    },
    /// Stack category commands
    Categories {
        #[command(subcommand)]
        subcommand: CategoryCommands,
    },
    /// List stacks, global areas and folders
    List(ListArgs),
}

#[derive(Subcommand)]
pub enum FolderCommands {
    /// Add a folder
    Add {
        name: String,
        /// Parent folder ID (default: stacks root)
        #[arg(long = "in")]
        parent: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum StackCommands {
    /// Add a stack
    Add {
        name: String,
        /// Folder or category ID to put the stack in (default: stacks root)
        #[arg(long = "in")]
        parent: Option<i64>,
        /// Create a global area instead of a regular stack
        #[arg(long)]
        global_area: bool,
        /// Language section ID the stack belongs to
        #[arg(long)]
        section: Option<i64>,
        /// Save as an unapproved draft
        #[arg(long)]
        draft: bool,
    },
    /// Approve the most recent version of a stack
    Approve { id: i64 },
    /// Move a stack or folder to the trash
    Trash { id: i64 },
}

#[derive(Subcommand)]
pub enum SectionCommands {
    /// Add a language section (e.g. en_US)
    Add { locale: String },
    /// List language sections
    List,
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add the stack category for a language section
    Add {
        /// Language section ID (default: stacks outside any section)
        #[arg(long)]
        section: Option<i64>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only direct children of this folder
    #[arg(long, conflicts_with = "root_only")]
    pub folder: Option<i64>,
    /// Only direct children of the stacks root
    #[arg(long)]
    pub root_only: bool,
    /// Only items of this language section (default: items outside any section)
    #[arg(long)]
    pub section: Option<i64>,
    /// Only direct children of this stack category
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub no_folders: bool,
    #[arg(long)]
    pub no_global_areas: bool,
    #[arg(long)]
    pub no_stacks: bool,
    /// Only global areas (same as --no-folders --no-stacks)
    #[arg(long)]
    pub global_areas: bool,
    /// Only stacks added by editors
    #[arg(long)]
    pub user_added: bool,
    /// List folders before everything else
    #[arg(long)]
    pub folders_first: bool,
    /// Sort column: name, date, order, id
    #[arg(long, default_value = "name")]
    pub sort: String,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Only items whose name contains this text
    #[arg(long)]
    pub keywords: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
    /// Print the number of matching items only
    #[arg(long)]
    pub count: bool,
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let args = match abbrev::expand_command_abbreviations(args) {
        Ok(expanded) => expanded,
        Err(e) => user_error(&e),
    };

    let clap_args = std::iter::once("stacklist".to_string())
        .chain(args)
        .collect::<Vec<_>>();
    let cli = match Cli::try_parse_from(clap_args) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let config = Config::load()?;
    handle_command(cli, &config)
}

fn handle_command(cli: Cli, config: &Config) -> Result<()> {
    let conn = DbConnection::connect(config)
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Init => handle_init(&conn, config),
        Commands::Folders { subcommand } => handle_folders(&conn, config, subcommand),
        Commands::Stacks { subcommand } => handle_stacks(&conn, config, subcommand),
        Commands::Sections { subcommand } => handle_sections(&conn, subcommand),
        Commands::Categories { subcommand } => handle_categories(&conn, config, subcommand),
        Commands::List(args) => handle_list(&conn, config, &args),
    }
}

fn handle_init(conn: &Connection, config: &Config) -> Result<()> {
    let root = Installer::install(conn, &config.listing)?;
    println!(
        "Initialized stacks root {} at {} ({}).",
        root.id,
        config.listing.stacks_root_path,
        config.data_location.display()
    );
    Ok(())
}

fn check_id(id: i64) -> i64 {
    validate_page_id(id).unwrap_or_else(|e| user_error(&e))
}

fn check_name(name: &str) {
    if let Err(e) = validate_non_empty(name, "Name") {
        user_error(&e);
    }
}

fn handle_folders(conn: &Connection, config: &Config, subcommand: FolderCommands) -> Result<()> {
    match subcommand {
        FolderCommands::Add { name, parent } => {
            check_name(&name);
            let parent = match parent {
                Some(id) => {
                    let id = check_id(id);
                    Some(
                        StackRepo::get_folder(conn, &config.listing, id)?
                            .ok_or(ListingError::FolderNotFound { id })?,
                    )
                }
                None => None,
            };
            let folder = StackRepo::create_folder(conn, &config.listing, name.trim(), parent.as_ref())?;
            println!("Created folder {}: {}", folder.id(), folder.page.name());
            Ok(())
        }
    }
}

fn handle_stacks(conn: &Connection, config: &Config, subcommand: StackCommands) -> Result<()> {
    match subcommand {
        StackCommands::Add { name, parent, global_area, section, draft } => {
            check_name(&name);
            let parent_id = parent.map(check_id);
            if let Some(section_id) = section {
                SectionRepo::require(conn, check_id(section_id))?;
            }
            let stack_type = if global_area { StackType::GlobalArea } else { StackType::UserAdded };
            let stack = StackRepo::create_stack(conn, &config.listing, &NewStack {
                name: name.trim(),
                parent_id,
                stack_type,
                section_id: section,
                approved: !draft,
            })?;
            println!("Created {} {}: {}", stack.stack_type.as_str(), stack.id(), stack.name);
            Ok(())
        }
        StackCommands::Approve { id } => {
            let id = check_id(id);
            PageRepo::approve_recent(conn, id)?;
            println!("Approved {}.", id);
            Ok(())
        }
        StackCommands::Trash { id } => {
            let id = check_id(id);
            PageRepo::move_to_trash(conn, id)?;
            println!("Moved {} to the trash.", id);
            Ok(())
        }
    }
}

fn handle_sections(conn: &Connection, subcommand: SectionCommands) -> Result<()> {
    match subcommand {
        SectionCommands::Add { locale } => {
            if let Err(e) = validate_locale(&locale) {
                user_error(&e);
            }
            let section = SectionRepo::create(conn, &locale)?;
            println!("Created language section {}: {}", section.page_id, section.locale);
            Ok(())
        }
        SectionCommands::List => {
            let sections = SectionRepo::list_all(conn)?;
            if sections.is_empty() {
                println!("No language sections.");
            }
            for section in sections {
                println!("{:>4} {}", section.page_id, section.locale);
            }
            Ok(())
        }
    }
}

fn handle_categories(conn: &Connection, config: &Config, subcommand: CategoryCommands) -> Result<()> {
    match subcommand {
        CategoryCommands::Add { section } => {
            let section = match section {
                Some(id) => Some(SectionRepo::require(conn, check_id(id))?),
                None => None,
            };
            let category = CategoryRepo::create(conn, &config.listing, section.as_ref())?;
            println!("Created stack category {}: {}", category.page.id, category.page.name());
            Ok(())
        }
    }
}

/// Build the listing request for `stacklist list`
pub fn build_list_request(conn: &Connection, config: &Config, args: &ListArgs) -> Result<ListingRequest> {
    let mut builder = ListingRequest::builder();

    if let Some(id) = args.folder {
        let id = check_id(id);
        let folder = StackRepo::get_folder(conn, &config.listing, id)?
            .ok_or(ListingError::FolderNotFound { id })?;
        builder = builder.filter_by_folder(&folder);
    }
    builder = builder.root_items_only(args.root_only);

    let section = match args.section {
        Some(id) => Some(SectionRepo::require(conn, check_id(id))?),
        None => None,
    };
    builder = builder.language_section(section.as_ref());

    if let Some(id) = args.category {
        let category = CategoryRepo::require(conn, check_id(id))?;
        builder = builder.stack_category(&category);
    }

    builder = builder
        .include_folders(!args.no_folders)
        .include_global_areas(!args.no_global_areas)
        .include_stacks(!args.no_stacks);
    if args.global_areas {
        builder = builder.global_areas_only();
    }
    if args.user_added {
        builder = builder.user_added_only();
    }

    let column = SortColumn::from_str(&args.sort)
        .unwrap_or_else(|| user_error(&format!("Unknown sort column: '{}'. Use name, date, order or id.", args.sort)));
    let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
    builder = builder.sort_by(column, direction).folders_first(args.folders_first);

    if let Some(keywords) = &args.keywords {
        builder = builder.keywords(keywords);
    }

    Ok(builder.paginate(args.limit, args.offset).build())
}

fn handle_list(conn: &Connection, config: &Config, args: &ListArgs) -> Result<()> {
    let request = build_list_request(conn, config, args)?;
    let list = StackList::new(request, &config.listing);

    if args.count {
        let count = list.count(conn).context("Failed to count items")?;
        if args.json {
            println!("{}", serde_json::json!({ "count": count }));
        } else {
            println!("{}", count);
        }
        return Ok(());
    }

    let items = list.results(conn).context("Failed to list items")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print!(
            "{}",
            format_listing_table(&items, &config.listing.folder_page_type, get_terminal_width(), is_tty())
        );
    }
    Ok(())
}
