//! Bookmarks command line.
//!
//! Imports and exports Netscape bookmark files, removes duplicate URLs, and
//! prints or edits the stored collection. Results go to stdout, logs to stderr.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookmarks::app::App;
use bookmarks::managers::bookmark_manager::BookmarkManagerTrait;
use bookmarks::managers::folder_manager::FolderManagerTrait;
use bookmarks::services::folder_tree::{FolderTree, TreeEvent};
use bookmarks::services::icon;
use bookmarks::services::settings_engine::{parse_value, SettingsEngine, SettingsEngineTrait};
use bookmarks::types::bookmark::{Bookmark, BookmarkId, FolderId, FolderItem};

#[derive(Parser, Debug)]
#[command(name = "bookmarks", version, about = "Manage a personal bookmark collection")]
struct Cli {
    /// Path to the database file (default: platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to the settings file (default: platform config directory)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a Netscape bookmark HTML file
    Import { file: PathBuf },
    /// Export all bookmarks to a Netscape bookmark HTML file
    Export { file: PathBuf },
    /// Remove bookmarks whose URL is already stored
    ClearDoubles,
    /// List bookmarks
    List {
        /// Only bookmarks directly inside this folder
        #[arg(long)]
        folder: Option<FolderId>,
        #[arg(long)]
        json: bool,
    },
    /// Search titles, URLs and descriptions (case-insensitive)
    Search {
        query: String,
        #[arg(long)]
        folder: Option<FolderId>,
        #[arg(long)]
        json: bool,
    },
    /// Show a single bookmark
    Show { id: BookmarkId },
    /// Print the folder tree
    Folders,
    /// Edit folders
    Folder {
        #[command(subcommand)]
        action: FolderAction,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum FolderAction {
    Add {
        name: String,
        #[arg(long)]
        parent: Option<FolderId>,
    },
    Rename { id: FolderId, name: String },
    /// Move a folder under another one (root when --parent is omitted)
    Move {
        id: FolderId,
        #[arg(long)]
        parent: Option<FolderId>,
    },
    /// Delete a folder; its contents move to the root level
    Delete { id: FolderId },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    /// Set a dot-separated key, e.g. `export.document_title "My Links"`
    Set { key: String, value: String },
    Reset,
}

fn init_logging(verbose: u8, default_level: &str) {
    let fallback = match verbose {
        0 => default_level.to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config_path
        .as_deref()
        .map(|path| path.to_string_lossy().into_owned());
    let mut settings_engine = SettingsEngine::new(config_path);
    settings_engine.load().context("failed to load settings")?;
    init_logging(cli.verbose, &settings_engine.get_settings().logging.level);

    if let Command::Config { action } = &cli.command {
        return run_config(&mut settings_engine, action);
    }

    let app = open_app(cli.db.clone(), settings_engine)?;
    if let Some(path) = app.db.path() {
        tracing::info!(path = %path.display(), "using database");
    }

    match cli.command {
        Command::Import { file } => {
            let report = app
                .import(&file)
                .with_context(|| format!("import of {} failed", file.display()))?;
            for folder in &report.skipped_folders {
                println!("Skipped folder '{}': {}", folder.name, folder.reason);
            }
            for skipped in &report.skipped {
                println!("Skipped '{}' ({}): {}", skipped.title, skipped.url, skipped.reason);
            }
            println!("{} created, {} updated", report.created, report.updated);
        }
        Command::Export { file } => {
            let summary = app
                .export(&file)
                .with_context(|| format!("export to {} failed", file.display()))?;
            println!(
                "Exported {} bookmarks in {} folders to {}",
                summary.bookmarks,
                summary.folders,
                file.display()
            );
        }
        Command::ClearDoubles => {
            let report = app.clear_doubles().context("failed to clear duplicates")?;
            if report.duplicates_found == 0 {
                println!("No duplicate bookmarks found.");
            } else {
                println!("Deleted {} duplicate bookmark(s).", report.deleted);
            }
        }
        Command::List { folder, json } => {
            let bookmarks = match folder {
                Some(id) => app.bookmarks().list_bookmarks_in(Some(id))?,
                None => app.bookmarks().list_bookmarks()?,
            };
            print_bookmarks(&app, &bookmarks, json)?;
        }
        Command::Search { query, folder, json } => {
            let bookmarks = app.bookmarks().search_bookmarks(&query, folder)?;
            print_bookmarks(&app, &bookmarks, json)?;
        }
        Command::Show { id } => {
            let bookmark = app
                .bookmarks()
                .get_bookmark(id)?
                .ok_or_else(|| anyhow!("bookmark {} not found", id))?;
            print_bookmark_details(&app, &bookmark)?;
        }
        Command::Folders => print_tree(&app)?,
        Command::Folder { action } => run_folder(&app, action)?,
        Command::Config { .. } => unreachable!("handled before opening the database"),
    }

    Ok(())
}

fn open_app(db: Option<PathBuf>, settings_engine: SettingsEngine) -> Result<App> {
    App::open(db, settings_engine)
        .map_err(|e| anyhow!(e))
        .context("failed to open database")
}

fn run_config(engine: &mut SettingsEngine, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", engine.get_config_path());
            println!("{}", serde_json::to_string_pretty(engine.get_settings())?);
        }
        ConfigAction::Set { key, value } => {
            engine.set_value(key, parse_value(value))?;
            println!("Set {}", key);
        }
        ConfigAction::Reset => {
            engine.reset()?;
            println!("Settings reset to defaults");
        }
    }
    Ok(())
}

fn run_folder(app: &App, action: FolderAction) -> Result<()> {
    let mut folders = app.folders();
    match action {
        FolderAction::Add { name, parent } => {
            let folder = folders.create_folder(&name, parent)?;
            println!("Created folder {} ({})", folder.name, folder.id);
        }
        FolderAction::Rename { id, name } => {
            let mut folder = folders
                .get_folder(id)?
                .ok_or_else(|| anyhow!("folder {} not found", id))?;
            folder.name = name;
            folders.update_folder(&folder)?;
            println!("Renamed folder {} to {}", id, folder.name.trim());
        }
        FolderAction::Move { id, parent } => {
            let mut folder = folders
                .get_folder(id)?
                .ok_or_else(|| anyhow!("folder {} not found", id))?;
            folder.parent_id = parent;
            folders.update_folder(&folder)?;
            println!("Moved folder {}", id);
        }
        FolderAction::Delete { id } => {
            folders.delete_folder(id)?;
            println!("Deleted folder {}", id);
        }
    }
    Ok(())
}

fn load_tree(app: &App) -> Result<FolderTree> {
    Ok(FolderTree::new(app.folders().list_folders()?))
}

fn folder_label(tree: &FolderTree, folder_id: Option<FolderId>) -> String {
    match folder_id {
        Some(id) => tree.path(id).join("/"),
        None => String::new(),
    }
}

fn print_bookmarks(app: &App, bookmarks: &[Bookmark], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(bookmarks)?);
        return Ok(());
    }

    let tree = load_tree(app)?;
    for bookmark in bookmarks {
        let folder = folder_label(&tree, bookmark.folder_id);
        if folder.is_empty() {
            println!("{:>6}  {}  <{}>", bookmark.id, bookmark.title, bookmark.url);
        } else {
            println!("{:>6}  {}  <{}>  [{}]", bookmark.id, bookmark.title, bookmark.url, folder);
        }
    }
    println!("{} bookmark(s)", bookmarks.len());
    Ok(())
}

fn print_bookmark_details(app: &App, bookmark: &Bookmark) -> Result<()> {
    let tree = load_tree(app)?;
    println!("id:          {}", bookmark.id);
    println!("title:       {}", bookmark.title);
    println!("url:         {}", bookmark.url);
    if let Some(description) = &bookmark.description {
        println!("description: {}", description);
    }
    let folder = folder_label(&tree, bookmark.folder_id);
    println!("folder:      {}", if folder.is_empty() { "/" } else { folder.as_str() });
    if let Some(payload) = &bookmark.icon {
        match icon::decode_data_uri(payload) {
            Ok(data) => println!("icon:        {} ({} bytes)", data.mime_type, data.bytes.len()),
            Err(e) => println!("icon:        unreadable ({})", e),
        }
    }
    Ok(())
}

fn print_tree(app: &App) -> Result<()> {
    let tree = load_tree(app)?;
    let bookmarks = app.bookmarks().list_bookmarks()?;
    let bookmark_count = |folder: Option<FolderId>| {
        tree.items(folder, &bookmarks)
            .iter()
            .filter(|item| matches!(item, FolderItem::Bookmark(_)))
            .count()
    };

    println!("/ ({} bookmarks)", bookmark_count(None));
    for event in tree.walk() {
        if let TreeEvent::Enter { folder, depth } = event {
            println!(
                "{}{} [{}] ({} bookmarks)",
                "  ".repeat(depth + 1),
                folder.name,
                folder.id,
                bookmark_count(Some(folder.id))
            );
        }
    }
    if tree.is_empty() && bookmarks.is_empty() {
        println!("No bookmarks stored yet; run `bookmarks import <FILE>` first.");
    }
    Ok(())
}
