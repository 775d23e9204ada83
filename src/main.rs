//! ComicVine CLI
//!
//! Local front end over the browsing core: lists, details, search,
//! favorites and preferences, all backed by the SQLite cache.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use comicvine::application::commands;
use comicvine::application::dto::{FavoriteDto, ItemDto, PageDto};
use comicvine::{
    AppConfig, AppState, EntityKind, FavoritesSort, Filter, PagingFlavour, Sort, SortDirection,
    SortField,
};

/// ComicVine - browse the Comic Vine database from the terminal
#[derive(Parser, Debug)]
#[command(name = "comicvine", version, about = "Local-first Comic Vine browser")]
struct Cli {
    /// Path to the config file (default: {CONFIG_DIR}/comicvine/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the Comic Vine API key
    ApiKey {
        #[command(subcommand)]
        action: ApiKeyAction,
    },

    /// Browse a list, honouring the saved sort and filters
    List {
        /// characters, issues, volumes, concepts, locations, movies, objects, people, story_arcs, teams
        kind: EntityKind,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Show the cached window without contacting the API
        #[arg(long)]
        offline: bool,
    },

    /// Browse the most recently added entries of a kind
    Recent {
        kind: EntityKind,

        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        #[arg(long)]
        offline: bool,
    },

    /// Show one entry in detail
    Details { kind: EntityKind, id: i64 },

    /// Search across kinds
    Search {
        query: String,

        /// Restrict to a kind; repeat for several (default: all kinds)
        #[arg(short, long = "resource")]
        resources: Vec<EntityKind>,

        #[arg(long, default_value_t = 0)]
        offset: u32,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Manage search history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage per-kind sort and filter preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Show cache database info
    Info,
}

#[derive(Subcommand, Debug)]
enum ApiKeyAction {
    /// Store the API key
    Set { key: String },
    /// Remove the stored API key
    Clear,
    /// Report whether a key is stored
    Status,
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    /// List stored favorites of a kind
    List { kind: EntityKind },
    /// Load favorites of a kind with fresh data from the API
    Page {
        kind: EntityKind,
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Add an entry to favorites
    Add { kind: EntityKind, id: i64 },
    /// Remove an entry from favorites
    Remove { kind: EntityKind, id: i64 },
    /// Choose the order favorites are listed in
    Sort { kind: EntityKind, order: FavoritesOrder },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Show recent searches
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Delete one entry by id
    Delete { id: String },
    /// Delete every entry
    Clear,
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    /// Show the saved preferences of a kind
    Show { kind: EntityKind },
    /// Set the sort field of a kind
    Sort {
        kind: EntityKind,
        field: SortFieldArg,
        #[arg(long)]
        desc: bool,
    },
    /// Filter a kind by name
    Name { kind: EntityKind, value: String },
    /// Drop the saved sort and filters of a kind
    Clear { kind: EntityKind },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortFieldArg {
    Name,
    DateAdded,
    DateLastUpdated,
    CoverDate,
    StoreDate,
    IssueNumber,
    StartYear,
}

impl From<SortFieldArg> for SortField {
    fn from(arg: SortFieldArg) -> Self {
        match arg {
            SortFieldArg::Name => SortField::Name,
            SortFieldArg::DateAdded => SortField::DateAdded,
            SortFieldArg::DateLastUpdated => SortField::DateLastUpdated,
            SortFieldArg::CoverDate => SortField::CoverDate,
            SortFieldArg::StoreDate => SortField::StoreDate,
            SortFieldArg::IssueNumber => SortField::IssueNumber,
            SortFieldArg::StartYear => SortField::StartYear,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FavoritesOrder {
    Oldest,
    Newest,
    NameAsc,
    NameDesc,
}

impl From<FavoritesOrder> for FavoritesSort {
    fn from(order: FavoritesOrder) -> Self {
        match order {
            FavoritesOrder::Oldest => FavoritesSort::DateAddedAsc,
            FavoritesOrder::Newest => FavoritesSort::DateAddedDesc,
            FavoritesOrder::NameAsc => FavoritesSort::NameAsc,
            FavoritesOrder::NameDesc => FavoritesSort::NameDesc,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_item(item: &ItemDto) {
    println!(
        "{:>8}  {}",
        item.id,
        item.name.as_deref().unwrap_or("(untitled)")
    );
}

fn print_page(page: &PageDto, json: bool) -> Result<()> {
    if json {
        return print_json(page);
    }
    for item in &page.items {
        print_item(item);
    }
    println!(
        "-- {} {}{}",
        page.items.len(),
        page.kind,
        if page.end_reached { " (end)" } else { "" }
    );
    Ok(())
}

fn print_favorites(favorites: &[FavoriteDto], json: bool) -> Result<()> {
    if json {
        return print_json(&favorites);
    }
    for favorite in favorites {
        println!(
            "{:>8}  {}  (added {})",
            favorite.id,
            favorite.name.as_deref().unwrap_or("(untitled)"),
            favorite.date_added
        );
    }
    Ok(())
}

async fn show_window(
    state: &AppState,
    kind: EntityKind,
    flavour: PagingFlavour,
    pages: u32,
    offline: bool,
    json: bool,
) -> Result<()> {
    let page = if offline {
        commands::cached_page(state, kind, flavour)?
    } else {
        commands::load_page(state, kind, flavour, pages).await?
    };
    print_page(&page, json)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load_or_default(&config_path);
    log::debug!("Loaded configuration from {}", config_path.display());

    let state = AppState::initialize(&config).context("Failed to open the local cache")?;
    let json = cli.json;

    match cli.command {
        Command::ApiKey { action } => match action {
            ApiKeyAction::Set { key } => {
                commands::set_api_key(&state, &key)?;
                println!("API key saved");
            }
            ApiKeyAction::Clear => {
                commands::clear_api_key(&state)?;
                println!("API key removed");
            }
            ApiKeyAction::Status => {
                let present = commands::has_api_key(&state)?;
                println!("{}", if present { "API key set" } else { "No API key" });
            }
        },

        Command::List {
            kind,
            pages,
            offline,
        } => show_window(&state, kind, PagingFlavour::Browse, pages, offline, json).await?,

        Command::Recent {
            kind,
            pages,
            offline,
        } => show_window(&state, kind, PagingFlavour::Recent, pages, offline, json).await?,

        Command::Details { kind, id } => {
            let details = commands::get_details(&state, kind, id).await?;
            if json {
                print_json(&details)?;
            } else {
                println!(
                    "{} ({} {})",
                    details.name.as_deref().unwrap_or("(untitled)"),
                    kind.resource_name(),
                    details.id
                );
                if let Some(deck) = &details.deck {
                    println!("{}", deck);
                }
                if let Some(url) = &details.site_detail_url {
                    println!("{}", url);
                }
            }
        }

        Command::Search {
            query,
            resources,
            offset,
            limit,
        } => {
            let page = commands::search(&state, &query, resources, offset, limit).await?;
            if json {
                print_json(&page)?;
            } else {
                for result in &page.results {
                    println!(
                        "{:>10}  {:>8}  {}",
                        result.kind.resource_name(),
                        result.id,
                        result.name.as_deref().unwrap_or("(untitled)")
                    );
                }
                println!(
                    "-- {} of {} results",
                    page.number_of_page_results, page.number_of_total_results
                );
            }
        }

        Command::Favorites { action } => match action {
            FavoritesAction::List { kind } => {
                print_favorites(&commands::list_favorites(&state, kind)?, json)?
            }
            FavoritesAction::Page { kind, pages } => {
                show_window(&state, kind, PagingFlavour::Favorites, pages, false, json).await?
            }
            FavoritesAction::Add { kind, id } => {
                let favorite = commands::add_favorite(&state, kind, id).await?;
                print_favorites(&[favorite], json)?;
            }
            FavoritesAction::Remove { kind, id } => {
                if commands::remove_favorite(&state, kind, id)? {
                    println!("Removed {} {} from favorites", kind.resource_name(), id);
                } else {
                    println!("{} {} was not a favorite", kind.resource_name(), id);
                }
            }
            FavoritesAction::Sort { kind, order } => {
                commands::set_favorites_sort(&state, kind, order.into())?
            }
        },

        Command::History { action } => match action {
            HistoryAction::List { limit } => {
                let entries = commands::search_history(&state, limit)?;
                if json {
                    print_json(&entries)?;
                } else {
                    for entry in &entries {
                        println!("{}  {}  {}", entry.id, entry.date_added, entry.query);
                    }
                }
            }
            HistoryAction::Delete { id } => {
                if !commands::delete_history_entry(&state, &id)? {
                    log::warn!("No history entry {}", id);
                }
            }
            HistoryAction::Clear => {
                let removed = commands::clear_search_history(&state)?;
                println!("Removed {} entries", removed);
            }
        },

        Command::Prefs { action } => match action {
            PrefsAction::Show { kind } => {
                print_json(&commands::get_list_preferences(&state, kind)?)?
            }
            PrefsAction::Sort { kind, field, desc } => {
                let direction = if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                let preferences =
                    commands::set_list_sort(&state, kind, Some(Sort::new(field.into(), direction)))?;
                print_json(&preferences)?;
            }
            PrefsAction::Name { kind, value } => {
                let preferences =
                    commands::set_list_filters(&state, kind, vec![Filter::Name { value }])?;
                print_json(&preferences)?;
            }
            PrefsAction::Clear { kind } => commands::clear_list_preferences(&state, kind)?,
        },

        Command::Info => {
            let stats = commands::cache_info(&state)?;
            if json {
                print_json(&stats)?;
            } else {
                println!("Config:         {}", config_path.display());
                println!("Database size:  {} bytes", stats.size_bytes);
                println!("Cached items:   {}", stats.cached_item_count);
                println!("Favorites:      {}", stats.favorite_count);
                println!("History:        {}", stats.search_history_count);
            }
        }
    }

    Ok(())
}
