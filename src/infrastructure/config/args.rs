use super::app_config::LogLevel;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(
    name = "recipe-deck",
    version,
    about = "Browse recipes, keep favorites, and cache recipe photos",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Recipes JSON endpoint.
    #[arg(long, value_name = "URL", env = "RECIPES_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Base directory for the image cache.
    #[arg(long, value_name = "PATH", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Favorites file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub favorites_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List recipes, optionally filtered and sorted.
    List {
        /// Case-insensitive match against name or cuisine.
        #[arg(short, long)]
        search: Option<String>,
        /// Sort order by name.
        #[arg(long, value_enum, default_value_t = SortArg::Asc)]
        sort: SortArg,
        /// Only show one cuisine.
        #[arg(long)]
        cuisine: Option<String>,
    },
    /// List the distinct cuisines.
    Cuisines,
    /// Show or edit favorites.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// Print a shuffled deck of recipes that are not favorites yet.
    Deck,
    /// Load one image through the cache and report where it came from.
    Image {
        /// Image URL.
        url: String,
    },
    /// Warm the image cache with every recipe photo.
    Prefetch {
        /// Fetch the large photos instead of the thumbnails.
        #[arg(long)]
        large: bool,
    },
    /// Delete every cached image.
    ClearCache,
}

#[derive(Debug, Clone, Subcommand)]
pub enum FavoritesAction {
    /// List favorite recipes.
    List,
    /// Add or remove one recipe.
    Toggle {
        /// Recipe UUID.
        id: Uuid,
    },
    /// Remove every favorite.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// A–Z.
    Asc,
    /// Z–A.
    Desc,
}
