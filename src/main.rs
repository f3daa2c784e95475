use std::collections::BTreeSet;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use futures_util::future::join_all;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use recipe_deck::application::{CardDeck, RecipeCatalog, SortOrder};
use recipe_deck::application::services::LOAD_ERROR_MESSAGE;
use recipe_deck::domain::{EventSink, ImageEvent, ImageFetcherPort, ImageSource};
use recipe_deck::infrastructure::config::{Command, FavoritesAction, SortArg};
use recipe_deck::infrastructure::{
    AppConfig, CliArgs, ConfigStore, FavoritesStore, HttpImageFetcher, ImageCache, RecipeApiClient,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let store = ConfigStore::new().wrap_err("Failed to locate config directory")?;
    let mut config = store
        .load_config(args.config.as_deref())
        .wrap_err("Failed to load config")?;
    config.merge_with_args(args);
    Ok(config)
}

/// Shared services built once per process.
struct Context {
    config: AppConfig,
    cache: Arc<ImageCache>,
    fetcher: Arc<dyn ImageFetcherPort>,
    events: mpsc::UnboundedReceiver<ImageEvent>,
}

impl Context {
    fn new(config: AppConfig) -> Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();
        let cache = Arc::new(config.image_cache().with_events(EventSink::new(tx)));
        let fetcher: Arc<dyn ImageFetcherPort> = Arc::new(
            HttpImageFetcher::new(config.request_timeout())
                .wrap_err("Failed to create image fetcher")?,
        );
        Ok(Self {
            config,
            cache,
            fetcher,
            events,
        })
    }

    async fn catalog(&self) -> Result<RecipeCatalog> {
        let source = Arc::new(RecipeApiClient::new(
            self.config.recipes_endpoint.clone(),
            self.config.request_timeout(),
        )?);
        let mut catalog = RecipeCatalog::new(source);
        catalog.refresh().await.wrap_err(LOAD_ERROR_MESSAGE)?;
        Ok(catalog)
    }

    fn favorites(&self) -> Result<FavoritesStore> {
        let path = self
            .config
            .effective_favorites_path()
            .ok_or_else(|| eyre!("No favorites location available; pass --favorites-path"))?;
        Ok(FavoritesStore::open(path)?)
    }

    fn drain_events(&mut self) -> EventTally {
        let mut tally = EventTally::default();
        while let Ok(event) = self.events.try_recv() {
            tally.record(&event);
        }
        tally
    }
}

#[derive(Debug, Default)]
struct EventTally {
    fetched: usize,
    joined: usize,
    hits: usize,
    persist_failures: usize,
}

impl EventTally {
    fn record(&mut self, event: &ImageEvent) {
        match event {
            ImageEvent::Fetched(_) => self.fetched += 1,
            ImageEvent::FetchJoined(_) => self.joined += 1,
            ImageEvent::MemoryHit(_) | ImageEvent::DiskHit(_) => self.hits += 1,
            ImageEvent::PersistFailed { key, message } => {
                warn!(key = %key, error = %message, "Image not persisted");
                self.persist_failures += 1;
            }
            _ => {}
        }
    }
}

async fn run(command: Command, mut ctx: Context) -> Result<()> {
    match command {
        Command::List {
            search,
            sort,
            cuisine,
        } => {
            let mut catalog = ctx.catalog().await?;
            catalog.set_search(search.unwrap_or_default());
            catalog.set_sort(match sort {
                SortArg::Asc => SortOrder::Ascending,
                SortArg::Desc => SortOrder::Descending,
            });
            let shown: Vec<_> = catalog
                .displayed()
                .into_iter()
                .filter(|r| {
                    cuisine
                        .as_deref()
                        .is_none_or(|c| r.cuisine.eq_ignore_ascii_case(c))
                })
                .collect();
            if shown.is_empty() {
                println!("No recipes found.");
            }
            for recipe in shown {
                println!("{}  {} ({})", recipe.id, recipe.name, recipe.cuisine);
            }
        }
        Command::Cuisines => {
            let catalog = ctx.catalog().await?;
            for cuisine in catalog.cuisines() {
                println!("{cuisine} ({})", catalog.recipes_in_cuisine(cuisine).len());
            }
        }
        Command::Favorites { action } => {
            let mut store = ctx.favorites()?;
            match action.unwrap_or(FavoritesAction::List) {
                FavoritesAction::List => {
                    let catalog = ctx.catalog().await?;
                    let favorites = catalog.favorites(&store);
                    if favorites.is_empty() {
                        println!("No favorites yet.");
                    }
                    for recipe in &favorites {
                        println!("{}  {} ({})", recipe.id, recipe.name, recipe.cuisine);
                    }
                    let missing = store.len().saturating_sub(favorites.len());
                    if missing > 0 {
                        println!("{missing} favorite(s) no longer listed upstream.");
                    }
                }
                FavoritesAction::Toggle { id } => {
                    if store.toggle(id)? {
                        println!("Added {id} to favorites.");
                    } else {
                        println!("Removed {id} from favorites.");
                    }
                }
                FavoritesAction::Clear => {
                    store.clear()?;
                    println!("Favorites cleared.");
                }
            }
        }
        Command::Deck => {
            let catalog = ctx.catalog().await?;
            let store = ctx.favorites()?;
            let mut deck = CardDeck::new();
            deck.load(catalog.recipes(), &store, &mut rand::thread_rng());
            if deck.is_empty() {
                println!("Nothing left to swipe.");
            }
            for (position, recipe) in deck.cards().iter().rev().enumerate() {
                println!("{:>3}. {} ({})", position + 1, recipe.name, recipe.cuisine);
            }
        }
        Command::Image { url } => {
            let loaded = ctx
                .cache
                .fetch_through(&url, Arc::clone(&ctx.fetcher))
                .await
                .wrap_err_with(|| format!("Failed to load {url}"))?;
            println!(
                "{}x{} from {} (key {})",
                loaded.image.width(),
                loaded.image.height(),
                loaded.source,
                loaded.key
            );
            if loaded.source == ImageSource::Network {
                println!("Stored at {}", ctx.cache.disk().path_for(&loaded.key).display());
            }
        }
        Command::Prefetch { large } => {
            let catalog = ctx.catalog().await?;
            let urls: BTreeSet<&str> = catalog
                .recipes()
                .iter()
                .filter_map(|r| r.photo_url(large))
                .collect();
            info!(count = urls.len(), large, "Prefetching recipe photos");

            let results = join_all(
                urls.iter()
                    .map(|url| ctx.cache.fetch_through(url, Arc::clone(&ctx.fetcher))),
            )
            .await;
            let failed = results.iter().filter(|r| r.is_err()).count();
            let tally = ctx.drain_events();
            println!(
                "{} photos: {} fetched, {} already cached, {} failed",
                urls.len(),
                tally.fetched,
                tally.hits,
                failed
            );
            if tally.joined > 0 {
                println!("{} requests shared an in-flight download.", tally.joined);
            }
            if tally.persist_failures > 0 {
                println!("{} could not be written to disk.", tally.persist_failures);
            }
            let (files, bytes) = ctx.cache.disk().usage().await;
            println!("Disk cache: {files} files, {bytes} bytes");
        }
        Command::ClearCache => {
            ctx.cache.clear().await;
            println!("Cleared {}", ctx.cache.disk().dir().display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = recipe_deck::VERSION, "Starting {}", recipe_deck::NAME);

    let ctx = Context::new(config)?;
    run(args.command, ctx).await
}
