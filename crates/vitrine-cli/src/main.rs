use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use vitrine_client::{ClientConfig, HttpFetcher, Museum, build_registry};
use vitrine_core::{Aggregator, BrowseFeed, CollectionStore};
use vitrine_store::{FileStore, StoreConfig};

type LiveAggregator = Aggregator<Museum<HttpFetcher>>;

#[derive(Parser)]
#[command(name = "vitrine", version, about = "Search and collect artworks across museum APIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every configured museum, or one with --museum
    Search {
        /// Free-text query
        query: String,

        /// Restrict to one museum (e.g. "aic", "met", "smithsonian", "rijks")
        #[arg(short, long)]
        museum: Option<String>,

        /// Maximum results per museum
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show one artwork by id (e.g. "aic-27992", "rijks-SK-C-5")
    Show {
        id: String,
    },

    /// Walk the browsing feed for a number of pages
    Browse {
        /// Browse term index to start from
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Results requested per museum per page
        #[arg(short, long, default_value_t = 20)]
        batch_size: usize,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,

        /// Restrict to one museum
        #[arg(short, long)]
        museum: Option<String>,
    },

    /// A shuffled sample across broad terms, paged
    Sample {
        /// Artworks per page
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Manage the saved collection
    Collection {
        /// Directory holding the collection (overrides VITRINE_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        #[command(subcommand)]
        action: CollectionAction,
    },
}

#[derive(Subcommand)]
enum CollectionAction {
    /// List saved artworks
    List,
    /// Fetch an artwork and save it
    Add { id: String },
    /// Remove an artwork by id
    Remove { id: String },
    /// Remove every saved artwork
    Clear,
    /// Check whether an artwork is saved
    Contains { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vitrine=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            museum,
            limit,
        } => {
            let aggregator = connect()?;
            cmd_search(&aggregator, &query, museum.as_deref(), limit).await?;
        }
        Commands::Show { id } => {
            let aggregator = connect()?;
            cmd_show(&aggregator, &id).await?;
        }
        Commands::Browse {
            start,
            batch_size,
            pages,
            museum,
        } => {
            let aggregator = connect()?;
            cmd_browse(&aggregator, start, batch_size, pages, museum.as_deref()).await?;
        }
        Commands::Sample { limit, page } => {
            let aggregator = connect()?;
            let sample = aggregator.sample_collection(limit, page).await;
            print_json(&sample)?;
        }
        Commands::Collection { data_dir, action } => {
            let collection = open_collection(data_dir)?;
            cmd_collection(collection, action).await?;
        }
    }

    Ok(())
}

/// Build the aggregator from environment configuration.
fn connect() -> Result<LiveAggregator> {
    let config = ClientConfig::from_env().context("Invalid client configuration")?;
    let registry = build_registry(&config).context("Failed to set up museum clients")?;
    Ok(Aggregator::new(registry))
}

fn open_collection(data_dir: Option<PathBuf>) -> Result<CollectionStore<FileStore>> {
    let config = match data_dir {
        Some(data_dir) => StoreConfig { data_dir },
        None => StoreConfig::from_env().context("Invalid store configuration")?,
    };
    let store = FileStore::open(&config)
        .with_context(|| format!("Failed to open store at {}", config.data_dir.display()))?;
    Ok(CollectionStore::new(store))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_search(
    aggregator: &LiveAggregator,
    query: &str,
    museum: Option<&str>,
    limit: usize,
) -> Result<()> {
    let results = match museum {
        Some(museum) => aggregator
            .search_museum(query, museum, limit)
            .await
            .with_context(|| format!("Search of {museum} failed"))?,
        None => aggregator.search_all(query, limit).await,
    };

    tracing::info!(query, count = results.len(), "Search complete");
    print_json(&results)
}

async fn cmd_show(aggregator: &LiveAggregator, id: &str) -> Result<()> {
    match aggregator.get_details(id).await? {
        Some(artwork) => print_json(&artwork),
        None => {
            println!("Artwork not found");
            Ok(())
        }
    }
}

async fn cmd_browse(
    aggregator: &LiveAggregator,
    start: usize,
    batch_size: usize,
    pages: usize,
    museum: Option<&str>,
) -> Result<()> {
    let mut feed = BrowseFeed::starting_at(start);

    for _ in 0..pages {
        if !feed.has_more() {
            break;
        }
        let term_index = feed.next_term_index();
        let page = match museum {
            Some(museum) => aggregator
                .browse_museum_page(term_index, batch_size, museum)
                .await?,
            None => aggregator.browse_collection_page(term_index, batch_size).await,
        };
        let fresh = feed.absorb(page);
        tracing::info!(term_index, new = fresh.len(), "Loaded browse page");
    }

    print_json(&serde_json::json!({
        "artworks": feed.artworks(),
        "nextTermIndex": feed.next_term_index(),
        "hasMore": feed.has_more(),
    }))
}

async fn cmd_collection(collection: CollectionStore<FileStore>, action: CollectionAction) -> Result<()> {
    match action {
        CollectionAction::List => {
            let entries = collection.get();
            tracing::info!(count = entries.len(), "Collection loaded");
            print_json(&entries)
        }
        CollectionAction::Add { id } => {
            let aggregator = connect()?;
            let Some(artwork) = aggregator.get_details(&id).await? else {
                bail!("Artwork not found: {id}");
            };
            print_json(&collection.add(artwork))
        }
        CollectionAction::Remove { id } => print_json(&collection.remove(&id)),
        CollectionAction::Clear => print_json(&collection.clear()),
        CollectionAction::Contains { id } => print_json(&collection.contains(&id)),
    }
}
