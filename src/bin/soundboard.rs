//! soundboard: command-line front end for the soundboard backend.
//!
//! Resolves animal images through the cache, manages favorites and prints
//! usage stats. Audio is not played; `play` only records the interaction.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use soundboard::config::Config;
use soundboard::{
    AnimalCatalog, FetchOptions, FileStore, ManualConnectivity, SilentPlayer, SizeVariant,
    Soundboard,
};

/// Animal soundboard CLI
#[derive(Parser)]
#[command(name = "soundboard")]
#[command(version)]
#[command(about = "Animal soundboard: images, favorites and stats")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat the network as unavailable (every lookup falls back).
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the animal catalog
    Catalog {
        /// Only animals from this continent
        #[arg(long)]
        continent: Option<String>,
    },

    /// Resolve an image for an animal
    Image {
        /// Animal identifier (e.g. "lion")
        animal: String,
        /// Size variant: small, medium, large, original
        #[arg(short, long, default_value = "medium")]
        size: SizeVariant,
        /// Fetch a gallery of up to five photos
        #[arg(long)]
        gallery: bool,
    },

    /// Free-text photo search
    Search {
        /// Search query
        query: String,
    },

    /// Resolve images for the whole catalog and print cache metrics
    Preload,

    /// Record a play of an animal's sound
    Play {
        /// Animal identifier
        animal: String,
    },

    /// Toggle an animal as favorite
    Favorite {
        /// Animal identifier
        animal: String,
    },

    /// Show favorites
    Favorites,

    /// Show usage stats
    Stats,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let connectivity = Arc::new(ManualConnectivity::new(!args.offline));
    let images = Arc::new(config.build_cache(connectivity)?);
    let store = Arc::new(FileStore::open(config.state_path()));
    let board = Soundboard::new(
        AnimalCatalog::default(),
        images.clone(),
        store,
        Arc::new(SilentPlayer),
    );

    match args.command {
        Command::Catalog { continent } => {
            let continent = continent.unwrap_or_else(|| "All".to_string());
            for animal in board.catalog().on_continent(&continent) {
                let star = if board.favorites().contains(&animal.id) { "*" } else { " " };
                println!(
                    "{star} {} {:<10} {:<22} {}",
                    animal.emoji, animal.id, animal.name, animal.continent
                );
            }
        }
        Command::Image {
            animal,
            size,
            gallery,
        } => {
            let options = FetchOptions::new()
                .size(size)
                .multiple(gallery)
                .orientation(config.images.orientation);
            let result = images.fetch(&animal, &options).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Search { query } => {
            let options = FetchOptions::new().orientation(config.images.orientation);
            let photos = images.search(&query, &options).await?;
            println!("{}", serde_json::to_string_pretty(&photos)?);
        }
        Command::Preload => {
            let results = board.preload_images().await;
            for (id, result) in board.catalog().ids().iter().zip(&results) {
                let kind = if result.is_fallback() { "fallback" } else { "photo" };
                println!("{id:<10} {kind:<8} {}", result.primary().title);
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&images.metrics_snapshot())?
            );
        }
        Command::Play { animal } => {
            let animal = board.play(&animal).await?;
            println!("{} {} ({})", animal.emoji, animal.name, animal.audio);
        }
        Command::Favorite { animal } => {
            let now = board.toggle_favorite(&animal);
            let verb = if now { "added to" } else { "removed from" };
            println!("{animal} {verb} favorites");
        }
        Command::Favorites => {
            for animal in board.favorite_animals() {
                println!("{} {}", animal.emoji, animal.name);
            }
        }
        Command::Stats => {
            println!("{}", serde_json::to_string_pretty(&board.stats())?);
        }
    }

    Ok(())
}
