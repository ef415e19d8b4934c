mod db;
mod discover;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use eventbuzz_core::{SortMode, DEFAULT_RADIUS_METERS};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eventbuzz-cli")]
#[command(about = "EventBuzz event discovery command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List events around a location
    Discover {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters
        #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
        radius: u32,
        /// Category slug, e.g. `music`
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive text matched against title and description
        #[arg(long)]
        query: Option<String>,
        /// distance, date, or popularity
        #[arg(long, default_value_t = SortMode::Distance)]
        sort: SortMode,
        /// Earliest start date (RFC 3339)
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Latest start date (RFC 3339)
        #[arg(long)]
        to: Option<DateTime<Utc>>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Free-text search, from a location or the configured default
    Search {
        query: String,
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
        #[arg(long)]
        radius: Option<u32>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = SortMode::Distance)]
        sort: SortMode,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show one event by id
    Show { id: String },
    /// List event categories
    Categories,
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load the fixture catalog into the database
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = eventbuzz_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Discover {
            lat,
            lng,
            radius,
            category,
            query,
            sort,
            from,
            to,
            limit,
        }) => {
            let args = discover::DiscoverArgs {
                lat,
                lng,
                radius,
                category,
                query,
                sort,
                from,
                to,
                limit,
            };
            discover::run_discover(&config, args).await?;
        }
        Some(Commands::Search {
            query,
            lat,
            lng,
            radius,
            category,
            sort,
            limit,
        }) => {
            let args = discover::SearchArgs {
                query,
                origin: lat.zip(lng),
                radius,
                category,
                sort,
                limit,
            };
            discover::run_search(&config, args).await?;
        }
        Some(Commands::Show { id }) => discover::run_show(&config, &id).await?,
        Some(Commands::Categories) => discover::run_categories(&config).await?,
        Some(Commands::Db { command }) => match command {
            DbCommands::Ping => db::run_db_ping(&config).await?,
            DbCommands::Migrate => db::run_db_migrate(&config).await?,
            DbCommands::Seed => db::run_db_seed(&config).await?,
        },
        None => println!("eventbuzz-cli: run with --help to see available commands"),
    }

    Ok(())
}
