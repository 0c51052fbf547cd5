//! FlexiMart catalog CLI
//!
//! Usage:
//!   fxm seed                          Load the sample catalog
//!   fxm search Electronics --max-price 50000
//!   fxm top-rated --min-rating 4.0
//!   fxm review ELEC001 --user U999 --rating 4 --comment "Good value"
//!   fxm stats                         Average price per category
//!   fxm demo                          Run the full operation sequence
//!
//! The connection URI is taken from --uri, then the FLEXIMART_URI
//! environment variable, then a localhost default.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use fleximart_catalog::{samples, Connection, ProductStore, Review};

const DEFAULT_URI: &str = "mongodb://localhost:27017/fleximart";

#[derive(Parser)]
#[command(name = "fxm")]
#[command(about = "FlexiMart product catalog CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// MongoDB connection URI
    #[arg(long, global = true)]
    uri: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the sample catalog into the products collection
    Seed,
    /// List products in a category under a price ceiling
    Search {
        /// Product category to search
        #[arg(default_value = "Electronics")]
        category: String,

        /// Exclusive price ceiling
        #[arg(long, default_value_t = 50000.0)]
        max_price: f64,
    },
    /// List products whose average review rating meets a minimum
    TopRated {
        /// Minimum average rating (1-5 scale)
        #[arg(long, default_value_t = 4.0)]
        min_rating: f64,
    },
    /// Append a review to a product
    Review {
        /// Catalog id of the product (e.g. ELEC001)
        product_id: String,

        /// Reviewer user id
        #[arg(long)]
        user: String,

        /// Rating on the 1-5 scale
        #[arg(long)]
        rating: i32,

        /// Review text
        #[arg(long)]
        comment: String,
    },
    /// Show average price and product count per category
    Stats,
    /// Run the full canned operation sequence against the catalog
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let uri = cli
        .uri
        .or_else(|| std::env::var("FLEXIMART_URI").ok())
        .unwrap_or_else(|| DEFAULT_URI.to_string());

    let connection = Connection::new(&uri)
        .await
        .context("failed to configure MongoDB connection")?;
    connection
        .ping()
        .await
        .with_context(|| format!("MongoDB server unreachable ({})", connection.database_name()))?;
    info!(database = connection.database_name(), "connected");

    let store = ProductStore::new(&connection)?;

    match cli.command {
        Commands::Seed => seed(&store).await?,
        Commands::Search {
            category,
            max_price,
        } => {
            let rows = store.find_by_category_under(&category, max_price).await?;
            print_rows(&rows)?;
        }
        Commands::TopRated { min_rating } => {
            let rows = store.top_rated(min_rating).await?;
            print_rows(&rows)?;
        }
        Commands::Review {
            product_id,
            user,
            rating,
            comment,
        } => {
            let review = Review::new(user, rating, comment, Utc::now())?;
            if store.add_review(&product_id, &review).await? {
                println!("review added to {}", product_id);
            } else {
                warn!(product_id = %product_id, "no product matched; review not added");
            }
        }
        Commands::Stats => {
            let rows = store.category_stats().await?;
            print_rows(&rows)?;
        }
        Commands::Demo => demo(&store).await?,
    }

    Ok(())
}

async fn seed(store: &ProductStore) -> Result<()> {
    store.ensure_indexes().await?;

    let batch = samples::sample_products();
    let ids = store.load_products(&batch).await?;
    println!("seeded {} products", ids.len());

    Ok(())
}

/// Replays the original catalog walkthrough: bulk load, filtered search,
/// review analysis, review append, category statistics.
async fn demo(store: &ProductStore) -> Result<()> {
    store.ensure_indexes().await?;

    // Operation 1: bulk load (skipped when the catalog is already seeded,
    // the unique product_id index would reject the batch)
    if store.count_products().await? == 0 {
        let ids = store.load_products(&samples::sample_products()).await?;
        println!("operation 1: loaded {} products", ids.len());
    } else {
        warn!("catalog already seeded; skipping bulk load");
    }

    // Operation 2: Electronics under the price ceiling
    let summaries = store.find_by_category_under("Electronics", 50000.0).await?;
    println!("operation 2: {} products in range", summaries.len());
    print_rows(&summaries)?;

    // Operation 3: products with average rating >= 4.0
    let rated = store.top_rated(4.0).await?;
    println!("operation 3: {} products rated >= 4.0", rated.len());
    print_rows(&rated)?;

    // Operation 4: append a review to ELEC001
    let review = Review::new("U999", 4, "Good value", Utc::now())?;
    let modified = store.add_review("ELEC001", &review).await?;
    println!("operation 4: review added = {}", modified);
    if let Some(product) = store.find_product("ELEC001").await? {
        let count = product.reviews.map(|r| r.len()).unwrap_or(0);
        info!(product_id = "ELEC001", reviews = count, "review state");
    }

    // Operation 5: average price per category
    let stats = store.category_stats().await?;
    println!("operation 5: {} categories", stats.len());
    print_rows(&stats)?;

    println!("all operations completed");

    Ok(())
}

fn print_rows<T: Serialize>(rows: &[T]) -> Result<()> {
    for row in rows {
        println!("{}", serde_json::to_string(row)?);
    }

    Ok(())
}

/// Initialize logging based on log level
fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .ok();
}
