//! Shopfront CLI - Local store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Write the seed catalog and categories (refuses to overwrite)
//! shopfront seed
//!
//! # Overwrite existing products and categories with the seed data
//! shopfront seed --force
//!
//! # Delete every document so the next start begins fresh
//! shopfront reset
//!
//! # List products and orders
//! shopfront products
//! shopfront orders
//!
//! # Move an order to a new status
//! shopfront status ORD-7K2M9QXA completed
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPFRONT_DATA_DIR` - Local store directory (default: ./data)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shopfront_storefront::store::LocalStore;

mod commands;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    /// Local store directory
    #[arg(long, global = true, env = "SHOPFRONT_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the seed products and categories
    Seed {
        /// Overwrite existing products and categories
        #[arg(short, long)]
        force: bool,
    },
    /// Delete every shop document
    Reset,
    /// List the product catalog
    Products,
    /// List orders, newest first
    Orders,
    /// Change an order's status
    Status {
        /// Order number (e.g. ORD-7K2M9QXA)
        number: String,

        /// New status (`pending`, `completed`, `cancelled`)
        status: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads SHOPFRONT_DATA_DIR
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = LocalStore::new(cli.data_dir);

    match cli.command {
        Commands::Seed { force } => commands::store::seed(&store, force).await?,
        Commands::Reset => commands::store::reset(&store).await?,
        Commands::Products => commands::products::list(&store).await?,
        Commands::Orders => commands::orders::list(&store).await?,
        Commands::Status { number, status } => {
            commands::orders::set_status(&store, &number, &status).await?;
        }
    }
    Ok(())
}
