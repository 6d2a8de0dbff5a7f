//! Storeboard CLI - Database migrations and store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! sb-cli migrate
//!
//! # Create a store and list the owner's stores
//! sb-cli store create -n "Acme Outfitters" -o user_2abc
//! sb-cli store list -o user_2abc
//!
//! # Fill a store with demo catalog data
//! sb-cli seed -s <store-id> -o user_2abc
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `store create` / `store list` - Manage stores
//! - `seed` - Seed a store with a demo catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use storeboard_core::{StoreId, UserId};

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Storeboard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Seed a store with a demo catalog
    Seed {
        /// Store to fill
        #[arg(short, long)]
        store: StoreId,

        /// Identity that owns the store
        #[arg(short, long)]
        owner: UserId,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Create a new store
    Create {
        /// Store display name
        #[arg(short, long)]
        name: String,

        /// Identity that will own the store
        #[arg(short, long)]
        owner: UserId,
    },
    /// List the stores an identity owns
    List {
        /// Owning identity
        #[arg(short, long)]
        owner: UserId,
    },
}

#[tokio::main]
async fn main() {
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
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Store { action } => match action {
            StoreAction::Create { name, owner } => {
                commands::store::create(&name, &owner).await?;
            }
            StoreAction::List { owner } => {
                commands::store::list(&owner).await?;
            }
        },
        Commands::Seed { store, owner } => {
            commands::seed::demo_catalog(store, &owner).await?;
        }
    }
    Ok(())
}
