//! Flatstore CLI - Data directory management tools.
//!
//! # Usage
//!
//! ```bash
//! # Write default data into empty collections
//! fs-cli seed --data-dir data
//!
//! # Create an admin account
//! fs-cli admin create -u manager -e manager@store.kz -p 's3cret'
//!
//! # Print dashboard figures
//! fs-cli stats
//! ```
//!
//! # Commands
//!
//! - `seed` - Seed never-written collections with default data
//! - `admin create` - Create admin accounts
//! - `stats` - Revenue, order count and best sellers

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fs-cli")]
#[command(author, version, about = "Flatstore CLI tools")]
struct Cli {
    /// Directory holding the collection files
    #[arg(long, global = true, env = "FLATSTORE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default data into never-written collections
    Seed,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Print dashboard statistics
    Stats,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Contact email
        #[arg(short, long, default_value = "")]
        email: String,

        /// Password (falls back to `FLATSTORE_ADMIN_PASSWORD`)
        #[arg(short, long)]
        password: Option<String>,
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
        Commands::Seed => {
            commands::seed::run(&cli.data_dir).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                email,
                password,
            } => {
                commands::admin::create_user(&cli.data_dir, &username, &email, password).await?;
            }
        },
        Commands::Stats => {
            commands::stats::run(&cli.data_dir).await?;
        }
    }
    Ok(())
}
