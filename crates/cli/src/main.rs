//! Luxe CLI - database migrations, catalog seeding and back-office setup.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! luxe-cli migrate
//!
//! # Load categories, products and shipping methods
//! luxe-cli seed --file demos/catalog.yaml
//!
//! # Set the back-office password (prompts on stdin when --password is omitted)
//! luxe-cli admin set-password
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `STORE_BUSINESS_ID` - Business to act on (default: 5)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "luxe-cli")]
#[command(author, version, about = "Luxe CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog from a YAML file
    Seed {
        /// Path to the catalog file
        #[arg(short, long)]
        file: String,
    },
    /// Manage back-office access
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Set the shared back-office password
    SetPassword {
        /// New password; read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Seed { file } => {
            commands::seed::catalog(&file).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::SetPassword { password } => {
                commands::admin::set_password(password).await?;
            }
        },
    }
    Ok(())
}
