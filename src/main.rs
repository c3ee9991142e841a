//! qbank-cli - AP CS Question Bank client
//!
//! Signs in against the question bank API and keeps the session tokens
//! cached between runs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qbank_cli::api::{self, ApiClient};
use qbank_cli::auth::{self, TokenCache};
use qbank_cli::config::Settings;
use qbank_cli::storage::FileStore;

#[derive(Parser)]
#[command(name = "qbank-cli")]
#[command(about = "Command-line client for the AP CS Question Bank", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Token store file (defaults to the platform data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Finish signing in with the URL the identity provider redirected to
    Login {
        /// Callback URL, e.g. https://qbank.example.com/auth/callback?token=...
        callback_url: String,
    },

    /// Log out and clear cached credentials
    Logout,

    /// Show which credentials are cached
    Status,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Show current user info (verify auth works)
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let settings = Settings::load()?;
    let store_path = match cli.store {
        Some(path) => path,
        None => FileStore::default_path()?,
    };
    let store = FileStore::open(store_path).context("Failed to open token store")?;
    let tokens = TokenCache::new(store, &settings.api_base);

    match cli.command {
        Commands::Login { callback_url } => {
            tracing::info!("Completing login...");
            auth::login(&tokens, &settings, &callback_url)?;
        }
        Commands::Logout => {
            tracing::info!("Logging out...");
            auth::logout(&tokens)?;
        }
        Commands::Status => {
            auth::status(&tokens);
        }
        Commands::Refresh => {
            auth::refresh(&tokens).await?;
        }
        Commands::Whoami => {
            let client = ApiClient::new(&settings.api_base, &tokens);
            api::whoami(&client).await?;
        }
    }

    Ok(())
}
