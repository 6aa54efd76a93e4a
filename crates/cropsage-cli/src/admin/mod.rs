//! Admin command handlers.
//!
//! `login` stores the session token in the configured token file; every other
//! admin command reopens the session from that file. Each write is followed
//! by a refetch of both lists, and the refreshed list is printed.

mod problems;
mod stores;

use anyhow::Context;
use clap::{Args, Subcommand};
use cropsage_api::{AdminSession, ApiError, CropSageClient, TokenStore};
use cropsage_core::{AppConfig, StoreRecord};

pub(crate) use problems::{run_problems, ProblemCommands};
pub(crate) use stores::{run_stores_admin, StoreCommands};

/// Sub-commands available under `admin`.
#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Log in and remember the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CROPSAGE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session token
    Logout,
    /// Manage crop problems
    Problems {
        #[command(subcommand)]
        command: ProblemCommands,
    },
    /// Manage stores
    Stores {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

/// Store fields as given on the command line.
#[derive(Debug, Clone, Args)]
pub struct StoreFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
    #[arg(long, default_value = "")]
    pub phone: String,
}

impl StoreFields {
    pub(crate) fn into_record(self, id: Option<i64>) -> StoreRecord {
        StoreRecord {
            id,
            name: self.name,
            address: self.address,
            phone: self.phone,
            latitude: self.lat,
            longitude: self.lng,
        }
    }
}

/// Dispatch an `admin` sub-command.
///
/// # Errors
///
/// Returns an error when not logged in, when the saved token is rejected, or
/// when any backend call fails.
pub(crate) async fn run_admin(config: &AppConfig, command: AdminCommands) -> anyhow::Result<()> {
    let token_store = TokenStore::new(&config.token_path);
    match command {
        AdminCommands::Login { username, password } => {
            let client = CropSageClient::from_config(config)?;
            let session = AdminSession::login(client, &username, &password).await?;
            token_store.save(session.token())?;
            tracing::info!(path = %token_store.path().display(), "admin token saved");
            println!(
                "logged in as {username}: {} problems, {} stores",
                session.problems().len(),
                session.stores().len()
            );
            Ok(())
        }
        AdminCommands::Logout => {
            token_store.clear()?;
            println!("logged out");
            Ok(())
        }
        AdminCommands::Problems { command } => {
            let mut session = open_session(config, &token_store).await?;
            run_problems(&mut session, command).await
        }
        AdminCommands::Stores { command } => {
            let mut session = open_session(config, &token_store).await?;
            run_stores_admin(&mut session, command).await
        }
    }
}

async fn open_session(config: &AppConfig, token_store: &TokenStore) -> anyhow::Result<AdminSession> {
    let token = token_store
        .load()?
        .context("not logged in; run `cropsage admin login` first")?;
    let client = CropSageClient::from_config(config)?;
    match AdminSession::open(client, token).await {
        Err(ApiError::Unauthorized { .. }) => {
            anyhow::bail!("saved session was rejected; run `cropsage admin login` again")
        }
        other => Ok(other?),
    }
}

/// Truncate `text` to `max` characters for table display.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
