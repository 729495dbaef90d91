use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use crate::api::auth::AuthService;
use crate::api::error::ServiceError;
use crate::config::Config;
use crate::db::{self, seed, Store, StoreError};
use crate::security::{PasswordHasher, TokenService};

#[derive(Parser, Debug)]
#[command(
    name = "job-board",
    about = "Job board REST backend: employers post jobs, applicants apply",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Apply pending database migrations and exit
    Migrate,
    /// Wipe the database and load demo data
    Seed,
    /// Create an administrator account
    CreateAdmin(CreateAdminArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub port: Option<u16>,
    /// Serve from an in-process store instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Args, Debug)]
pub struct CreateAdminArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub name: Option<String>,
}

impl Cli {
    /// Serving is the default when no subcommand is given
    pub fn into_command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Opens the configured store; PostgreSQL stores are migrated first
pub async fn open_store(config: &Config, in_memory: bool) -> Result<Store, CliError> {
    if in_memory {
        info!("Using in-memory store; data is lost on exit");
        return Ok(Store::in_memory());
    }

    let database_url = config.require_database_url().map_err(CliError::Config)?;
    let pool = db::connection::get_connection(database_url, config.max_db_connections)
        .await
        .map_err(StoreError::from)?;
    info!("Database connection pool established");

    let store = Store::postgres(pool);
    store.migrate().await?;
    Ok(store)
}

pub async fn migrate(config: &Config) -> Result<(), CliError> {
    let store = open_store(config, false).await?;
    store.close().await;
    Ok(())
}

pub async fn seed(config: &Config) -> Result<(), CliError> {
    let store = open_store(config, false).await?;
    let summary = seed::run(&store, &PasswordHasher::new()).await;
    store.close().await;

    let summary = summary?;
    info!(
        "Seeded {} users, {} jobs and {} applications (password: {})",
        summary.users,
        summary.jobs,
        summary.applications,
        seed::SEED_PASSWORD
    );
    Ok(())
}

pub async fn create_admin(config: &Config, args: &CreateAdminArgs) -> Result<(), CliError> {
    let store = open_store(config, false).await?;
    let auth = AuthService::new(
        store.clone(),
        PasswordHasher::new(),
        TokenService::new(config.jwt_secret.clone()),
    );
    let created = auth
        .create_admin(args.name.as_deref(), &args.email, &args.password)
        .await;
    store.close().await;

    let user = created?;
    info!("Admin {} created with id {}", user.email, user.id);
    Ok(())
}
