use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use servimarket_application::AppContext;
use servimarket_core::session::Role;
use servimarket_infrastructure::ConfigService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "servimarket")]
#[command(about = "Servimarket CLI - local services marketplace", long_about = None)]
struct Cli {
    /// Keep config.toml and storage.json in this directory
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a demo account
    Login {
        email: String,
        #[arg(long)]
        password: String,
        /// client or business
        #[arg(long, default_value = "client")]
        role: Role,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user's profile
    Whoami,
    /// Update fields of the signed-in user's profile
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// List service categories
    Categories,
    /// List services in a category
    Services { category_id: String },
    /// Show a business profile
    Business { business_id: String },
    /// List the signed-in client's hired services
    Hired,
    /// Show which screen stack the app would mount
    Route,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = ConfigService::new(cli.base_dir.as_deref());
    let config = config_service
        .get_config()
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match config_service.paths().config_file() {
        Ok(path) => tracing::debug!("[CLI] Config file: {}", path.display()),
        Err(e) => tracing::warn!("[CLI] Config file location unknown: {}", e),
    }

    let storage_file = config_service
        .storage_file()
        .context("Failed to resolve storage file")?;
    tracing::debug!("[CLI] Storage file: {}", storage_file.display());
    let context = AppContext::start(&config, storage_file).await;

    match cli.command {
        Commands::Login {
            email,
            password,
            role,
        } => commands::auth::login(&context, &email, &password, role).await?,
        Commands::Logout => commands::auth::logout(&context).await,
        Commands::Whoami => commands::auth::whoami(&context)?,
        Commands::Update {
            name,
            email,
            phone,
            avatar,
        } => commands::auth::update(&context, name, email, phone, avatar).await?,
        Commands::Categories => commands::catalog::categories(&context),
        Commands::Services { category_id } => commands::catalog::services(&context, &category_id),
        Commands::Business { business_id } => {
            commands::catalog::business(&context, &business_id)?
        }
        Commands::Hired => commands::catalog::hired(&context)?,
        Commands::Route => commands::auth::route(&context),
    }

    Ok(())
}
