pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod security;
pub mod services;
pub mod storage;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use db::SqliteStorage;
use services::{AccountService, StorageAccountService};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.validate()?;

    init_tracing(&config);

    if let Commands::InitConfig = cli.command {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists.");
        }
        return Ok(());
    }

    if let Commands::Strength { password } = &cli.command {
        cli::cmd_strength(password);
        return Ok(());
    }

    let accounts = open_accounts(&config).await?;

    match cli.command {
        Commands::Register {
            email,
            password,
            name,
        } => cli::cmd_register(accounts.as_ref(), &email, &password, &name.join(" ")).await,
        Commands::Login { email, password } => {
            cli::cmd_login(accounts.as_ref(), &email, &password).await
        }
        Commands::Logout => cli::cmd_logout(accounts.as_ref()).await,
        Commands::Whoami => cli::cmd_whoami(accounts.as_ref()).await,
        Commands::Users => cli::cmd_users(accounts.as_ref()).await,
        Commands::Disable { email } => cli::cmd_set_disabled(accounts.as_ref(), &email, true).await,
        Commands::Enable { email } => cli::cmd_set_disabled(accounts.as_ref(), &email, false).await,
        Commands::Announce { text } => cli::cmd_announce(accounts.as_ref(), &text.join(" ")).await,
        Commands::Announcements => cli::cmd_announcements(accounts.as_ref()).await,
        Commands::Activity { limit } => cli::cmd_activity(accounts.as_ref(), limit).await,
        Commands::Stats => cli::cmd_stats(accounts.as_ref()).await,
        Commands::InitConfig | Commands::Strength { .. } => Ok(()),
    }
}

/// Opens the configured database and makes sure the admin account exists.
pub async fn open_accounts(config: &Config) -> anyhow::Result<Arc<dyn AccountService>> {
    let storage = SqliteStorage::new(&config.general.database_path)
        .await
        .with_context(|| format!("Failed to open {}", config.general.database_path))?;
    storage
        .ping()
        .await
        .context("Database did not answer after opening")?;

    let accounts = StorageAccountService::new(Arc::new(storage), config);
    if accounts.bootstrap_admin().await? {
        info!(
            "Created admin account {}; change its password",
            config.bootstrap.admin_email
        );
    }

    Ok(Arc::new(accounts))
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
