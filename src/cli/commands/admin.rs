//! Admin console command handlers

use super::{format_timestamp, require_admin};
use crate::services::{AccountError, AccountService};

pub async fn cmd_users(accounts: &dyn AccountService) -> anyhow::Result<()> {
    require_admin(accounts).await?;

    let users = accounts.list_users().await?;
    if users.is_empty() {
        println!("No accounts.");
        return Ok(());
    }

    println!("Accounts ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let status = if user.disabled { "disabled" } else { "active" };
        let credential = match &user.credential {
            Some(c) if c.is_legacy() => "legacy",
            Some(_) => "salted",
            None => "missing",
        };
        let last_login = user
            .last_login_at
            .as_ref()
            .map_or_else(|| "never".to_string(), format_timestamp);

        println!("{} <{}> [{}]", user.name, user.email, user.role);
        println!(
            "  Status: {} | Credential: {} | Created: {} | Last login: {}",
            status,
            credential,
            format_timestamp(&user.created_at),
            last_login
        );
    }

    Ok(())
}

pub async fn cmd_set_disabled(
    accounts: &dyn AccountService,
    email: &str,
    disabled: bool,
) -> anyhow::Result<()> {
    let session = require_admin(accounts).await?;

    if disabled && session.email == email {
        println!("You cannot disable your own account.");
        return Ok(());
    }

    match accounts.set_disabled(email, disabled).await {
        Ok(()) => {
            let verb = if disabled { "Disabled" } else { "Enabled" };
            println!("✓ {verb} {email}");
            Ok(())
        }
        Err(AccountError::NotFound) => {
            println!("No account with email {email}.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn cmd_activity(accounts: &dyn AccountService, limit: usize) -> anyhow::Result<()> {
    require_admin(accounts).await?;

    let entries = accounts.list_activity(limit).await?;
    if entries.is_empty() {
        println!("No activity recorded.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} {:<28} {}",
            format_timestamp(&entry.timestamp),
            entry.email,
            entry.action
        );
    }

    Ok(())
}

pub async fn cmd_stats(accounts: &dyn AccountService) -> anyhow::Result<()> {
    require_admin(accounts).await?;

    let stats = accounts.stats().await?;
    println!("Users:         {}", stats.total_users);
    println!("  disabled:    {}", stats.disabled_users);
    println!("  admins:      {}", stats.admins);
    println!("Announcements: {}", stats.announcements);
    println!("Activity:      {}", stats.activity_entries);

    Ok(())
}
