//! Announcement command handlers

use super::{format_timestamp, require_admin};
use crate::services::AccountService;

pub async fn cmd_announce(accounts: &dyn AccountService, text: &str) -> anyhow::Result<()> {
    let session = require_admin(accounts).await?;

    let text = text.trim();
    if text.is_empty() {
        println!("Announcement text cannot be empty.");
        return Ok(());
    }

    accounts.post_announcement(text, &session.name).await?;
    println!("✓ Announcement posted");
    Ok(())
}

pub async fn cmd_announcements(accounts: &dyn AccountService) -> anyhow::Result<()> {
    let announcements = accounts.list_announcements().await?;
    if announcements.is_empty() {
        println!("No announcements yet.");
        return Ok(());
    }

    for announcement in announcements {
        println!(
            "[{}] {}: {}",
            format_timestamp(&announcement.timestamp),
            announcement.by,
            announcement.text
        );
    }

    Ok(())
}
