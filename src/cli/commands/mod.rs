mod account;
mod admin;
mod announcements;

pub use account::{cmd_login, cmd_logout, cmd_register, cmd_strength, cmd_whoami};
pub use admin::{cmd_activity, cmd_set_disabled, cmd_stats, cmd_users};
pub use announcements::{cmd_announce, cmd_announcements};

use crate::models::Session;
use crate::services::AccountService;

/// The signed-in session, if it belongs to an administrator.
async fn require_admin(accounts: &dyn AccountService) -> anyhow::Result<Session> {
    match accounts.current_session().await? {
        Some(session) if session.is_admin() => Ok(session),
        Some(session) => anyhow::bail!("{} is not an administrator", session.email),
        None => anyhow::bail!("Not signed in. Use: portal login <email> <password>"),
    }
}

fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
