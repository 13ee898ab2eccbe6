//! End-to-end flows over the SQLite backend and the CLI handlers.

use std::sync::Arc;

use portal_accounts::cli;
use portal_accounts::config::Config;
use portal_accounts::db::SqliteStorage;
use portal_accounts::services::{AccountService, StorageAccountService};

async fn spawn_accounts(db_url: &str) -> Arc<dyn AccountService> {
    let mut config = Config::default();
    config.general.database_path = db_url.to_string();

    portal_accounts::open_accounts(&config)
        .await
        .expect("failed to open account store")
}

#[tokio::test]
async fn test_open_accounts_bootstraps_admin() {
    let accounts = spawn_accounts("sqlite::memory:").await;

    let users = accounts.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "admin@portal");
    assert!(users[0].is_admin());
}

#[tokio::test]
async fn test_accounts_survive_restart() {
    let dir = std::env::temp_dir().join(format!("portal-test-{}", uuid::Uuid::new_v4()));
    let db_url = format!("sqlite:{}", dir.join("portal.db").display());

    {
        let accounts = spawn_accounts(&db_url).await;
        accounts
            .register("ada@alumni.example", "Password1", "Ada")
            .await
            .unwrap();
        let user = accounts
            .authenticate("ada@alumni.example", "Password1")
            .await
            .unwrap();
        accounts.start_session(&user).await.unwrap();
        accounts
            .post_announcement("Welcome back", "Ada")
            .await
            .unwrap();
    }

    let accounts = spawn_accounts(&db_url).await;

    // bootstrap ran again without duplicating the admin
    let users = accounts.list_users().await.unwrap();
    let emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, ["admin@portal", "ada@alumni.example"]);

    let session = accounts.current_session().await.unwrap().unwrap();
    assert_eq!(session.email, "ada@alumni.example");
    assert_eq!(accounts.list_announcements().await.unwrap().len(), 1);
    assert!(
        accounts
            .authenticate("ada@alumni.example", "Password1")
            .await
            .is_ok()
    );

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_store_over_sqlite_directly() {
    let storage = SqliteStorage::new("sqlite::memory:").await.unwrap();
    let accounts = StorageAccountService::new(Arc::new(storage), &Config::default());

    assert!(accounts.bootstrap_admin().await.unwrap());
    assert!(!accounts.bootstrap_admin().await.unwrap());
    assert_eq!(accounts.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_commands_require_admin_session() {
    let accounts = spawn_accounts("sqlite::memory:").await;

    assert!(cli::cmd_users(accounts.as_ref()).await.is_err());
    assert!(cli::cmd_stats(accounts.as_ref()).await.is_err());

    cli::cmd_register(accounts.as_ref(), "ada@alumni.example", "Password1", "Ada")
        .await
        .unwrap();
    cli::cmd_login(accounts.as_ref(), "ada@alumni.example", "Password1")
        .await
        .unwrap();
    assert!(cli::cmd_announce(accounts.as_ref(), "Hi all").await.is_err());
    assert!(
        cli::cmd_set_disabled(accounts.as_ref(), "admin@portal", true)
            .await
            .is_err()
    );

    cli::cmd_logout(accounts.as_ref()).await.unwrap();
    cli::cmd_login(accounts.as_ref(), "admin@portal", "admin123")
        .await
        .unwrap();

    cli::cmd_users(accounts.as_ref()).await.unwrap();
    cli::cmd_announce(accounts.as_ref(), "Hi all").await.unwrap();
    cli::cmd_set_disabled(accounts.as_ref(), "ada@alumni.example", true)
        .await
        .unwrap();

    let ada = accounts.get_user("ada@alumni.example").await.unwrap();
    assert!(ada.disabled);

    let announcements = accounts.list_announcements().await.unwrap();
    assert_eq!(announcements[0].by, "Administrator");
}

#[tokio::test]
async fn test_failed_login_starts_no_session() {
    let accounts = spawn_accounts("sqlite::memory:").await;

    cli::cmd_login(accounts.as_ref(), "admin@portal", "wrong")
        .await
        .unwrap();
    assert!(accounts.current_session().await.unwrap().is_none());
}
