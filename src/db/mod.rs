//! SQLite-backed [`KeyValueStorage`] using `SeaORM`.

use crate::entities::{kv_entries, prelude::*};
use crate::storage::{KeyValueStorage, StorageError};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Set, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;

/// Idle and lifetime limit for the single in-memory connection. Recycling it
/// would drop the database, so it is kept far beyond any process lifetime
/// (sqlx otherwise recycles after 30 minutes).
pub const MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Clone)]
pub struct SqliteStorage {
    pub conn: DatabaseConnection,
}

impl SqliteStorage {
    pub async fn new(db_url: &str) -> Result<Self> {
        // An in-memory database lives only as long as its connection.
        if is_memory_url(db_url) {
            Self::with_pool_options(db_url, 1, 1).await
        } else {
            Self::with_pool_options(db_url, 5, 1).await
        }
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let memory = is_memory_url(db_url);

        if !memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let opt = connect_options(db_url, max_connections, min_connections);
        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }
}

fn connect_options(db_url: &str, max_connections: u32, min_connections: u32) -> ConnectOptions {
    let mut opt = ConnectOptions::new(db_url.to_string());
    opt.max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if is_memory_url(db_url) {
        opt.idle_timeout(MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(MEMORY_CONNECTION_LIFETIME);
    } else {
        opt.idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600));
    }

    opt
}

fn is_memory_url(db_url: &str) -> bool {
    db_url.contains(":memory:")
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entry = KvEntries::find_by_id(key.to_string())
            .one(&self.conn)
            .await?;

        Ok(entry.map(|e| e.value))
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let active = kv_entries::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_vec()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        KvEntries::insert(active)
            .on_conflict(
                OnConflict::column(kv_entries::Column::Key)
                    .update_columns([kv_entries::Column::Value, kv_entries::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        KvEntries::delete_by_id(key.to_string())
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}
