//! [`AccountService`] over any [`KeyValueStorage`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info, warn};

use crate::config::{BootstrapConfig, Config, SecurityConfig};
use crate::constants::{actions, keys};
use crate::models::{ActivityLogEntry, Announcement, Credential, Role, Session, UserRecord};
use crate::security::{self, evaluate_strength, legacy};
use crate::services::account_service::{AccountError, AccountService, AccountStats};
use crate::storage::KeyValueStorage;

pub struct StorageAccountService {
    storage: Arc<dyn KeyValueStorage>,
    security: SecurityConfig,
    bootstrap: BootstrapConfig,
    /// Serializes every read-modify-write; the storage has no transactions.
    write_lock: Mutex<()>,
}

impl StorageAccountService {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: &Config) -> Self {
        Self {
            storage,
            security: config.security.clone(),
            bootstrap: config.bootstrap.clone(),
            write_lock: Mutex::new(()),
        }
    }

    /// Reads a collection, treating a failed read or undecodable data as
    /// empty.
    async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let bytes = match self.storage.read(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "Storage read failed, treating collection as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(e) => {
                warn!(key, error = %e, "Stored collection is corrupt, treating it as empty");
                Vec::new()
            }
        }
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, items: &[T]) -> Result<(), AccountError> {
        let bytes = serde_json::to_vec(items).map_err(crate::storage::StorageError::from)?;
        self.storage.write(key, &bytes).await?;
        Ok(())
    }

    async fn load_users(&self) -> Vec<UserRecord> {
        self.load(keys::USERS).await
    }

    /// Caller must hold `write_lock`.
    async fn append_activity(&self, entry: ActivityLogEntry) -> Result<(), AccountError> {
        let mut log: Vec<ActivityLogEntry> = self.load(keys::ACTIVITY).await;
        log.insert(0, entry);
        log.truncate(self.security.activity_log_cap);
        self.save(keys::ACTIVITY, &log).await
    }

    async fn salted_credential(&self, password: &str) -> Result<Credential, AccountError> {
        let password = password.to_string();
        let salt_bytes = self.security.salt_bytes;

        let credential = task::spawn_blocking(move || {
            let salt = security::generate_salt(salt_bytes);
            let hash = security::hash_password(&salt, &password);
            Credential::Salted { hash, salt }
        })
        .await?;

        Ok(credential)
    }

    async fn verify_salted(
        &self,
        hash: String,
        salt: String,
        password: &str,
    ) -> Result<bool, AccountError> {
        let password = password.to_string();
        let valid =
            task::spawn_blocking(move || security::verify_password(&salt, &password, &hash))
                .await?;
        Ok(valid)
    }

    async fn read_session(&self) -> Option<Session> {
        let bytes = match self.storage.read(keys::SESSION).await {
            Ok(bytes) => bytes?,
            Err(e) => {
                warn!(error = %e, "Session read failed, treating as signed out");
                return None;
            }
        };

        serde_json::from_slice(&bytes)
            .inspect_err(|e| warn!(error = %e, "Stored session is corrupt, ignoring it"))
            .ok()
    }
}

#[async_trait]
impl AccountService for StorageAccountService {
    async fn bootstrap_admin(&self) -> Result<bool, AccountError> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.load_users().await;
        if users.iter().any(|u| u.email == self.bootstrap.admin_email) {
            debug!(email = %self.bootstrap.admin_email, "Admin account already present");
            return Ok(false);
        }

        let credential = self
            .salted_credential(&self.bootstrap.admin_password)
            .await?;

        users.push(UserRecord {
            email: self.bootstrap.admin_email.clone(),
            name: self.bootstrap.admin_name.clone(),
            credential: Some(credential),
            role: Role::Admin,
            disabled: false,
            created_at: Utc::now(),
            last_login_at: None,
        });
        self.save(keys::USERS, &users).await?;

        self.append_activity(ActivityLogEntry::new(
            &self.bootstrap.admin_email,
            actions::ADMIN_BOOTSTRAPPED,
        ))
        .await?;

        warn!(
            email = %self.bootstrap.admin_email,
            "Bootstrapped admin account with the configured default password; change it"
        );
        Ok(true)
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserRecord, AccountError> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.load_users().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AccountError::DuplicateAccount);
        }

        let strength = evaluate_strength(password);
        if !strength.valid {
            return Err(AccountError::WeakPassword(strength.message));
        }

        let credential = self.salted_credential(password).await?;
        let user = UserRecord {
            email: email.to_string(),
            name: name.to_string(),
            credential: Some(credential),
            role: Role::User,
            disabled: false,
            created_at: Utc::now(),
            last_login_at: None,
        };

        users.push(user.clone());
        self.save(keys::USERS, &users).await?;
        self.append_activity(ActivityLogEntry::new(email, actions::REGISTERED))
            .await?;

        info!(email = %email, "Account registered");
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord, AccountError> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.load_users().await;
        let index = users
            .iter()
            .position(|u| u.email == email)
            .ok_or(AccountError::NotFound)?;

        if users[index].disabled {
            warn!(email = %email, "Login attempt on disabled account");
            return Err(AccountError::AccountDisabled);
        }

        match users[index].credential.clone() {
            None => {
                warn!(email = %email, "Account has neither a salted nor a legacy credential");
                return Err(AccountError::CorruptAccount);
            }
            Some(Credential::Legacy { encoded }) => {
                if !legacy::matches(&encoded, password) {
                    return Err(AccountError::InvalidCredentials);
                }

                if self.security.auto_migrate_legacy_credentials {
                    let credential = self.salted_credential(password).await?;
                    users[index].credential = Some(credential);
                    self.save(keys::USERS, &users).await?;
                    self.append_activity(ActivityLogEntry::new(
                        email,
                        actions::CREDENTIAL_MIGRATED,
                    ))
                    .await?;
                    info!(email = %email, "Migrated legacy credential to salted hash");
                }
            }
            Some(Credential::Salted { hash, salt }) => {
                if !self.verify_salted(hash, salt, password).await? {
                    return Err(AccountError::InvalidCredentials);
                }
            }
        }

        users[index].last_login_at = Some(Utc::now());
        self.save(keys::USERS, &users).await?;
        self.append_activity(ActivityLogEntry::new(email, actions::LOGGED_IN))
            .await?;

        info!(email = %email, "Login succeeded");
        Ok(users[index].clone())
    }

    async fn set_disabled(&self, email: &str, disabled: bool) -> Result<(), AccountError> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.load_users().await;
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or(AccountError::NotFound)?;
        user.disabled = disabled;
        self.save(keys::USERS, &users).await?;

        let actor = self
            .read_session()
            .await
            .map_or_else(|| self.bootstrap.admin_email.clone(), |s| s.email);
        let action = if disabled {
            format!("Disabled {email}")
        } else {
            format!("Enabled {email}")
        };
        self.append_activity(ActivityLogEntry::new(actor, action))
            .await?;

        info!(email = %email, disabled, "Account status changed");
        Ok(())
    }

    async fn get_user(&self, email: &str) -> Result<UserRecord, AccountError> {
        self.load_users()
            .await
            .into_iter()
            .find(|u| u.email == email)
            .ok_or(AccountError::NotFound)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, AccountError> {
        Ok(self.load_users().await)
    }

    async fn record_activity(&self, entry: ActivityLogEntry) -> Result<(), AccountError> {
        let _guard = self.write_lock.lock().await;
        self.append_activity(entry).await
    }

    async fn list_activity(&self, limit: usize) -> Result<Vec<ActivityLogEntry>, AccountError> {
        let mut log: Vec<ActivityLogEntry> = self.load(keys::ACTIVITY).await;
        log.truncate(limit);
        Ok(log)
    }

    async fn post_announcement(&self, text: &str, by: &str) -> Result<Announcement, AccountError> {
        let _guard = self.write_lock.lock().await;

        let announcement = Announcement {
            text: text.to_string(),
            by: by.to_string(),
            timestamp: Utc::now(),
        };

        let mut announcements: Vec<Announcement> = self.load(keys::ANNOUNCEMENTS).await;
        announcements.insert(0, announcement.clone());
        self.save(keys::ANNOUNCEMENTS, &announcements).await?;

        info!(by = %by, "Announcement posted");
        Ok(announcement)
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>, AccountError> {
        Ok(self.load(keys::ANNOUNCEMENTS).await)
    }

    async fn start_session(&self, user: &UserRecord) -> Result<Session, AccountError> {
        let _guard = self.write_lock.lock().await;

        let session = Session::from(user);
        let bytes = serde_json::to_vec(&session).map_err(crate::storage::StorageError::from)?;
        self.storage.write(keys::SESSION, &bytes).await?;

        debug!(email = %session.email, "Session started");
        Ok(session)
    }

    async fn current_session(&self) -> Result<Option<Session>, AccountError> {
        Ok(self.read_session().await)
    }

    async fn end_session(&self) -> Result<Option<Session>, AccountError> {
        let _guard = self.write_lock.lock().await;

        let session = self.read_session().await;
        self.storage.remove(keys::SESSION).await?;

        if let Some(session) = &session {
            self.append_activity(ActivityLogEntry::new(&session.email, actions::LOGGED_OUT))
                .await?;
            debug!(email = %session.email, "Session ended");
        }

        Ok(session)
    }

    async fn stats(&self) -> Result<AccountStats, AccountError> {
        let users = self.load_users().await;
        let announcements: Vec<Announcement> = self.load(keys::ANNOUNCEMENTS).await;
        let activity: Vec<ActivityLogEntry> = self.load(keys::ACTIVITY).await;

        Ok(AccountStats {
            total_users: users.len(),
            disabled_users: users.iter().filter(|u| u.disabled).count(),
            admins: users.iter().filter(|u| u.is_admin()).count(),
            announcements: announcements.len(),
            activity_entries: activity.len(),
        })
    }
}
