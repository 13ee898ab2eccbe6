//! Domain service for portal accounts.
//!
//! Handles registration, login (including legacy credential migration), the
//! bootstrap administrator, the activity log, announcements and the
//! current-session marker.

use serde::Serialize;
use thiserror::Error;

use crate::models::{ActivityLogEntry, Announcement, Session, UserRecord};
use crate::storage::StorageError;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("An account with this email already exists")]
    DuplicateAccount,

    #[error("Account not found")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Account has no usable credential")]
    CorruptAccount,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AccountError {
    fn from(err: StorageError) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AccountError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Password hashing task failed: {err}"))
    }
}

/// Counters for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountStats {
    pub total_users: usize,
    pub disabled_users: usize,
    pub admins: usize,
    pub announcements: usize,
    pub activity_entries: usize,
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates the administrator record if it is missing.
    ///
    /// Returns `true` when a record was created. Safe to call on every start.
    async fn bootstrap_admin(&self) -> Result<bool, AccountError>;

    /// Creates a regular account. Does not sign the user in.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::DuplicateAccount`] if the email is taken and
    /// [`AccountError::WeakPassword`] if the password fails the strength rule.
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserRecord, AccountError>;

    /// Verifies credentials, migrating a legacy credential on success.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`], [`AccountError::AccountDisabled`],
    /// [`AccountError::InvalidCredentials`] or [`AccountError::CorruptAccount`].
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord, AccountError>;

    /// Enables or disables an account. Authorization is the caller's job.
    async fn set_disabled(&self, email: &str, disabled: bool) -> Result<(), AccountError>;

    async fn get_user(&self, email: &str) -> Result<UserRecord, AccountError>;

    /// All accounts in insertion order.
    async fn list_users(&self) -> Result<Vec<UserRecord>, AccountError>;

    async fn record_activity(&self, entry: ActivityLogEntry) -> Result<(), AccountError>;

    /// Newest first, at most `limit` entries.
    async fn list_activity(&self, limit: usize) -> Result<Vec<ActivityLogEntry>, AccountError>;

    async fn post_announcement(&self, text: &str, by: &str) -> Result<Announcement, AccountError>;

    /// Newest first.
    async fn list_announcements(&self) -> Result<Vec<Announcement>, AccountError>;

    /// Persists the current-session marker for an authenticated user.
    async fn start_session(&self, user: &UserRecord) -> Result<Session, AccountError>;

    async fn current_session(&self) -> Result<Option<Session>, AccountError>;

    /// Clears the current-session marker and returns what was cleared.
    async fn end_session(&self) -> Result<Option<Session>, AccountError>;

    async fn stats(&self) -> Result<AccountStats, AccountError>;
}
