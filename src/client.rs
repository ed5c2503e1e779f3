//! The typed contracts for the remote REST API.
//!
//! Screens depend on these traits rather than on a concrete HTTP client so
//! tests can substitute in-memory fakes. The production implementation is
//! [HttpApi](crate::http::HttpApi). The wire format is owned by the remote
//! service; this module only pins the request parameters and response shapes
//! the front-end consumes.

use async_trait::async_trait;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    admin::{AdminLogEntry, ProviderAccount, ProviderAccountDraft},
    criteria::RecordId,
    session::{Category, Month, UserProfile},
    telegram::LinkStatus,
    transaction::{Transaction, TransactionDraft, TransactionKind},
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// The parameters accepted by the transaction listing endpoint.
///
/// The observed screens fetch one month and filter client-side, but the
/// endpoint also accepts paging and filter parameters for callers that want
/// the server to narrow the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionListQuery {
    /// Restrict results to this month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    /// The 1-indexed page to return, for server-side paging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// The page size, for server-side paging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    /// Substring to search descriptions for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact category to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Restrict results to income or expenses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    /// Inclusive lower bound on the transaction date.
    #[serde(skip_serializing_if = "Option::is_none", with = "iso_date::option")]
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the transaction date.
    #[serde(skip_serializing_if = "Option::is_none", with = "iso_date::option")]
    pub date_to: Option<Date>,
}

impl TransactionListQuery {
    /// A query for every transaction in `month`.
    pub fn for_month(month: Month) -> Self {
        Self {
            month: Some(month),
            ..Self::default()
        }
    }
}

/// The transaction endpoints: list, create, update, delete.
#[async_trait]
pub trait TransactionApi: Send + Sync {
    /// Fetch the transactions matching `query`.
    async fn list_transactions(
        &self,
        query: &TransactionListQuery,
    ) -> Result<Vec<Transaction>, Error>;

    /// Create a transaction and return it as the server recorded it.
    async fn create_transaction(&self, draft: &TransactionDraft) -> Result<Transaction, Error>;

    /// Overwrite the transaction with `id` and return the updated record.
    async fn update_transaction(
        &self,
        id: RecordId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction with `id`.
    async fn delete_transaction(&self, id: RecordId) -> Result<(), Error>;
}

/// The admin endpoints for third-party provider credential accounts and the
/// admin activity log.
#[async_trait]
pub trait AdminAccountApi: Send + Sync {
    /// Fetch every provider account, including its usage/quota metadata.
    async fn list_accounts(&self) -> Result<Vec<ProviderAccount>, Error>;

    /// Register a new provider account.
    async fn create_account(&self, draft: &ProviderAccountDraft) -> Result<ProviderAccount, Error>;

    /// Overwrite the provider account with `id`.
    async fn update_account(
        &self,
        id: RecordId,
        draft: &ProviderAccountDraft,
    ) -> Result<ProviderAccount, Error>;

    /// Delete the provider account with `id`.
    async fn delete_account(&self, id: RecordId) -> Result<(), Error>;

    /// Fetch the admin activity log, newest first.
    async fn list_log_entries(&self) -> Result<Vec<AdminLogEntry>, Error>;
}

/// The Telegram bot account-linking endpoints.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// The current link status for the logged-in user.
    async fn link_status(&self) -> Result<LinkStatus, Error>;

    /// Generate a fresh link code for the user to send to the bot.
    async fn generate_link_code(&self) -> Result<LinkStatus, Error>;

    /// Unlink the user's Telegram account.
    async fn unlink(&self) -> Result<(), Error>;

    /// Enable or disable bot notifications and return the new status.
    async fn set_notifications(&self, enabled: bool) -> Result<LinkStatus, Error>;
}

/// The session-scoped endpoints: user profile and category management.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// The profile of the logged-in user.
    async fn profile(&self) -> Result<UserProfile, Error>;

    /// The user's transaction categories.
    async fn categories(&self) -> Result<Vec<Category>, Error>;

    /// Create a category and return it as the server recorded it.
    async fn add_category(&self, name: &str) -> Result<Category, Error>;

    /// Delete the category with `id`.
    async fn delete_category(&self, id: RecordId) -> Result<(), Error>;
}
