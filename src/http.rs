//! The reqwest-backed implementation of the remote API contracts.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    Error,
    admin::{AdminLogEntry, ProviderAccount, ProviderAccountDraft},
    client::{AdminAccountApi, SessionApi, TelegramApi, TransactionApi, TransactionListQuery},
    criteria::RecordId,
    session::{Category, UserProfile},
    telegram::LinkStatus,
    transaction::{Transaction, TransactionDraft},
};

/// The route to list and create transactions.
const TRANSACTIONS: &str = "/api/transactions";
/// The route to list and create provider accounts.
const ADMIN_ACCOUNTS: &str = "/api/admin/accounts";
/// The route to read the admin activity log.
const ADMIN_LOGS: &str = "/api/admin/logs";
/// The route to read the Telegram link status.
const TELEGRAM_STATUS: &str = "/api/telegram/status";
/// The route to generate a Telegram link code.
const TELEGRAM_LINK_CODE: &str = "/api/telegram/link_code";
/// The route to unlink the Telegram account.
const TELEGRAM_UNLINK: &str = "/api/telegram/unlink";
/// The route to update Telegram notification preferences.
const TELEGRAM_NOTIFICATIONS: &str = "/api/telegram/notifications";
/// The route to read the logged-in user's profile.
const PROFILE: &str = "/api/profile";
/// The route to list and create categories.
const CATEGORIES: &str = "/api/categories";

/// Length to trim error response bodies to before surfacing them.
const ERROR_BODY_EXCERPT_LIMIT: usize = 200;

/// The production client for the remote REST API.
///
/// Every call is a single request with no automatic retry; mutating calls
/// are at-most-once user actions and the caller decides whether to retry.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl HttpApi {
    /// A client for the API at `base_url`, authenticating every request
    /// with `auth_token` as a bearer token.
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            auth_token: auth_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> Result<T, Error> {
        let query_string = serde_urlencoded::to_string(query)
            .map_err(|error| Error::Api(format!("could not encode query string: {error}")))?;

        let path = if query_string.is_empty() {
            path.to_owned()
        } else {
            format!("{path}?{query_string}")
        };

        self.get_json(&path).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.auth_token)
            .json(body)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let response = self
            .client
            .put(self.url(path))
            .bearer_auth(&self.auth_token)
            .json(body)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Map a non-success response to an [Error].
///
/// 404 becomes [Error::NotFound] so callers can treat stale-id actions as
/// no-ops; any other non-success status is surfaced with a body excerpt.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::NotFound);
    }

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT_LIMIT).collect();

    Err(Error::Api(format!("{status}: {excerpt}")))
}

#[async_trait]
impl TransactionApi for HttpApi {
    async fn list_transactions(
        &self,
        query: &TransactionListQuery,
    ) -> Result<Vec<Transaction>, Error> {
        self.get_json_with_query(TRANSACTIONS, query).await
    }

    async fn create_transaction(&self, draft: &TransactionDraft) -> Result<Transaction, Error> {
        self.post_json(TRANSACTIONS, draft).await
    }

    async fn update_transaction(
        &self,
        id: RecordId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, Error> {
        self.put_json(&format!("{TRANSACTIONS}/{id}"), draft).await
    }

    async fn delete_transaction(&self, id: RecordId) -> Result<(), Error> {
        self.delete(&format!("{TRANSACTIONS}/{id}")).await
    }
}

#[async_trait]
impl AdminAccountApi for HttpApi {
    async fn list_accounts(&self) -> Result<Vec<ProviderAccount>, Error> {
        self.get_json(ADMIN_ACCOUNTS).await
    }

    async fn create_account(&self, draft: &ProviderAccountDraft) -> Result<ProviderAccount, Error> {
        self.post_json(ADMIN_ACCOUNTS, draft).await
    }

    async fn update_account(
        &self,
        id: RecordId,
        draft: &ProviderAccountDraft,
    ) -> Result<ProviderAccount, Error> {
        self.put_json(&format!("{ADMIN_ACCOUNTS}/{id}"), draft).await
    }

    async fn delete_account(&self, id: RecordId) -> Result<(), Error> {
        self.delete(&format!("{ADMIN_ACCOUNTS}/{id}")).await
    }

    async fn list_log_entries(&self) -> Result<Vec<AdminLogEntry>, Error> {
        self.get_json(ADMIN_LOGS).await
    }
}

#[async_trait]
impl TelegramApi for HttpApi {
    async fn link_status(&self) -> Result<LinkStatus, Error> {
        self.get_json(TELEGRAM_STATUS).await
    }

    async fn generate_link_code(&self) -> Result<LinkStatus, Error> {
        self.post_json(TELEGRAM_LINK_CODE, &json!({})).await
    }

    async fn unlink(&self) -> Result<(), Error> {
        self.delete(TELEGRAM_UNLINK).await
    }

    async fn set_notifications(&self, enabled: bool) -> Result<LinkStatus, Error> {
        self.put_json(TELEGRAM_NOTIFICATIONS, &json!({ "enabled": enabled }))
            .await
    }
}

#[async_trait]
impl SessionApi for HttpApi {
    async fn profile(&self) -> Result<UserProfile, Error> {
        self.get_json(PROFILE).await
    }

    async fn categories(&self) -> Result<Vec<Category>, Error> {
        self.get_json(CATEGORIES).await
    }

    async fn add_category(&self, name: &str) -> Result<Category, Error> {
        self.post_json(CATEGORIES, &json!({ "name": name })).await
    }

    async fn delete_category(&self, id: RecordId) -> Result<(), Error> {
        self.delete(&format!("{CATEGORIES}/{id}")).await
    }
}
