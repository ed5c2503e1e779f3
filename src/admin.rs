//! The admin screens: third-party provider credential accounts and the
//! admin activity log.
//!
//! Provider accounts hold the credentials the backend uses for its
//! transcription, text-to-speech, and AI-parsing services. The shape of an
//! account depends on its provider, so the credential set is a tagged union
//! resolved by explicit match; the usage/quota metadata attached to each
//! account is read-only for this front-end.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    client::AdminAccountApi,
    controller::{ListController, LoadState, RequestToken},
    criteria::{CriteriaPatch, Record, RecordId},
    pagination::{PageWindow, PaginationConfig},
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// How much of a provider's quota an account has consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageQuota {
    /// Units consumed so far in the current billing window.
    pub used: u64,
    /// The window's total allowance.
    pub limit: u64,
}

impl UsageQuota {
    /// The units left before the account hits its limit.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }
}

/// The provider-specific credential set of an account.
///
/// Tagged by provider on the wire; each variant carries exactly the fields
/// that provider needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ProviderCredentials {
    /// A speech-to-text transcription service account.
    Transcription {
        /// The provider API key.
        api_key: String,
        /// The service region the key is valid for.
        region: String,
    },
    /// A text-to-speech service account.
    TextToSpeech {
        /// The provider API key.
        api_key: String,
        /// The voice preset to synthesize with.
        voice: String,
    },
    /// An AI transaction-parsing service account.
    AiParsing {
        /// The provider API key.
        api_key: String,
        /// The model the parser should use.
        model: String,
    },
}

impl ProviderCredentials {
    /// The provider tag as it appears on the wire and in filters.
    pub fn provider_name(&self) -> &'static str {
        match self {
            ProviderCredentials::Transcription { .. } => "transcription",
            ProviderCredentials::TextToSpeech { .. } => "text_to_speech",
            ProviderCredentials::AiParsing { .. } => "ai_parsing",
        }
    }

    fn api_key(&self) -> &str {
        match self {
            ProviderCredentials::Transcription { api_key, .. }
            | ProviderCredentials::TextToSpeech { api_key, .. }
            | ProviderCredentials::AiParsing { api_key, .. } => api_key,
        }
    }
}

/// A third-party service account registered with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAccount {
    /// The ID of the account record.
    pub id: RecordId,
    /// The display name an admin gave the account.
    pub label: String,
    /// The provider-specific credentials.
    #[serde(flatten)]
    pub credentials: ProviderCredentials,
    /// Usage metadata, maintained by the backend.
    pub quota: UsageQuota,
}

impl Record for ProviderAccount {
    fn id(&self) -> RecordId {
        self.id
    }

    fn search_text(&self) -> String {
        self.label.clone()
    }

    fn kind(&self) -> Option<&str> {
        Some(self.credentials.provider_name())
    }
}

/// The "add account" form: a label plus one provider's credential set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderAccountDraft {
    /// The display name for the new account.
    pub label: String,
    /// The provider-specific credentials.
    #[serde(flatten)]
    pub credentials: ProviderCredentials,
}

impl ProviderAccountDraft {
    /// Check the form input before it reaches the network.
    ///
    /// # Errors
    /// Returns [Error::EmptyField] when the label or the API key is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if self.label.trim().is_empty() {
            return Err(Error::EmptyField("label"));
        }

        if self.credentials.api_key().trim().is_empty() {
            return Err(Error::EmptyField("API key"));
        }

        Ok(())
    }
}

/// One row of the admin activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLogEntry {
    /// The ID of the log entry.
    pub id: RecordId,
    /// The day the action happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The admin who performed the action.
    pub actor: String,
    /// The action tag, e.g. "account_created".
    pub action: String,
    /// A human-readable summary of the action.
    pub message: String,
}

impl Record for AdminLogEntry {
    fn id(&self) -> RecordId {
        self.id
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.actor, self.message)
    }

    fn kind(&self) -> Option<&str> {
        Some(&self.action)
    }

    fn date(&self) -> Option<Date> {
        Some(self.date)
    }
}

/// The view model behind the provider accounts screen.
pub struct AdminAccountsScreen {
    api: Arc<dyn AdminAccountApi>,
    controller: ListController<ProviderAccount>,
}

impl AdminAccountsScreen {
    /// An empty screen; call [reload](Self::reload) to populate it.
    pub fn new(api: Arc<dyn AdminAccountApi>, config: PaginationConfig) -> Self {
        Self {
            api,
            controller: ListController::new(config),
        }
    }

    /// Where the screen is in its fetch lifecycle.
    pub fn load_state(&self) -> &LoadState {
        self.controller.load_state()
    }

    /// Start a reload; see [ListController::begin_load].
    pub fn begin_reload(&mut self) -> RequestToken {
        self.controller.begin_load()
    }

    /// Apply a reload outcome; stale responses are dropped.
    pub fn finish_reload(
        &mut self,
        token: RequestToken,
        result: Result<Vec<ProviderAccount>, Error>,
    ) -> bool {
        self.controller.finish_load(token, result)
    }

    /// Fetch every account and apply the outcome in one step.
    pub async fn reload(&mut self) -> bool {
        let token = self.begin_reload();
        let result = self.api.list_accounts().await;
        self.finish_reload(token, result)
    }

    /// Merge a filter edit and return to page 1.
    pub fn filter(&mut self, patch: CriteriaPatch) {
        self.controller.apply_filter(patch);
    }

    /// Navigate to `page`; out-of-range requests are ignored.
    pub fn go_to_page(&mut self, page: u64) -> bool {
        self.controller.go_to_page(page)
    }

    /// The current page number.
    pub fn current_page(&self) -> u64 {
        self.controller.current_page()
    }

    /// The current page's accounts and the pagination controls.
    pub fn page(&self) -> (Vec<&ProviderAccount>, PageWindow) {
        self.controller.visible_page()
    }

    /// Validate `draft`, register it on the server, and append the result.
    pub async fn add(&mut self, draft: ProviderAccountDraft) -> Result<(), Error> {
        draft.validate()?;

        let created = self.api.create_account(&draft).await?;
        self.controller.push(created);

        Ok(())
    }

    /// Validate `draft`, update the account on the server, and apply the
    /// result locally.
    ///
    /// A [Error::NotFound] means another admin deleted the account; it is
    /// dropped locally and the call succeeds.
    pub async fn save_edit(
        &mut self,
        id: RecordId,
        draft: ProviderAccountDraft,
    ) -> Result<(), Error> {
        draft.validate()?;

        match self.api.update_account(id, &draft).await {
            Ok(updated) => {
                self.controller.update(id, |account| *account = updated.clone());
                Ok(())
            }
            Err(Error::NotFound) => {
                self.controller.remove(id);
                Ok(())
            }
            Err(error) => {
                tracing::error!("failed to update provider account {id}: {error}");
                Err(error)
            }
        }
    }

    /// Delete the account on the server, then locally.
    ///
    /// On failure the local rows are unchanged; [Error::NotFound] counts as
    /// success since the account is already gone.
    pub async fn delete(&mut self, id: RecordId) -> Result<(), Error> {
        match self.api.delete_account(id).await {
            Ok(()) | Err(Error::NotFound) => {
                self.controller.remove(id);
                Ok(())
            }
            Err(error) => {
                tracing::error!("failed to delete provider account {id}: {error}");
                Err(error)
            }
        }
    }
}

/// The view model behind the read-only admin activity log screen.
pub struct AdminLogScreen {
    api: Arc<dyn AdminAccountApi>,
    controller: ListController<AdminLogEntry>,
}

impl AdminLogScreen {
    /// An empty screen; call [reload](Self::reload) to populate it.
    pub fn new(api: Arc<dyn AdminAccountApi>, config: PaginationConfig) -> Self {
        Self {
            api,
            controller: ListController::new(config),
        }
    }

    /// Fetch the log and apply the outcome, dropping stale responses.
    pub async fn reload(&mut self) -> bool {
        let token = self.controller.begin_load();
        let result = self.api.list_log_entries().await;
        self.controller.finish_load(token, result)
    }

    /// Where the screen is in its fetch lifecycle.
    pub fn load_state(&self) -> &LoadState {
        self.controller.load_state()
    }

    /// Merge a filter edit and return to page 1.
    pub fn filter(&mut self, patch: CriteriaPatch) {
        self.controller.apply_filter(patch);
    }

    /// Navigate to `page`; out-of-range requests are ignored.
    pub fn go_to_page(&mut self, page: u64) -> bool {
        self.controller.go_to_page(page)
    }

    /// The current page's entries and the pagination controls.
    pub fn page(&self) -> (Vec<&AdminLogEntry>, PageWindow) {
        self.controller.visible_page()
    }
}
