//! The Telegram bot account-linking screen.
//!
//! Linking works by handing the user a short-lived code to send to the bot;
//! the backend owns the handshake. This screen only mirrors the link status
//! and dispatches the user's actions, each an at-most-once API call that
//! replaces the status on success and leaves it untouched on failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    client::TelegramApi,
    controller::{LoadState, RequestToken},
};

/// Where the user's Telegram link currently stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LinkStatus {
    /// No Telegram account is linked and no code is outstanding.
    Unlinked,
    /// A link code was generated and is waiting to be sent to the bot.
    PendingCode {
        /// The code the user sends to the bot.
        code: String,
        /// When the code stops being accepted.
        #[serde(with = "time::serde::rfc3339")]
        expires_at: OffsetDateTime,
    },
    /// A Telegram account is linked.
    Linked {
        /// The linked Telegram username.
        username: String,
        /// Whether the bot sends transaction notifications.
        notifications_enabled: bool,
    },
}

/// The view model behind the Telegram linking screen.
pub struct TelegramScreen {
    api: Arc<dyn TelegramApi>,
    status: LinkStatus,
    load_state: LoadState,
    generation: u64,
}

impl TelegramScreen {
    /// A screen assuming no link until the first refresh says otherwise.
    pub fn new(api: Arc<dyn TelegramApi>) -> Self {
        Self {
            api,
            status: LinkStatus::Unlinked,
            load_state: LoadState::Idle,
            generation: 0,
        }
    }

    /// The last known link status.
    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    /// Where the screen is in its fetch lifecycle.
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Start a status refresh and get the token its response must present.
    pub fn begin_refresh(&mut self) -> RequestToken {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        RequestToken::new(self.generation)
    }

    /// Apply a refresh outcome; stale responses are dropped.
    pub fn finish_refresh(
        &mut self,
        token: RequestToken,
        result: Result<LinkStatus, Error>,
    ) -> bool {
        if token.value() != self.generation {
            tracing::debug!("dropping stale telegram status response");
            return false;
        }

        match result {
            Ok(status) => {
                self.status = status;
                self.load_state = LoadState::Ready;
            }
            Err(error) => {
                tracing::error!("telegram status refresh failed: {error}");
                self.load_state = LoadState::Failed(error.to_string());
            }
        }

        true
    }

    /// Fetch the link status and apply the outcome in one step.
    pub async fn refresh(&mut self) -> bool {
        let token = self.begin_refresh();
        let result = self.api.link_status().await;
        self.finish_refresh(token, result)
    }

    /// Generate a fresh link code for the user to send to the bot.
    ///
    /// On failure the last known status is kept and the error carries the
    /// user-visible message.
    pub async fn generate_code(&mut self) -> Result<&LinkStatus, Error> {
        let status = self.api.generate_link_code().await?;
        self.status = status;

        Ok(&self.status)
    }

    /// Unlink the Telegram account.
    ///
    /// A [Error::NotFound] means the link is already gone; the screen
    /// settles on [LinkStatus::Unlinked] either way.
    pub async fn unlink(&mut self) -> Result<(), Error> {
        match self.api.unlink().await {
            Ok(()) | Err(Error::NotFound) => {
                self.status = LinkStatus::Unlinked;
                Ok(())
            }
            Err(error) => {
                tracing::error!("failed to unlink telegram account: {error}");
                Err(error)
            }
        }
    }

    /// Enable or disable bot notifications.
    ///
    /// A [Error::NotFound] means the account was unlinked elsewhere; the
    /// screen settles on [LinkStatus::Unlinked] and the call succeeds.
    pub async fn set_notifications(&mut self, enabled: bool) -> Result<(), Error> {
        match self.api.set_notifications(enabled).await {
            Ok(status) => {
                self.status = status;
                Ok(())
            }
            Err(Error::NotFound) => {
                self.status = LinkStatus::Unlinked;
                Ok(())
            }
            Err(error) => {
                tracing::error!("failed to update telegram notifications: {error}");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use time::macros::datetime;

    use crate::{Error, client::TelegramApi, controller::LoadState};

    use super::{LinkStatus, TelegramScreen};

    struct FakeTelegramApi {
        status: LinkStatus,
        fail: Option<Error>,
    }

    #[async_trait]
    impl TelegramApi for FakeTelegramApi {
        async fn link_status(&self) -> Result<LinkStatus, Error> {
            match &self.fail {
                Some(error) => Err(error.clone()),
                None => Ok(self.status.clone()),
            }
        }

        async fn generate_link_code(&self) -> Result<LinkStatus, Error> {
            match &self.fail {
                Some(error) => Err(error.clone()),
                None => Ok(LinkStatus::PendingCode {
                    code: "LV-4921".to_owned(),
                    expires_at: datetime!(2026-09-01 12:00 UTC),
                }),
            }
        }

        async fn unlink(&self) -> Result<(), Error> {
            match &self.fail {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }

        async fn set_notifications(&self, enabled: bool) -> Result<LinkStatus, Error> {
            match &self.fail {
                Some(error) => Err(error.clone()),
                None => Ok(LinkStatus::Linked {
                    username: "ana_budget".to_owned(),
                    notifications_enabled: enabled,
                }),
            }
        }
    }

    fn linked() -> LinkStatus {
        LinkStatus::Linked {
            username: "ana_budget".to_owned(),
            notifications_enabled: true,
        }
    }

    fn screen(status: LinkStatus, fail: Option<Error>) -> TelegramScreen {
        TelegramScreen::new(Arc::new(FakeTelegramApi { status, fail }))
    }

    #[tokio::test]
    async fn refresh_applies_the_remote_status() {
        let mut screen = screen(linked(), None);

        assert!(screen.refresh().await);

        assert_eq!(screen.status(), &linked());
        assert_eq!(screen.load_state(), &LoadState::Ready);
    }

    #[tokio::test]
    async fn stale_refresh_response_is_dropped() {
        let mut screen = screen(linked(), None);

        let stale = screen.begin_refresh();
        let current = screen.begin_refresh();

        assert!(!screen.finish_refresh(stale, Ok(linked())));
        assert_eq!(screen.status(), &LinkStatus::Unlinked);

        assert!(screen.finish_refresh(current, Ok(linked())));
        assert_eq!(screen.status(), &linked());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_last_known_status() {
        let mut screen = screen(linked(), None);
        screen.refresh().await;

        // Swap in a failing API by reusing the screen's begin/finish seam.
        let token = screen.begin_refresh();
        screen.finish_refresh(token, Err(Error::Api("502 Bad Gateway".to_owned())));

        assert_eq!(screen.status(), &linked());
        assert!(matches!(screen.load_state(), LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn generate_code_moves_to_pending() {
        let mut screen = screen(LinkStatus::Unlinked, None);

        let status = screen.generate_code().await.unwrap();

        assert!(matches!(status, LinkStatus::PendingCode { code, .. } if code == "LV-4921"));
    }

    #[tokio::test]
    async fn unlink_tolerates_an_already_unlinked_account() {
        let mut screen = screen(linked(), Some(Error::NotFound));
        screen.status = linked();

        screen.unlink().await.unwrap();

        assert_eq!(screen.status(), &LinkStatus::Unlinked);
    }

    #[tokio::test]
    async fn failed_notification_update_keeps_the_status() {
        let mut screen = screen(linked(), Some(Error::Api("500".to_owned())));
        screen.status = linked();

        let result = screen.set_notifications(false).await;

        assert!(result.is_err());
        assert_eq!(screen.status(), &linked());
    }

    #[test]
    fn status_is_tagged_on_the_wire() {
        let value = serde_json::to_value(LinkStatus::Unlinked).unwrap();
        assert_eq!(value["state"], "unlinked");

        let value = serde_json::to_value(linked()).unwrap();
        assert_eq!(value["state"], "linked");
        assert_eq!(value["username"], "ana_budget");

        let parsed: LinkStatus = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, linked());
    }

    #[test]
    fn pending_code_expiry_is_rfc3339_on_the_wire() {
        let pending = LinkStatus::PendingCode {
            code: "LV-4921".to_owned(),
            expires_at: datetime!(2026-09-01 12:00 UTC),
        };

        let value = serde_json::to_value(&pending).unwrap();
        assert_eq!(value["state"], "pending_code");
        assert_eq!(value["expires_at"], "2026-09-01T12:00:00Z");

        let parsed: LinkStatus = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, pending);
    }
}
