//! The transactions screen: a month-scoped, filterable, paged list.
//!
//! The remote API is the source of truth. The screen fetches the active
//! month's transactions, filters and pages them client-side, and issues an
//! at-most-once API call for every mutation before touching local state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    client::{TransactionApi, TransactionListQuery},
    controller::{ListController, LoadState, RequestToken},
    criteria::{CriteriaPatch, Record, RecordId},
    pagination::{PageWindow, PaginationConfig},
    session::Month,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money flowing in.
    Income,
    /// Money flowing out.
    Expense,
}

impl TransactionKind {
    /// The kind as the lowercase string used on the wire and in filters.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// An expense or income, i.e. an event where money was spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: RecordId,
    /// The amount of money spent or earned, always positive; `kind` carries
    /// the direction.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category the transaction belongs to, empty for uncategorized.
    pub category: String,
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
}

impl Record for Transaction {
    fn id(&self) -> RecordId {
        self.id
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.description, self.category)
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn kind(&self) -> Option<&str> {
        Some(self.kind.as_str())
    }

    fn date(&self) -> Option<Date> {
        Some(self.date)
    }
}

/// The payload of the transaction add/edit form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDraft {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category the transaction belongs to.
    pub category: String,
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
}

impl TransactionDraft {
    /// An edit form pre-populated from an existing transaction.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount,
            date: transaction.date,
            description: transaction.description.clone(),
            category: transaction.category.clone(),
            kind: transaction.kind,
        }
    }

    /// Check the form input before it reaches the network.
    ///
    /// # Errors
    /// Returns [Error::EmptyField] for a blank description and
    /// [Error::FutureDate] for a date later than `today`. Transactions
    /// record events that have already happened.
    pub fn validate(&self, today: Date) -> Result<(), Error> {
        if self.description.trim().is_empty() {
            return Err(Error::EmptyField("description"));
        }

        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        Ok(())
    }
}

/// The top-level display mode of the transactions screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Rows in the order the server returned them.
    #[default]
    All,
    /// Rows ordered by date, newest first.
    ByDate,
}

/// The view model behind the transactions screen.
pub struct TransactionsScreen {
    api: Arc<dyn TransactionApi>,
    controller: ListController<Transaction>,
    month: Month,
    view_mode: ViewMode,
}

impl TransactionsScreen {
    /// A screen scoped to `month`, empty until the first reload.
    pub fn new(api: Arc<dyn TransactionApi>, config: PaginationConfig, month: Month) -> Self {
        Self {
            api,
            controller: ListController::new(config),
            month,
            view_mode: ViewMode::default(),
        }
    }

    /// The month this screen is scoped to.
    pub fn month(&self) -> Month {
        self.month
    }

    /// Scope the screen to a different month and return to page 1.
    ///
    /// The rows still belong to the previous month until the caller reloads;
    /// the stale-response guard ensures a still-in-flight load for the old
    /// month cannot clobber the reload.
    pub fn set_month(&mut self, month: Month) {
        self.month = month;
        self.controller.reset_view();
    }

    /// The current display mode.
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch the display mode and return to page 1.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.controller.reset_view();
    }

    /// Where the screen is in its fetch lifecycle.
    pub fn load_state(&self) -> &LoadState {
        self.controller.load_state()
    }

    /// Start a reload of the active month.
    ///
    /// Returns the token the response must present to
    /// [finish_reload](Self::finish_reload) and the query to send. Split
    /// from the await so the UI can interleave other events while the
    /// request is in flight.
    pub fn begin_reload(&mut self) -> (RequestToken, TransactionListQuery) {
        (
            self.controller.begin_load(),
            TransactionListQuery::for_month(self.month),
        )
    }

    /// Apply a reload outcome; stale responses are dropped.
    pub fn finish_reload(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Transaction>, Error>,
    ) -> bool {
        self.controller.finish_load(token, result)
    }

    /// Fetch the active month and apply the outcome in one step.
    ///
    /// Returns whether the response was applied (it is dropped when a newer
    /// reload began in the meantime).
    pub async fn reload(&mut self) -> bool {
        let (token, query) = self.begin_reload();
        let result = self.api.list_transactions(&query).await;
        self.finish_reload(token, result)
    }

    /// Merge a filter edit and return to page 1.
    pub fn filter(&mut self, patch: CriteriaPatch) {
        self.controller.apply_filter(patch);
    }

    /// Drop every filter constraint and return to page 1.
    pub fn clear_filter(&mut self) {
        self.controller.clear_filter();
    }

    /// Navigate to `page`; out-of-range requests are ignored.
    pub fn go_to_page(&mut self, page: u64) -> bool {
        self.controller.go_to_page(page)
    }

    /// The current page number.
    pub fn current_page(&self) -> u64 {
        self.controller.current_page()
    }

    /// The current page's rows and the pagination controls.
    pub fn page(&self) -> (Vec<&Transaction>, PageWindow) {
        match self.view_mode {
            ViewMode::All => self.controller.visible_page(),
            ViewMode::ByDate => {
                let mut items = self.controller.visible_items();
                items.sort_by(|a, b| b.date.cmp(&a.date));

                let page_size = self.controller.config().page_size;
                let skip = (self.controller.current_page() - 1) * page_size;
                let page = items
                    .into_iter()
                    .skip(skip as usize)
                    .take(page_size as usize)
                    .collect();

                (page, self.controller.window())
            }
        }
    }

    /// An edit form pre-populated from the row with `id`, if it exists.
    pub fn edit_draft(&self, id: RecordId) -> Option<TransactionDraft> {
        self.controller
            .list()
            .get(id)
            .map(TransactionDraft::from_transaction)
    }

    /// Validate `draft`, create it on the server, and append the result.
    ///
    /// On any error the local rows are unchanged.
    pub async fn add(&mut self, draft: TransactionDraft) -> Result<(), Error> {
        draft.validate(OffsetDateTime::now_utc().date())?;

        let created = self.api.create_transaction(&draft).await?;
        self.controller.push(created);

        Ok(())
    }

    /// Validate `draft`, update the row on the server, and apply the result
    /// locally.
    ///
    /// A [Error::NotFound] from the server means another session deleted
    /// the row; it is dropped locally and the call succeeds.
    pub async fn save_edit(&mut self, id: RecordId, draft: TransactionDraft) -> Result<(), Error> {
        draft.validate(OffsetDateTime::now_utc().date())?;

        match self.api.update_transaction(id, &draft).await {
            Ok(updated) => {
                self.controller.update(id, |transaction| *transaction = updated.clone());
                Ok(())
            }
            Err(Error::NotFound) => {
                self.controller.remove(id);
                Ok(())
            }
            Err(error) => {
                tracing::error!("failed to update transaction {id}: {error}");
                Err(error)
            }
        }
    }

    /// Delete the row on the server, then locally.
    ///
    /// The caller is expected to have confirmed the action with the user.
    /// On failure the local rows are unchanged; [Error::NotFound] counts as
    /// success since the row is already gone.
    pub async fn delete(&mut self, id: RecordId) -> Result<(), Error> {
        match self.api.delete_transaction(id).await {
            Ok(()) | Err(Error::NotFound) => {
                self.controller.remove(id);
                Ok(())
            }
            Err(error) => {
                tracing::error!("failed to delete transaction {id}: {error}");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod draft_tests {
    use time::macros::date;

    use crate::Error;

    use super::{TransactionDraft, TransactionKind};

    fn draft(description: &str, date: time::Date) -> TransactionDraft {
        TransactionDraft {
            amount: 12.5,
            date,
            description: description.to_owned(),
            category: "Food".to_owned(),
            kind: TransactionKind::Expense,
        }
    }

    #[test]
    fn validate_rejects_future_dates() {
        let today = date!(2026 - 08 - 28);

        let result = draft("Coffee", date!(2026 - 08 - 29)).validate(today);

        assert_eq!(result, Err(Error::FutureDate(date!(2026 - 08 - 29))));
    }

    #[test]
    fn validate_accepts_today() {
        let today = date!(2026 - 08 - 28);

        assert_eq!(draft("Coffee", today).validate(today), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_descriptions() {
        let today = date!(2026 - 08 - 28);

        let result = draft("   ", date!(2026 - 08 - 01)).validate(today);

        assert_eq!(result, Err(Error::EmptyField("description")));
    }

    #[test]
    fn wire_format_uses_lowercase_kind_and_iso_dates() {
        let value = serde_json::to_value(draft("Coffee", date!(2026 - 08 - 15))).unwrap();

        assert_eq!(value["kind"], "expense");
        assert_eq!(value["date"], "2026-08-15");
    }
}
