//! The per-screen orchestration of filtering, paging, and load state.

use crate::{
    Error,
    criteria::{CriteriaPatch, Record, RecordId},
    list_model::FilterableList,
    pagination::{PageWindow, PaginationConfig, clamp_page, page_count, page_window},
};

/// Where a screen is in its fetch lifecycle.
///
/// `Idle → Loading → {Ready, Failed}`, with `Ready → Loading` on any refetch
/// trigger and `Failed → Loading` on retry. There is no terminal state; the
/// controller lives for the lifetime of its screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing has been fetched yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded and the list reflects it.
    Ready,
    /// The last fetch failed; the message is suitable for display.
    ///
    /// The list keeps its last-known-good rows.
    Failed(String),
}

/// A handle identifying one load request.
///
/// Issued by [ListController::begin_load] and checked by
/// [ListController::finish_load] so that a response arriving after a newer
/// load began is discarded instead of clobbering current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestToken {
    pub(crate) fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub(crate) fn value(self) -> u64 {
        self.0
    }
}

/// Ties a [FilterableList] to page state and the fetch lifecycle.
///
/// The controller owns two invariants that the underlying list cannot see:
/// the current page is always within `[1, max(page_count, 1)]`, and any
/// filter change snaps back to page 1. Every mutating method re-establishes
/// the first invariant before returning.
#[derive(Debug)]
pub struct ListController<R: Record> {
    list: FilterableList<R>,
    config: PaginationConfig,
    current_page: u64,
    load_state: LoadState,
    generation: u64,
}

impl<R: Record> ListController<R> {
    /// An empty controller using `config` for paging.
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            current_page: config.default_page,
            list: FilterableList::new(),
            config,
            load_state: LoadState::Idle,
            generation: 0,
        }
    }

    /// A controller pre-populated with `items`, e.g. local seed data.
    ///
    /// Starts in the `Ready` state since there is nothing to fetch.
    pub fn seeded(config: PaginationConfig, items: Vec<R>) -> Self {
        let mut controller = Self::new(config);
        controller.list.replace_items(items);
        controller.load_state = LoadState::Ready;
        controller
    }

    /// The pagination config this screen was built with.
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Where the screen is in its fetch lifecycle.
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// The 1-indexed page currently displayed.
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// The number of pages the filtered rows span.
    pub fn page_count(&self) -> u64 {
        page_count(self.list.visible_count(), self.config.page_size)
    }

    /// The underlying list, for read access to rows and criteria.
    pub fn list(&self) -> &FilterableList<R> {
        &self.list
    }

    /// The rows matching the active criteria, in original order.
    pub fn visible_items(&self) -> Vec<&R> {
        self.list.visible().collect()
    }

    /// The pagination controls for the current state.
    pub fn window(&self) -> PageWindow {
        page_window(self.current_page, self.page_count(), self.config.max_pages)
    }

    /// The current page's rows together with the pagination controls.
    pub fn visible_page(&self) -> (Vec<&R>, PageWindow) {
        (
            self.list.page_of(self.current_page, self.config.page_size),
            self.window(),
        )
    }

    /// Mark a fetch as started and get the token its response must present.
    ///
    /// Starting a new load supersedes any load still in flight: the older
    /// response's token will no longer match and its outcome is dropped.
    pub fn begin_load(&mut self) -> RequestToken {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        RequestToken(self.generation)
    }

    /// Apply the outcome of the fetch identified by `token`.
    ///
    /// Returns `false` without touching any state when `token` is stale,
    /// i.e. a newer load has begun since it was issued. On success the raw
    /// rows are replaced wholesale; on failure they are left as they were
    /// and only the load state records the error.
    pub fn finish_load(&mut self, token: RequestToken, result: Result<Vec<R>, Error>) -> bool {
        if token.0 != self.generation {
            tracing::debug!(
                "dropping stale load response (token {} != current {})",
                token.0,
                self.generation
            );
            return false;
        }

        match result {
            Ok(items) => {
                self.list.replace_items(items);
                self.load_state = LoadState::Ready;
            }
            Err(error) => {
                tracing::error!("load failed: {error}");
                self.load_state = LoadState::Failed(error.to_string());
            }
        }

        self.clamp();
        true
    }

    /// Merge `patch` into the filter criteria and return to page 1.
    pub fn apply_filter(&mut self, patch: CriteriaPatch) {
        self.list.criteria_mut().apply(patch);
        self.current_page = 1;
    }

    /// Drop every filter constraint and return to page 1.
    pub fn clear_filter(&mut self) {
        self.list.set_criteria(Default::default());
        self.current_page = 1;
    }

    /// Navigate to `page` if it is within `[1, page_count]`.
    ///
    /// Out-of-range requests (including anything while the list is empty)
    /// are ignored, which makes clicking a disabled pagination control a
    /// no-op. Returns whether the navigation was accepted.
    pub fn go_to_page(&mut self, page: u64) -> bool {
        if page >= 1 && page <= self.page_count() {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// Return to page 1, e.g. when the screen switches its top-level view
    /// mode.
    pub fn reset_view(&mut self) {
        self.current_page = 1;
    }

    /// Append a row and re-clamp the current page.
    pub fn push(&mut self, item: R) {
        self.list.push(item);
        self.clamp();
    }

    /// Remove the row with `id` (absent id is a no-op) and re-clamp.
    pub fn remove(&mut self, id: RecordId) -> bool {
        let removed = self.list.remove(id);
        self.clamp();
        removed
    }

    /// Update the row with `id` (absent id is a no-op) and re-clamp.
    ///
    /// Clamping matters here too: an update can change which rows match the
    /// active criteria.
    pub fn update(&mut self, id: RecordId, patch: impl FnOnce(&mut R)) -> bool {
        let updated = self.list.update(id, patch);
        self.clamp();
        updated
    }

    /// Replace the raw rows and re-clamp.
    pub fn replace_items(&mut self, items: Vec<R>) {
        self.list.replace_items(items);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.current_page = clamp_page(self.current_page, self.page_count());
    }
}
