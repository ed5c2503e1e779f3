//! Ledgerview is the list view-model core of a personal finance front-end.
//!
//! Every screen in the application is a thin client over a remote REST API:
//! it fetches a collection of rows, filters them locally, pages them, and
//! dispatches user actions (toggle, edit, delete) back to the collection or
//! the API. This crate implements that shared machinery:
//!
//! - [pagination]: computing the window of page indicators to render.
//! - [criteria]: filter criteria and the [Record](criteria::Record) seam
//!   shared by every row type.
//! - [list_model]: the raw collection plus its derived visible subset.
//! - [controller]: the per-screen orchestration of paging, filtering, and
//!   load state.
//! - [client] and [http]: the typed contracts for the remote API and their
//!   reqwest-backed implementation.
//! - [transaction], [task], [admin], [telegram], [session]: the concrete
//!   screens built from the above.
//!
//! The rendering layer, routing, and the remote API itself are external
//! collaborators; this crate only exposes derived view data and action
//! dispatchers.

#![warn(missing_docs)]

use time::Date;

pub mod admin;
pub mod client;
pub mod controller;
pub mod criteria;
pub mod http;
pub mod list_model;
pub mod pagination;
pub mod session;
pub mod task;
pub mod telegram;
pub mod transaction;

pub use controller::{ListController, LoadState, RequestToken};
pub use criteria::{CriteriaPatch, FilterCriteria, Record, RecordId};
pub use list_model::FilterableList;
pub use pagination::{PageWindow, PaginationConfig, PaginationIndicator};
pub use session::{Month, Session};

/// The errors that may occur in the application.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A form was submitted with a required field left empty.
    #[error("a required field was left empty: {0}")]
    EmptyField(&'static str),

    /// A string could not be parsed as a calendar date or month.
    #[error("could not parse {0:?} as a calendar date")]
    InvalidDate(String),

    /// A month number outside `1..=12` was used to construct a [Month].
    #[error("{0} is not a valid month number")]
    InvalidMonth(u8),

    /// A date in the future was used in a transaction.
    ///
    /// Transactions record events that have already happened, therefore
    /// future dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The requested resource was not found on the remote API.
    ///
    /// Screens acting on a row that another session already deleted should
    /// treat this as a cue to drop the stale row, not as a hard failure.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The remote API rejected a request or could not be reached.
    ///
    /// The string carries the status line or transport error for logging and
    /// for the user-visible message. The local collection is left in its
    /// last-known-good state whenever this error is returned.
    #[error("the request could not be completed: {0}")]
    Api(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Api(value.to_string())
    }
}
