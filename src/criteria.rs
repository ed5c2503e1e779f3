//! Filter criteria and the record seam shared by every list screen.
//!
//! Transactions, tasks, admin log entries, and provider accounts are all
//! filtered the same way: a case-insensitive text search, optional exact
//! category and kind constraints, and an inclusive date range, combined with
//! logical AND. The [Record] trait is what lets one filter implementation
//! serve all of them.

use time::Date;

/// The stable identifier of a list row.
pub type RecordId = i64;

/// A single row in a list view.
///
/// The accessors with default implementations return `None`, meaning the row
/// type has no such field and any filter constraining it excludes the row.
pub trait Record {
    /// The unique, stable identifier of this row.
    fn id(&self) -> RecordId;

    /// The text the search box matches against, e.g. a transaction's
    /// description and category concatenated.
    fn search_text(&self) -> String;

    /// The row's category, if the row type has one.
    fn category(&self) -> Option<&str> {
        None
    }

    /// The row's kind (e.g. "income"/"expense" or a task's status), if any.
    fn kind(&self) -> Option<&str> {
        None
    }

    /// The row's calendar date, if the row type has one.
    fn date(&self) -> Option<Date> {
        None
    }
}

/// The set of active constraints narrowing which rows are visible.
///
/// Every field is optional: an empty string or `None` means "no constraint",
/// and the default value matches every row. Active constraints combine with
/// logical AND.
///
/// An inverted date range (`date_from` after `date_to`) is not rejected; the
/// model only compares, so such a range simply matches nothing. Validating
/// the input is the form layer's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring to search for. Empty means no constraint.
    pub search_text: String,
    /// Exact category to match. Empty means "All".
    pub category: String,
    /// Exact kind to match. Empty means "All".
    pub kind: String,
    /// Inclusive lower bound on the row date.
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the row date.
    pub date_to: Option<Date>,
}

impl FilterCriteria {
    /// Whether no constraint is active, i.e. every row is visible.
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty()
            && self.category.is_empty()
            && self.kind.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Merge `patch` into the active criteria, field by field.
    pub fn apply(&mut self, patch: CriteriaPatch) {
        if let Some(search_text) = patch.search_text {
            self.search_text = search_text;
        }

        if let Some(category) = patch.category {
            self.category = category;
        }

        if let Some(kind) = patch.kind {
            self.kind = kind;
        }

        if let Some(date_from) = patch.date_from {
            self.date_from = date_from;
        }

        if let Some(date_to) = patch.date_to {
            self.date_to = date_to;
        }
    }

    /// Whether `record` satisfies every active constraint.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        if !self.search_text.is_empty() {
            let needle = self.search_text.to_lowercase();

            if !record.search_text().to_lowercase().contains(&needle) {
                return false;
            }
        }

        if !self.category.is_empty() && record.category() != Some(self.category.as_str()) {
            return false;
        }

        if !self.kind.is_empty() && record.kind() != Some(self.kind.as_str()) {
            return false;
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let date = match record.date() {
                Some(date) => date,
                None => return false,
            };

            if let Some(from) = self.date_from {
                if date < from {
                    return false;
                }
            }

            if let Some(to) = self.date_to {
                if date > to {
                    return false;
                }
            }
        }

        true
    }
}

/// A partial edit of [FilterCriteria], as produced by a single filter input.
///
/// `None` leaves the corresponding field untouched; `Some` replaces it. The
/// date bounds are doubly optional so a patch can also clear a bound
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct CriteriaPatch {
    /// Replacement for the search text.
    pub search_text: Option<String>,
    /// Replacement for the category constraint.
    pub category: Option<String>,
    /// Replacement for the kind constraint.
    pub kind: Option<String>,
    /// Replacement for the lower date bound.
    pub date_from: Option<Option<Date>>,
    /// Replacement for the upper date bound.
    pub date_to: Option<Option<Date>>,
}

impl CriteriaPatch {
    /// A patch that sets the search text.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A patch that sets the category constraint.
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// A patch that sets the kind constraint.
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// A patch that sets both date bounds.
    pub fn date_range(from: Option<Date>, to: Option<Date>) -> Self {
        Self {
            date_from: Some(from),
            date_to: Some(to),
            ..Self::default()
        }
    }
}
