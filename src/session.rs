//! The explicit per-session application context.
//!
//! The source of truth for "who is logged in" and "which month is active" is
//! a [Session] value constructed at login and dropped at logout, passed to
//! each screen at construction. Screens never reach for ambient globals.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;

use crate::{Error, client::SessionApi, criteria::RecordId};

/// A calendar month, the scope the transaction screens fetch and display.
///
/// Construction validates the month number, so a `Month` value is always a
/// real calendar month. Displayed and serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: time::Month,
}

impl Month {
    /// Create a month from a year and a 1-indexed month number.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] when `month` is outside `1..=12` and
    /// [Error::InvalidDate] when `year` is outside the supported calendar
    /// range.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let month = time::Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

        // Rejecting out-of-range years here is what lets first_day and
        // last_day be infallible.
        Date::from_calendar_date(year, month, 1)
            .map_err(|_| Error::InvalidDate(format!("{year:04}-{:02}", u8::from(month))))?;

        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year component.
    pub fn year(self) -> i32 {
        self.year
    }

    /// The 1-indexed month number.
    pub fn month_number(self) -> u8 {
        u8::from(self.month)
    }

    /// The month after this one, rolling December over into January.
    pub fn next(self) -> Self {
        match self.month {
            time::Month::December => Self {
                year: self.year + 1,
                month: time::Month::January,
            },
            month => Self {
                year: self.year,
                month: month.next(),
            },
        }
    }

    /// The month before this one, rolling January back into December.
    pub fn previous(self) -> Self {
        match self.month {
            time::Month::January => Self {
                year: self.year - 1,
                month: time::Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    /// This month and the `count - 1` months before it, newest first.
    ///
    /// This is the option list for the navbar month dropdown.
    pub fn recent(self, count: usize) -> Vec<Month> {
        let mut months = Vec::with_capacity(count);
        let mut month = self;

        for _ in 0..count {
            months.push(month);
            month = month.previous();
        }

        months
    }

    /// The first day of the month.
    pub fn first_day(self) -> Date {
        Date::from_calendar_date(self.year, self.month, 1)
            .expect("year range was validated at construction")
    }

    /// The last day of the month.
    pub fn last_day(self) -> Date {
        let last = time::util::days_in_year_month(self.year, self.month);

        Date::from_calendar_date(self.year, self.month, last)
            .expect("year range was validated at construction")
    }

    /// Whether `date` falls within this month.
    pub fn contains(self, date: Date) -> bool {
        Month::containing(date) == self
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| Error::InvalidDate(s.to_owned()))?;

        let year: i32 = year
            .parse()
            .map_err(|_| Error::InvalidDate(s.to_owned()))?;
        let month: u8 = month
            .parse()
            .map_err(|_| Error::InvalidDate(s.to_owned()))?;

        Month::new(year, month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The profile of the logged-in user, as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID.
    pub id: RecordId,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// Whether the user may manage provider accounts.
    pub is_admin: bool,
}

/// A transaction category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The category's ID.
    pub id: RecordId,
    /// The category's display name.
    pub name: String,
}

/// The application context for one logged-in user.
///
/// Created by [Session::start] after authentication and dropped at logout.
pub struct Session {
    api: Arc<dyn SessionApi>,
    user: UserProfile,
    active_month: Month,
    categories: Vec<Category>,
}

impl Session {
    /// Fetch the user's profile and categories and build the session.
    pub async fn start(api: Arc<dyn SessionApi>, active_month: Month) -> Result<Self, Error> {
        let user = api.profile().await?;
        let categories = api.categories().await?;

        tracing::info!("session started for {}", user.email);

        Ok(Self {
            api,
            user,
            active_month,
            categories,
        })
    }

    /// The logged-in user.
    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// The month the transaction screens are scoped to.
    pub fn active_month(&self) -> Month {
        self.active_month
    }

    /// Switch the active month.
    pub fn set_active_month(&mut self, month: Month) {
        self.active_month = month;
    }

    /// The months offered by the navbar dropdown: the active month and the
    /// `count - 1` months before it, newest first.
    pub fn month_options(&self, count: usize) -> Vec<Month> {
        self.active_month.recent(count)
    }

    /// The user's categories, in the order the server returned them.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Create a category and append it to the local list.
    ///
    /// # Errors
    /// Returns [Error::EmptyField] for a blank name without calling the API,
    /// or the API's error with the local list unchanged.
    pub async fn add_category(&mut self, name: &str) -> Result<&Category, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyField("category name"));
        }

        let category = self.api.add_category(name).await?;
        self.categories.push(category);

        Ok(self.categories.last().expect("category was just pushed"))
    }

    /// Delete a category.
    ///
    /// A [Error::NotFound] from the API means another session already
    /// deleted it; the category is dropped locally and the call succeeds.
    pub async fn remove_category(&mut self, id: RecordId) -> Result<(), Error> {
        match self.api.delete_category(id).await {
            Ok(()) | Err(Error::NotFound) => {
                self.categories.retain(|category| category.id != id);
                Ok(())
            }
            Err(error) => {
                tracing::error!("failed to delete category {id}: {error}");
                Err(error)
            }
        }
    }
}


#[cfg(test)]
mod session_tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::{Error, client::SessionApi, criteria::RecordId};

    use super::{Category, Month, Session, UserProfile};

    struct FakeSessionApi {
        fail_delete: Option<Error>,
    }

    #[async_trait]
    impl SessionApi for FakeSessionApi {
        async fn profile(&self) -> Result<UserProfile, Error> {
            Ok(UserProfile {
                id: 1,
                name: "Ana".to_owned(),
                email: "ana@example.com".to_owned(),
                is_admin: false,
            })
        }

        async fn categories(&self) -> Result<Vec<Category>, Error> {
            Ok(vec![
                Category {
                    id: 1,
                    name: "Food".to_owned(),
                },
                Category {
                    id: 2,
                    name: "Travel".to_owned(),
                },
            ])
        }

        async fn add_category(&self, name: &str) -> Result<Category, Error> {
            Ok(Category {
                id: 3,
                name: name.to_owned(),
            })
        }

        async fn delete_category(&self, _id: RecordId) -> Result<(), Error> {
            match &self.fail_delete {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    async fn start_session(fail_delete: Option<Error>) -> Session {
        Session::start(
            Arc::new(FakeSessionApi { fail_delete }),
            Month::new(2026, 8).unwrap(),
        )
        .await
        .expect("session should start")
    }

    #[tokio::test]
    async fn start_loads_profile_and_categories() {
        let session = start_session(None).await;

        assert_eq!(session.user().name, "Ana");
        assert_eq!(session.categories().len(), 2);
    }

    #[tokio::test]
    async fn blank_category_names_are_rejected_locally() {
        let mut session = start_session(None).await;

        let result = session.add_category("   ").await;

        assert_eq!(result.unwrap_err(), Error::EmptyField("category name"));
        assert_eq!(session.categories().len(), 2);
    }

    #[tokio::test]
    async fn added_category_appears_in_the_list() {
        let mut session = start_session(None).await;

        session.add_category("Rent").await.unwrap();

        assert_eq!(session.categories().last().unwrap().name, "Rent");
    }

    #[tokio::test]
    async fn removing_an_already_deleted_category_is_a_no_op() {
        let mut session = start_session(Some(Error::NotFound)).await;

        session.remove_category(2).await.unwrap();

        assert_eq!(session.categories().len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_leaves_categories_unchanged() {
        let mut session = start_session(Some(Error::Api("500".to_owned()))).await;

        let result = session.remove_category(2).await;

        assert!(result.is_err());
        assert_eq!(session.categories().len(), 2);
    }

    #[tokio::test]
    async fn month_options_start_at_the_active_month() {
        let session = start_session(None).await;

        let months = session.month_options(3);

        assert_eq!(
            months,
            vec![
                Month::new(2026, 8).unwrap(),
                Month::new(2026, 7).unwrap(),
                Month::new(2026, 6).unwrap(),
            ]
        );
    }
}
