//! The task list screen.
//!
//! Tasks are the one screen with no remote endpoint: the list is seeded
//! locally at construction and every action applies synchronously. The
//! shared kind filter doubles as a status filter since a task's kind is its
//! "open"/"done" status.

use time::Date;

use crate::{
    Error,
    controller::ListController,
    criteria::{CriteriaPatch, Record, RecordId},
    pagination::{PageWindow, PaginationConfig},
};

/// A to-do item.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// The ID of the task.
    pub id: RecordId,
    /// What needs doing.
    pub title: String,
    /// When it should be done by, if there is a deadline.
    pub due: Option<Date>,
    /// Whether it has been done.
    pub done: bool,
}

impl Record for Task {
    fn id(&self) -> RecordId {
        self.id
    }

    fn search_text(&self) -> String {
        self.title.clone()
    }

    fn kind(&self) -> Option<&str> {
        Some(if self.done { "done" } else { "open" })
    }

    fn date(&self) -> Option<Date> {
        self.due
    }
}

/// The starter tasks shown on a fresh screen.
fn seed_tasks() -> Vec<Task> {
    let titles = [
        "Review last month's spending",
        "Set a grocery budget",
        "Categorize imported transactions",
        "Link the Telegram bot",
        "Export a spending report",
    ];

    titles
        .iter()
        .enumerate()
        .map(|(index, title)| Task {
            id: index as RecordId + 1,
            title: (*title).to_owned(),
            due: None,
            done: false,
        })
        .collect()
}

/// The view model behind the task list screen.
pub struct TasksScreen {
    controller: ListController<Task>,
    next_id: RecordId,
}

impl TasksScreen {
    /// A screen pre-populated with the seed tasks.
    pub fn new(config: PaginationConfig) -> Self {
        let tasks = seed_tasks();
        let next_id = tasks.len() as RecordId + 1;

        Self {
            controller: ListController::seeded(config, tasks),
            next_id,
        }
    }

    /// Add a task to the end of the list and return its id.
    ///
    /// # Errors
    /// Returns [Error::EmptyField] for a blank title.
    pub fn add(&mut self, title: &str, due: Option<Date>) -> Result<RecordId, Error> {
        let title = title.trim();

        if title.is_empty() {
            return Err(Error::EmptyField("task title"));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.controller.push(Task {
            id,
            title: title.to_owned(),
            due,
            done: false,
        });

        Ok(id)
    }

    /// Flip the done status of the task with `id`.
    ///
    /// An absent id is a no-op; the return value reports whether a task was
    /// toggled.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        self.controller.update(id, |task| task.done = !task.done)
    }

    /// Rewrite the title and deadline of the task with `id`.
    ///
    /// An absent id is a no-op.
    ///
    /// # Errors
    /// Returns [Error::EmptyField] for a blank title, leaving the task
    /// unchanged.
    pub fn edit(&mut self, id: RecordId, title: &str, due: Option<Date>) -> Result<bool, Error> {
        let title = title.trim();

        if title.is_empty() {
            return Err(Error::EmptyField("task title"));
        }

        Ok(self.controller.update(id, |task| {
            task.title = title.to_owned();
            task.due = due;
        }))
    }

    /// Remove the task with `id`.
    ///
    /// The caller is expected to have confirmed the action with the user.
    /// An absent id is a no-op.
    pub fn delete(&mut self, id: RecordId) -> bool {
        self.controller.remove(id)
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

    /// The current page's tasks and the pagination controls.
    pub fn page(&self) -> (Vec<&Task>, PageWindow) {
        self.controller.visible_page()
    }
}
