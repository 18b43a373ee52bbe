//! Derived views over the task list.
//!
//! Nothing here is stored; every view is recomputed from the authoritative
//! list it is given.

use super::{Priority, Task};
use serde::Serialize;

/// Tasks split by completion, each group keeping its input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionPartition {
    /// Tasks not yet completed.
    pub pending: Vec<Task>,
    /// Completed tasks.
    pub completed: Vec<Task>,
}

impl CompletionPartition {
    /// Splits `tasks` into pending and completed groups.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let (completed, pending) = tasks.into_iter().partition(Task::is_completed);
        Self { pending, completed }
    }
}

/// Combined search and filter criteria used by the task list view.
///
/// All present criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    search: String,
    category: Option<String>,
    priority: Option<Priority>,
}

impl TaskQuery {
    /// Creates a query that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text search; matching is case-insensitive.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Restricts to one category name (exact match).
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to one priority level.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns true when `task` satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let needle = normalize_search(&self.search);
        (needle.is_empty() || task.matches_search(&needle))
            && self
                .category
                .as_deref()
                .is_none_or(|category| task.category() == category)
            && self.priority.is_none_or(|priority| task.priority() == priority)
    }
}

/// Trims and lower-cases a search query.
#[must_use]
pub fn normalize_search(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Headline counters shown above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of pending tasks.
    pub pending: usize,
    /// Pending tasks with high priority.
    pub high_priority_pending: usize,
    /// Completed share as a rounded percentage; zero for an empty list.
    pub completion_rate: usize,
}

impl TaskStats {
    /// Computes counters for `tasks`.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        let high_priority_pending = tasks
            .iter()
            .filter(|task| !task.is_completed() && task.priority() == Priority::High)
            .count();
        // Round half up: (200c + t) / 2t.
        let completion_rate = completed
            .saturating_mul(200)
            .saturating_add(total)
            .checked_div(total.saturating_mul(2))
            .unwrap_or(0);

        Self {
            total,
            completed,
            pending: total.saturating_sub(completed),
            high_priority_pending,
            completion_rate,
        }
    }
}
