//! Task value object, priority levels, and the completion state machine.

use super::{ParsePriorityError, TaskId, TaskPatch};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default priority for new tasks.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Effect of writing a `completed` value onto a task.
///
/// The store derives `completed_at` from this; callers never set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChange {
    /// Completed at the given instant, from pending or from a completed
    /// state that carried no timestamp.
    Completed(DateTime<Utc>),
    /// Completed back to pending; the completion timestamp is cleared.
    Reopened,
    /// No state change, or `completed` was not part of the write.
    Unchanged,
}

/// A task as seen by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    completed: bool,
    priority: Priority,
    category: String,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a task from a persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Title, possibly empty.
    pub title: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority level.
    pub priority: Priority,
    /// Category display name; empty when uncategorised.
    pub category: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp, present only for completed tasks.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Reconstructs a task from persisted data.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            completed: data.completed,
            priority: data.priority,
            category: data.category,
            due_date: data.due_date,
            created_at: data.created_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the priority level.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the category name; empty when uncategorised.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Works out how writing `completed` changes this task's completion
    /// timestamp, comparing against the currently stored state.
    ///
    /// A completed task stored without a timestamp is stamped again.
    #[must_use]
    pub fn completion_change(&self, completed: bool, clock: &impl Clock) -> CompletionChange {
        match (self.completed, completed) {
            (false, true) => CompletionChange::Completed(clock.utc()),
            (true, true) if self.completed_at.is_none() => CompletionChange::Completed(clock.utc()),
            (true, false) => CompletionChange::Reopened,
            _ => CompletionChange::Unchanged,
        }
    }

    /// Returns true when any of title, description, or category contains the
    /// already lower-cased `needle`.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        [&self.title, &self.description, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Keeps the application-facing category name as typed by the caller.
    pub(crate) fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Merges the persisted echo of a partial update into this task.
    ///
    /// Fields written by `patch` take the persisted value, or the patch value
    /// when the write returned no record. Fields absent from the patch keep
    /// their local value. The creation timestamp never changes and the
    /// completion timestamp follows `change`.
    #[must_use]
    pub(crate) fn reconcile(
        &self,
        persisted: Option<&Self>,
        patch: &TaskPatch,
        change: CompletionChange,
    ) -> Self {
        let completed = patch.completed().unwrap_or(self.completed);
        let completed_at = match change {
            CompletionChange::Completed(at) => Some(at),
            CompletionChange::Reopened => None,
            CompletionChange::Unchanged => self.completed_at,
        };

        Self {
            id: self.id,
            title: pick(
                patch.title().map(ToOwned::to_owned),
                &self.title,
                persisted.map(|task| &task.title),
            ),
            description: pick(
                patch.description().map(ToOwned::to_owned),
                &self.description,
                persisted.map(|task| &task.description),
            ),
            completed,
            priority: pick(
                patch.priority(),
                &self.priority,
                persisted.map(|task| &task.priority),
            ),
            // Kept as typed: an unresolved name persists as a null reference.
            category: patch
                .category()
                .map_or_else(|| self.category.clone(), ToOwned::to_owned),
            due_date: pick(
                patch.due_date(),
                &self.due_date,
                persisted.map(|task| &task.due_date),
            ),
            created_at: self.created_at,
            completed_at: if completed { completed_at } else { None },
        }
    }
}

/// Chooses the merged value of one field after a partial update.
fn pick<T: Clone>(written: Option<T>, local: &T, persisted: Option<&T>) -> T {
    match written {
        None => local.clone(),
        Some(value) => persisted.cloned().unwrap_or(value),
    }
}

/// Listing order: pending before completed, newest first within each group.
#[must_use]
pub fn listing_order(left: &Task, right: &Task) -> Ordering {
    left.completed
        .cmp(&right.completed)
        .then_with(|| right.created_at.cmp(&left.created_at))
}
