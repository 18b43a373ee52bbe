//! Error types for task store mutations.

use crate::task::{
    domain::{Task, TaskId},
    ports::RecordClientError,
};
use std::time::Duration;
use thiserror::Error;

/// One record of a batch write that the persistence boundary rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Task the failed write targeted, when known.
    pub task_id: Option<TaskId>,
    /// Reason reported by the persistence boundary.
    pub message: String,
}

impl RecordFailure {
    pub(crate) fn new(task_id: Option<TaskId>, message: Option<String>) -> Self {
        Self {
            task_id,
            message: message.unwrap_or_else(|| "record write failed".to_owned()),
        }
    }
}

/// Errors returned by task store mutations.
///
/// Local state is never changed for a write that did not succeed remotely.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence boundary rejected every record of the write.
    #[error("write rejected: {0}")]
    Validation(String),

    /// The mutation target is not in the local task list.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Some records of a batch were written and others were not.
    ///
    /// `applied` holds the successfully written tasks, already merged into
    /// local state.
    #[error("{} of {} records failed", .failures.len(), .failures.len() + .applied.len())]
    PartialFailure {
        /// Tasks whose writes succeeded.
        applied: Vec<Task>,
        /// Rejected records.
        failures: Vec<RecordFailure>,
    },

    /// The persistence boundary was unreachable or answered nonsense.
    #[error(transparent)]
    Transport(#[from] RecordClientError),

    /// The persistence call did not finish in time.
    #[error("persistence call timed out after {0:?}")]
    Timeout(Duration),

    /// A previous panic left the local state lock poisoned.
    #[error("task store state is poisoned")]
    StatePoisoned,
}

/// Result type for task store mutations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Joins failure messages for a fully rejected write.
pub(crate) fn rejection_message(failures: &[RecordFailure], fallback: &str) -> String {
    if failures.is_empty() {
        return fallback.to_owned();
    }
    failures
        .iter()
        .map(|failure| failure.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
