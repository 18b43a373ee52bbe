//! Assignee values and record mapping.

use crate::task::ports::{NAME_FIELD, Record, record_id};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Names created when the assignee entity is found empty.
pub const INITIAL_ASSIGNEES: [&str; 3] = ["David Chen", "Sarah Johnson", "Jennifer Park"];

/// Identifier of a persisted assignee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssigneeId(u64);

impl AssigneeId {
    /// Wraps a persistence-assigned record identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssigneeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person tasks can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    id: AssigneeId,
    name: String,
}

impl Assignee {
    /// Creates an assignee value.
    #[must_use]
    pub fn new(id: AssigneeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Maps an assignee record; a missing name reads as empty.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self::new(
            AssigneeId::new(record_id(record).unwrap_or_default()),
            record
                .get(NAME_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default(),
        )
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> AssigneeId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builds the record fields written for an assignee name.
pub(crate) fn name_record(name: &str) -> Record {
    let mut record = Record::new();
    record.insert(NAME_FIELD.to_owned(), Value::from(name));
    record
}
