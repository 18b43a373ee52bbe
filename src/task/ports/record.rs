//! Wire-level value types exchanged with the generic record API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A persistence record: flat, suffixed field names mapped to JSON values.
pub type Record = Map<String, Value>;

/// Name of the identifier field on every record.
pub const ID_FIELD: &str = "Id";

/// Name of the built-in display-name field on every record.
pub const NAME_FIELD: &str = "Name";

/// Sort direction for an ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[serde(rename = "ASC")]
    Ascending,
    /// Largest first.
    #[serde(rename = "DESC")]
    Descending,
}

/// One ordering clause of a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field to order by.
    #[serde(rename = "fieldName")]
    pub field_name: String,
    /// Direction of the ordering.
    #[serde(rename = "sorttype")]
    pub direction: SortDirection,
}

/// Field selection and ordering for a fetch.
///
/// An empty field list selects every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Selected field names.
    pub fields: Vec<String>,
    /// Ordering clauses, applied in sequence.
    #[serde(rename = "orderBy")]
    pub order_by: Vec<OrderBy>,
}

impl QueryParams {
    /// Creates parameters selecting every field in storage order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the fetch to the given fields.
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Appends an ordering clause.
    #[must_use]
    pub fn order_by(mut self, field_name: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy {
            field_name: field_name.into(),
            direction,
        });
        self
    }
}

/// Response to a fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Whether the fetch succeeded as a whole.
    pub success: bool,
    /// Records returned by the fetch.
    #[serde(default)]
    pub data: Vec<Record>,
    /// Failure description, when unsuccessful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchResponse {
    /// Creates a successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: Vec<Record>) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Creates a failed response with a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// Outcome of writing one record within a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteResult {
    /// Whether this record was written.
    pub success: bool,
    /// The stored record, for successful creates and updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
    /// Failure description, when unsuccessful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WriteResult {
    /// Creates a successful result carrying the stored record.
    #[must_use]
    pub const fn stored(data: Record) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Creates a successful result without a record, as deletes report.
    #[must_use]
    pub const fn done() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Response to a create, update, or delete batch.
///
/// `results` is aligned by position with the submitted records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Whether the batch was accepted at all.
    pub success: bool,
    /// Per-record outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<WriteResult>>,
    /// Failure description, when the batch was refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WriteResponse {
    /// Creates an accepted batch response.
    #[must_use]
    pub const fn accepted(results: Vec<WriteResult>) -> Self {
        Self {
            success: true,
            results: Some(results),
            message: None,
        }
    }

    /// Creates a refused batch response.
    #[must_use]
    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            message: Some(message.into()),
        }
    }
}

/// Reads the `Id` field of a record as an unsigned integer.
///
/// Numeric strings are accepted.
#[must_use]
pub fn record_id(record: &Record) -> Option<u64> {
    match record.get(ID_FIELD)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
