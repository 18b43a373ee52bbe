//! Translation between persistence records and task/category values.
//!
//! Reading never fails: every missing, null, or unreadable field falls back
//! to its default. Writing only emits the fields a payload carries.

use crate::task::{
    domain::{
        Category, CategoryId, CompletionChange, DEFAULT_CATEGORY_COLOR, NewTask,
        PersistedTaskData, Priority, Task, TaskId, TaskPatch, resolve_category_id,
    },
    ports::{ID_FIELD, NAME_FIELD, Record, record_id},
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

/// Entity names used by the record API.
pub mod entities {
    /// Task records.
    pub const TASK: &str = "task_c";
    /// Category records.
    pub const CATEGORY: &str = "category_c";
    /// Assignee records.
    pub const ASSIGNEE: &str = "assignee_c";
}

/// Field names of task and category records.
pub mod fields {
    /// Task title.
    pub const TITLE: &str = "title_c";
    /// Task description.
    pub const DESCRIPTION: &str = "description_c";
    /// Task completion flag.
    pub const COMPLETED: &str = "completed_c";
    /// Task priority.
    pub const PRIORITY: &str = "priority_c";
    /// Task category relation (foreign key to `category_c`).
    pub const CATEGORY: &str = "category_c";
    /// Task due date.
    pub const DUE_DATE: &str = "due_date_c";
    /// Task creation timestamp.
    pub const CREATED_AT: &str = "created_at_c";
    /// Task completion timestamp.
    pub const COMPLETED_AT: &str = "completed_at_c";
    /// Category name.
    pub const CATEGORY_NAME: &str = "name_c";
    /// Category colour.
    pub const CATEGORY_COLOR: &str = "color_c";

    /// Every field read from task records.
    pub const TASK_FIELDS: [&str; 9] = [
        super::ID_FIELD,
        TITLE,
        DESCRIPTION,
        COMPLETED,
        PRIORITY,
        CATEGORY,
        DUE_DATE,
        CREATED_AT,
        COMPLETED_AT,
    ];

    /// Every field read from category records.
    pub const CATEGORY_FIELDS: [&str; 4] = [
        super::ID_FIELD,
        super::NAME_FIELD,
        CATEGORY_NAME,
        CATEGORY_COLOR,
    ];
}

/// Maps a task record to a task, using `now` for a missing creation time.
#[must_use]
pub fn to_task(record: &Record, now: DateTime<Utc>) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(record_id(record).unwrap_or_default()),
        title: read_text(record, fields::TITLE).unwrap_or_default().to_owned(),
        description: read_text(record, fields::DESCRIPTION)
            .unwrap_or_default()
            .to_owned(),
        completed: read_flag(record, fields::COMPLETED),
        priority: read_text(record, fields::PRIORITY)
            .and_then(|value| Priority::try_from(value).ok())
            .unwrap_or_default(),
        category: read_relation_name(record, fields::CATEGORY)
            .unwrap_or_default()
            .to_owned(),
        due_date: read_text(record, fields::DUE_DATE).and_then(parse_date),
        created_at: read_text(record, fields::CREATED_AT)
            .and_then(parse_timestamp)
            .unwrap_or(now),
        completed_at: read_text(record, fields::COMPLETED_AT).and_then(parse_timestamp),
    })
}

/// Maps a category record to a category counted against `tasks`.
#[must_use]
pub fn to_category(record: &Record, tasks: &[Task]) -> Category {
    let name = read_text(record, fields::CATEGORY_NAME)
        .or_else(|| read_text(record, NAME_FIELD))
        .unwrap_or_default();
    let color = read_text(record, fields::CATEGORY_COLOR).unwrap_or(DEFAULT_CATEGORY_COLOR);
    Category::new(
        CategoryId::new(record_id(record).unwrap_or_default()),
        name,
        color,
    )
    .counted(tasks)
}

/// Builds the record written when creating a task.
///
/// Completion state and creation time are always the defaults for a new
/// task. The category name is resolved to a foreign key; an unresolved name
/// is written as `null`.
#[must_use]
pub fn new_task_to_record(task: &NewTask, categories: &[Category], now: DateTime<Utc>) -> Record {
    let mut record = Record::new();
    record.insert(fields::TITLE.to_owned(), Value::from(task.title()));
    record.insert(fields::DESCRIPTION.to_owned(), Value::from(task.description()));
    record.insert(fields::COMPLETED.to_owned(), Value::Bool(false));
    record.insert(
        fields::PRIORITY.to_owned(),
        Value::from(task.priority().as_str()),
    );
    record.insert(
        fields::CATEGORY.to_owned(),
        category_reference(task.category(), categories),
    );
    record.insert(fields::DUE_DATE.to_owned(), date_value(task.due_date()));
    record.insert(fields::CREATED_AT.to_owned(), timestamp_value(Some(now)));
    record.insert(fields::COMPLETED_AT.to_owned(), Value::Null);
    record
}

/// Builds the record written for a partial update.
///
/// Only fields present in `patch` are emitted, plus the completion timestamp
/// when `change` flips the completion state.
#[must_use]
pub fn patch_to_record(
    id: TaskId,
    patch: &TaskPatch,
    categories: &[Category],
    change: CompletionChange,
) -> Record {
    let mut record = Record::new();
    record.insert(ID_FIELD.to_owned(), Value::from(id.value()));
    if let Some(title) = patch.title() {
        record.insert(fields::TITLE.to_owned(), Value::from(title));
    }
    if let Some(description) = patch.description() {
        record.insert(fields::DESCRIPTION.to_owned(), Value::from(description));
    }
    if let Some(completed) = patch.completed() {
        record.insert(fields::COMPLETED.to_owned(), Value::Bool(completed));
    }
    if let Some(priority) = patch.priority() {
        record.insert(fields::PRIORITY.to_owned(), Value::from(priority.as_str()));
    }
    if let Some(category) = patch.category() {
        record.insert(
            fields::CATEGORY.to_owned(),
            category_reference(category, categories),
        );
    }
    if let Some(due_date) = patch.due_date() {
        record.insert(fields::DUE_DATE.to_owned(), date_value(due_date));
    }
    match change {
        CompletionChange::Completed(at) => {
            record.insert(fields::COMPLETED_AT.to_owned(), timestamp_value(Some(at)));
        }
        CompletionChange::Reopened => {
            record.insert(fields::COMPLETED_AT.to_owned(), Value::Null);
        }
        CompletionChange::Unchanged => {}
    }
    record
}

fn category_reference(name: &str, categories: &[Category]) -> Value {
    resolve_category_id(name, categories).map_or(Value::Null, |id| Value::from(id.value()))
}

fn date_value(date: Option<NaiveDate>) -> Value {
    date.map_or(Value::Null, |day| {
        Value::from(day.format("%Y-%m-%d").to_string())
    })
}

fn timestamp_value(at: Option<DateTime<Utc>>) -> Value {
    at.map_or(Value::Null, |instant| {
        Value::from(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    })
}

/// Reads a non-empty string field.
fn read_text<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// Reads a boolean field; anything not clearly true is false.
fn read_flag(record: &Record, field: &str) -> bool {
    match record.get(field) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(number)) => number.as_u64().is_some_and(|value| value != 0),
        _ => false,
    }
}

/// Reads the display name of a relation field.
///
/// Relations arrive as `{Id, Name}` objects; a plain string is taken as the
/// name itself. A bare foreign key carries no name and reads as absent.
fn read_relation_name<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    match record.get(field)? {
        Value::Object(relation) => relation
            .get(NAME_FIELD)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty()),
        Value::String(name) if !name.is_empty() => Some(name.as_str()),
        _ => None,
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Parses a calendar date, accepting a full timestamp as well.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(trimmed).map(|instant| instant.date_naive()))
}
