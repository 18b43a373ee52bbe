//! Record builders shared by task unit tests.

use crate::task::ports::Record;
use serde_json::{Value, json};

/// Converts a JSON object literal into a record.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Builds a stored category record.
pub fn category_record(id: u64, name: &str) -> Record {
    record(json!({
        "Id": id,
        "Name": name,
        "name_c": name,
        "color_c": "#f59e0b",
    }))
}

/// Builds a stored task record referencing a category by foreign key.
pub fn task_record(id: u64, title: &str, category_id: Option<u64>, created_at: &str) -> Record {
    record(json!({
        "Id": id,
        "title_c": title,
        "description_c": "",
        "completed_c": false,
        "priority_c": "Medium",
        "category_c": category_id,
        "due_date_c": null,
        "created_at_c": created_at,
        "completed_at_c": null,
    }))
}
