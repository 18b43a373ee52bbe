//! In-memory record API used as the local development fallback.

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    mapper::{entities, fields},
    ports::{
        FetchResponse, ID_FIELD, NAME_FIELD, OrderBy, QueryParams, Record, RecordClient,
        RecordClientError, RecordClientResult, SortDirection, WriteResponse, WriteResult,
        record_id,
    },
};

const TASK_FIXTURES: &str = include_str!("fixtures/tasks.json");
const CATEGORY_FIXTURES: &str = include_str!("fixtures/categories.json");

/// Thread-safe in-memory implementation of the record API.
///
/// Identifiers are assigned sequentially as `max + 1` per entity. Relation
/// fields are stored as foreign keys and expanded to `{Id, Name}` objects on
/// read, as the remote API does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordClient {
    state: Arc<RwLock<InMemoryRecordState>>,
}

#[derive(Debug, Default)]
struct InMemoryRecordState {
    tables: HashMap<String, Vec<Record>>,
    /// `(entity, field)` to target entity.
    relations: HashMap<(String, String), String>,
}

impl InMemoryRecordClient {
    /// Creates an empty client that knows the task-to-category relation.
    #[must_use]
    pub fn new() -> Self {
        Self::default().with_relation(entities::TASK, fields::CATEGORY, entities::CATEGORY)
    }

    /// Creates a client seeded with the bundled sample tasks and categories.
    ///
    /// # Errors
    ///
    /// Returns [`RecordClientError::Malformed`] if the bundled fixtures cannot
    /// be parsed.
    pub fn with_fixtures() -> RecordClientResult<Self> {
        let client = Self::new();
        client.seed(entities::CATEGORY, parse_fixture(CATEGORY_FIXTURES)?)?;
        client.seed(entities::TASK, parse_fixture(TASK_FIXTURES)?)?;
        Ok(client)
    }

    /// Declares `field` of `entity` as a relation to `target` records.
    #[must_use]
    pub fn with_relation(self, entity: &str, field: &str, target: &str) -> Self {
        if let Ok(mut state) = self.state.write() {
            state
                .relations
                .insert((entity.to_owned(), field.to_owned()), target.to_owned());
        }
        self
    }

    /// Inserts records verbatim, keeping their identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`RecordClientError::Malformed`] when a record has no numeric
    /// `Id`, or a transport error if the state lock is poisoned.
    pub fn seed(&self, entity: &str, records: Vec<Record>) -> RecordClientResult<()> {
        let mut state = self.write_state()?;
        let table = state.tables.entry(entity.to_owned()).or_default();
        for record in records {
            if record_id(&record).is_none() {
                return Err(RecordClientError::Malformed(format!(
                    "seed record for {entity} has no Id"
                )));
            }
            table.push(record);
        }
        Ok(())
    }

    fn read_state(
        &self,
    ) -> RecordClientResult<std::sync::RwLockReadGuard<'_, InMemoryRecordState>> {
        self.state
            .read()
            .map_err(|err| RecordClientError::transport(std::io::Error::other(err.to_string())))
    }

    fn write_state(
        &self,
    ) -> RecordClientResult<std::sync::RwLockWriteGuard<'_, InMemoryRecordState>> {
        self.state
            .write()
            .map_err(|err| RecordClientError::transport(std::io::Error::other(err.to_string())))
    }
}

fn parse_fixture(raw: &str) -> RecordClientResult<Vec<Record>> {
    serde_json::from_str(raw).map_err(|err| RecordClientError::Malformed(err.to_string()))
}

impl InMemoryRecordState {
    fn table(&self, entity: &str) -> &[Record] {
        self.tables.get(entity).map(Vec::as_slice).unwrap_or_default()
    }

    fn next_id(&self, entity: &str) -> u64 {
        self.table(entity)
            .iter()
            .filter_map(record_id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Replaces stored foreign keys with `{Id, Name}` objects.
    fn expand(&self, entity: &str, record: &Record) -> Record {
        let mut expanded = record.clone();
        for ((owner, field), target) in &self.relations {
            if owner != entity {
                continue;
            }
            let Some(key) = record.get(field).and_then(Value::as_u64) else {
                continue;
            };
            if let Some(name) = self.display_name(target, key) {
                let mut relation = Record::new();
                relation.insert(ID_FIELD.to_owned(), Value::from(key));
                relation.insert(NAME_FIELD.to_owned(), Value::from(name));
                expanded.insert(field.clone(), Value::Object(relation));
            }
        }
        expanded
    }

    fn display_name(&self, entity: &str, id: u64) -> Option<String> {
        let target = self
            .table(entity)
            .iter()
            .find(|record| record_id(record) == Some(id))?;
        target
            .get(NAME_FIELD)
            .or_else(|| target.get(fields::CATEGORY_NAME))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    }

    /// Returns the first relation field of `record` pointing at a missing
    /// target record.
    fn dangling_relation(&self, entity: &str, record: &Record) -> Option<String> {
        self.relations
            .iter()
            .filter(|((owner, _), _)| owner == entity)
            .find_map(|((_, field), target)| {
                let key = record.get(field).and_then(Value::as_u64)?;
                let exists = self
                    .table(target)
                    .iter()
                    .any(|candidate| record_id(candidate) == Some(key));
                (!exists).then(|| field.clone())
            })
    }
}

fn select(record: Record, selected: &[String]) -> Record {
    if selected.is_empty() {
        return record;
    }
    record
        .into_iter()
        .filter(|(field, _)| field == ID_FIELD || selected.iter().any(|name| name == field))
        .collect()
}

fn compare_records(left: &Record, right: &Record, order_by: &[OrderBy]) -> Ordering {
    order_by.iter().fold(Ordering::Equal, |acc, clause| {
        acc.then_with(|| {
            let ordering =
                compare_values(left.get(&clause.field_name), right.get(&clause.field_name));
            match clause.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        })
    })
}

/// Orders JSON values; absent and null sort first, timestamps chronologically.
fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
                (Ok(a_time), Ok(b_time)) => a_time.cmp(&b_time),
                _ => a.cmp(b),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl RecordClient for InMemoryRecordClient {
    async fn fetch_records(
        &self,
        entity: &str,
        params: &QueryParams,
    ) -> RecordClientResult<FetchResponse> {
        let state = self.read_state()?;
        let mut records = state.table(entity).to_vec();
        records.sort_by(|left, right| compare_records(left, right, &params.order_by));
        let data = records
            .iter()
            .map(|record| select(state.expand(entity, record), &params.fields))
            .collect();
        Ok(FetchResponse::ok(data))
    }

    async fn get_record_by_id(
        &self,
        entity: &str,
        id: u64,
        params: &QueryParams,
    ) -> RecordClientResult<Option<Record>> {
        let state = self.read_state()?;
        Ok(state
            .table(entity)
            .iter()
            .find(|record| record_id(record) == Some(id))
            .map(|record| select(state.expand(entity, record), &params.fields)))
    }

    async fn create_record(
        &self,
        entity: &str,
        records: Vec<Record>,
    ) -> RecordClientResult<WriteResponse> {
        let mut state = self.write_state()?;
        let mut results = Vec::with_capacity(records.len());
        for mut record in records {
            if let Some(field) = state.dangling_relation(entity, &record) {
                results.push(WriteResult::rejected(format!(
                    "invalid lookup value for field {field}"
                )));
                continue;
            }
            let id = state.next_id(entity);
            record.insert(ID_FIELD.to_owned(), Value::from(id));
            let stored = state.expand(entity, &record);
            state
                .tables
                .entry(entity.to_owned())
                .or_default()
                .push(record);
            results.push(WriteResult::stored(stored));
        }
        Ok(WriteResponse::accepted(results))
    }

    async fn update_record(
        &self,
        entity: &str,
        records: Vec<Record>,
    ) -> RecordClientResult<WriteResponse> {
        let mut state = self.write_state()?;
        let mut results = Vec::with_capacity(records.len());
        for update in records {
            let Some(id) = record_id(&update) else {
                results.push(WriteResult::rejected("record Id is required"));
                continue;
            };
            if let Some(field) = state.dangling_relation(entity, &update) {
                results.push(WriteResult::rejected(format!(
                    "invalid lookup value for field {field}"
                )));
                continue;
            }
            let Some(stored) = state
                .tables
                .get_mut(entity)
                .and_then(|table| table.iter_mut().find(|record| record_id(record) == Some(id)))
            else {
                results.push(WriteResult::rejected(format!("record {id} not found")));
                continue;
            };
            stored.extend(update);
            let merged = stored.clone();
            results.push(WriteResult::stored(state.expand(entity, &merged)));
        }
        Ok(WriteResponse::accepted(results))
    }

    async fn delete_record(
        &self,
        entity: &str,
        record_ids: Vec<u64>,
    ) -> RecordClientResult<WriteResponse> {
        let mut state = self.write_state()?;
        let table = state.tables.entry(entity.to_owned()).or_default();
        let results = record_ids
            .into_iter()
            .map(|id| {
                match table.iter().position(|record| record_id(record) == Some(id)) {
                    Some(index) => {
                        table.remove(index);
                        WriteResult::done()
                    }
                    None => WriteResult::rejected(format!("record {id} not found")),
                }
            })
            .collect();
        Ok(WriteResponse::accepted(results))
    }
}
