//! Session-owned task and category lists reconciled against the record API.

use crate::config::StoreConfig;
use crate::task::{
    adapters::{BackendError, RecordBackend},
    domain::{
        Category, CompletionChange, CompletionPartition, NewTask, Priority, Task, TaskId,
        TaskPatch, TaskQuery, TaskStats, listing_order, normalize_search,
    },
    mapper::{self, entities, fields},
    ports::{
        NAME_FIELD, QueryParams, Record, RecordClient, RecordClientError, RecordClientResult,
        SortDirection, WriteResponse, WriteResult,
    },
};
use mockable::{Clock, DefaultClock};
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::{RecordFailure, StoreError, StoreResult, rejection_message};

/// Authoritative in-memory task and category lists for one session.
///
/// Mutations go to the record API first; local state changes only after a
/// confirmed write, and each merge happens under a single write lock. Reads
/// never fail: they return empty results when state is unavailable.
pub struct TaskStore<C, K>
where
    C: RecordClient,
    K: Clock + Send + Sync,
{
    client: Arc<C>,
    clock: Arc<K>,
    request_timeout: Duration,
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<Task>,
    categories: Vec<Category>,
}

impl<C, K> Clone for TaskStore<C, K>
where
    C: RecordClient,
    K: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            clock: Arc::clone(&self.clock),
            request_timeout: self.request_timeout,
            state: Arc::clone(&self.state),
        }
    }
}

impl TaskStore<RecordBackend, DefaultClock> {
    /// Creates a store over the backend selected by `config`.
    ///
    /// The store starts empty; call [`TaskStore::refresh`] to load data.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the configured backend cannot be built.
    pub fn from_config(
        config: &StoreConfig,
        remote: Option<Arc<dyn RecordClient>>,
    ) -> Result<Self, BackendError> {
        let backend = RecordBackend::from_config(config, remote)?;
        Ok(Self::new(Arc::new(backend), Arc::new(DefaultClock), config))
    }
}

impl<C, K> TaskStore<C, K>
where
    C: RecordClient,
    K: Clock + Send + Sync,
{
    /// Creates an empty store.
    #[must_use]
    pub fn new(client: Arc<C>, clock: Arc<K>, config: &StoreConfig) -> Self {
        Self {
            client,
            clock,
            request_timeout: config.request_timeout,
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    /// Replaces local state with the persisted tasks and categories.
    ///
    /// A failed fetch leaves that list empty; the failure is logged.
    pub async fn refresh(&self) {
        let now = self.clock.utc();
        let task_params = QueryParams::new()
            .select(fields::TASK_FIELDS)
            .order_by(fields::CREATED_AT, SortDirection::Descending);
        let tasks: Vec<Task> = self
            .fetch(entities::TASK, &task_params)
            .await
            .iter()
            .map(|record| mapper::to_task(record, now))
            .collect();

        let category_params = QueryParams::new()
            .select(fields::CATEGORY_FIELDS)
            .order_by(NAME_FIELD, SortDirection::Ascending);
        let categories: Vec<Category> = self
            .fetch(entities::CATEGORY, &category_params)
            .await
            .iter()
            .map(|record| mapper::to_category(record, &tasks))
            .collect();

        match self.state.write() {
            Ok(mut state) => {
                info!(
                    tasks = tasks.len(),
                    categories = categories.len(),
                    "task store refreshed"
                );
                state.tasks = tasks;
                state.categories = categories;
            }
            Err(_) => warn!("task store state is poisoned; refresh discarded"),
        }
    }

    /// Returns every task, pending before completed and newest first within
    /// each group.
    #[must_use]
    pub fn list_all(&self) -> Vec<Task> {
        let mut tasks = self.snapshot(|state| state.tasks.clone());
        tasks.sort_by(listing_order);
        tasks
    }

    /// Returns one task, if present locally.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.snapshot(|state| state.tasks.iter().find(|task| task.id() == id).cloned())
    }

    /// Returns tasks whose title, description, or category contains `query`,
    /// ignoring case and surrounding whitespace. An empty query matches all.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Task> {
        let needle = normalize_search(query);
        self.list_all()
            .into_iter()
            .filter(|task| needle.is_empty() || task.matches_search(&needle))
            .collect()
    }

    /// Returns tasks in exactly the named category.
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<Task> {
        self.view_filtered(&TaskQuery::new().with_category(category))
    }

    /// Returns tasks with exactly the given priority.
    #[must_use]
    pub fn filter_by_priority(&self, priority: Priority) -> Vec<Task> {
        self.view_filtered(&TaskQuery::new().with_priority(priority))
    }

    /// Applies a combined search and filter and splits the result by
    /// completion, keeping listing order in both groups.
    #[must_use]
    pub fn view(&self, query: &TaskQuery) -> CompletionPartition {
        CompletionPartition::from_tasks(self.view_filtered(query))
    }

    /// Returns pending tasks, newest first.
    #[must_use]
    pub fn pending_tasks(&self) -> Vec<Task> {
        self.view(&TaskQuery::new()).pending
    }

    /// Returns completed tasks, most recently completed first.
    #[must_use]
    pub fn completed_tasks(&self) -> Vec<Task> {
        let mut completed = self.view(&TaskQuery::new()).completed;
        completed.sort_by(|left, right| right.completed_at().cmp(&left.completed_at()));
        completed
    }

    /// Returns headline counters for the current task list.
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.snapshot(|state| state.tasks.clone()))
    }

    /// Returns categories by name, each counted against the current tasks.
    #[must_use]
    pub fn list_categories(&self) -> Vec<Category> {
        let mut categories = self.snapshot(|state| {
            state
                .categories
                .iter()
                .map(|category| category.clone().counted(&state.tasks))
                .collect::<Vec<_>>()
        });
        categories.sort_by(|left, right| left.name().cmp(right.name()));
        categories
    }

    /// Creates a task as pending, stamped with the current time, and puts it
    /// at the front of the local list.
    ///
    /// The returned task keeps the category name as typed even when no
    /// category of that name exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when the record API rejects the
    /// write, or a transport or timeout error. The local list is unchanged on
    /// error.
    pub async fn create(&self, new_task: NewTask) -> StoreResult<Task> {
        let now = self.clock.utc();
        let categories = self.read_state()?.categories.clone();
        let record = mapper::new_task_to_record(&new_task, &categories, now);
        debug!(title = new_task.title(), "creating task");

        let response = self
            .bounded(self.client.create_record(entities::TASK, vec![record]))
            .await?;
        let result = accepted_results(response, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Validation("task creation returned no result".to_owned()))?;
        if !result.success {
            let failure = RecordFailure::new(None, result.message);
            warn!(message = %failure.message, "task creation rejected");
            return Err(StoreError::Validation(failure.message));
        }
        let stored = result.data.ok_or_else(|| {
            RecordClientError::Malformed("created record missing from response".to_owned())
        })?;

        let mut task = mapper::to_task(&stored, now);
        task.set_category(new_task.category());
        self.write_state()?.tasks.insert(0, task.clone());
        info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Applies a partial update to one task.
    ///
    /// Absent fields are left alone. Writing `completed` stamps or clears the
    /// completion time when the state flips, and stamps a completed task
    /// that has no completion time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the task is not in the local
    /// list (no remote call is made), [`StoreError::Validation`] when the
    /// record API rejects the write, or a transport or timeout error.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.update_many(vec![(id, patch)])
            .await?
            .pop()
            .ok_or_else(|| StoreError::Validation(format!("update of task {id} returned no task")))
    }

    /// Marks a task completed or pending.
    ///
    /// # Errors
    ///
    /// As [`TaskStore::update`].
    pub async fn toggle_complete(&self, id: TaskId, completed: bool) -> StoreResult<Task> {
        self.update(id, TaskPatch::completion(completed)).await
    }

    /// Applies several partial updates in one batch write.
    ///
    /// Successful writes are merged locally even when others fail.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the first unknown id before any
    /// remote call, [`StoreError::Validation`] when every record is rejected,
    /// [`StoreError::PartialFailure`] when only some are, or a transport or
    /// timeout error.
    pub async fn update_many(&self, updates: Vec<(TaskId, TaskPatch)>) -> StoreResult<Vec<Task>> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }
        for (id, patch) in &updates {
            if patch.is_empty() {
                debug!(task_id = %id, "update carries no field changes");
            }
        }
        let (targets, categories) = {
            let state = self.read_state()?;
            let targets = updates
                .iter()
                .map(|(id, _)| {
                    state
                        .tasks
                        .iter()
                        .find(|task| task.id() == *id)
                        .cloned()
                        .ok_or(StoreError::NotFound(*id))
                })
                .collect::<StoreResult<Vec<Task>>>()?;
            (targets, state.categories.clone())
        };

        let changes: Vec<CompletionChange> = targets
            .iter()
            .zip(&updates)
            .map(|(task, (_, patch))| {
                patch
                    .completed()
                    .map_or(CompletionChange::Unchanged, |completed| {
                        task.completion_change(completed, &*self.clock)
                    })
            })
            .collect();
        let records: Vec<Record> = updates
            .iter()
            .zip(&changes)
            .map(|((id, patch), change)| mapper::patch_to_record(*id, patch, &categories, *change))
            .collect();
        debug!(count = records.len(), "updating tasks");

        let response = self
            .bounded(self.client.update_record(entities::TASK, records))
            .await?;
        let results = accepted_results(response, updates.len())?;

        let now = self.clock.utc();
        let mut state = self.write_state()?;
        let mut applied = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (((target, (id, patch)), change), result) in
            targets.iter().zip(&updates).zip(changes).zip(results)
        {
            if !result.success {
                failures.push(RecordFailure::new(Some(*id), result.message));
                continue;
            }
            let persisted = result.data.as_ref().map(|data| mapper::to_task(data, now));
            // Only the patched fields overwrite the current slot.
            let merged = match state.tasks.iter_mut().find(|local| local.id() == *id) {
                Some(slot) => {
                    *slot = slot.reconcile(persisted.as_ref(), patch, change);
                    slot.clone()
                }
                None => {
                    debug!(task_id = %id, "task removed while its update was in flight");
                    target.reconcile(persisted.as_ref(), patch, change)
                }
            };
            applied.push(merged);
        }
        drop(state);
        batch_outcome(applied, failures, "update")
    }

    /// Deletes one task.
    ///
    /// Returns `Ok(true)` only when the record API confirms exactly one
    /// deletion; the task then leaves the local list. Returns `Ok(false)` for
    /// a task that is not in the local list (no remote call is made) or when
    /// the record API reports the record as not deleted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when the record API refuses the
    /// request, or a transport or timeout error. The local list is unchanged
    /// on error.
    pub async fn delete(&self, id: TaskId) -> StoreResult<bool> {
        let known = self.read_state()?.tasks.iter().any(|task| task.id() == id);
        if !known {
            debug!(task_id = %id, "delete skipped for unknown task");
            return Ok(false);
        }

        let response = self
            .bounded(self.client.delete_record(entities::TASK, vec![id.value()]))
            .await?;
        if !response.success {
            return Err(StoreError::Validation(
                response
                    .message
                    .unwrap_or_else(|| format!("delete of task {id} refused")),
            ));
        }
        let Some(results) = response.results else {
            warn!(task_id = %id, "delete response carried no results");
            return Ok(false);
        };
        let (succeeded, failed): (Vec<WriteResult>, Vec<WriteResult>) =
            results.into_iter().partition(|result| result.success);
        for failure in failed {
            warn!(task_id = %id, message = ?failure.message, "task delete rejected");
        }
        if succeeded.len() != 1 {
            return Ok(false);
        }

        self.write_state()?.tasks.retain(|task| task.id() != id);
        info!(task_id = %id, "task deleted");
        Ok(true)
    }

    /// Deletes several tasks in one batch, returning the removed tasks.
    ///
    /// Ids not in the local list are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when every record is rejected,
    /// [`StoreError::PartialFailure`] when only some are, or a transport or
    /// timeout error.
    pub async fn delete_many(&self, ids: &[TaskId]) -> StoreResult<Vec<Task>> {
        let targets: Vec<Task> = {
            let state = self.read_state()?;
            let mut targets: Vec<Task> = Vec::with_capacity(ids.len());
            for id in ids {
                if targets.iter().any(|task| task.id() == *id) {
                    continue;
                }
                if let Some(task) = state.tasks.iter().find(|task| task.id() == *id) {
                    targets.push(task.clone());
                }
            }
            targets
        };
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let record_ids = targets.iter().map(|task| task.id().value()).collect();
        let response = self
            .bounded(self.client.delete_record(entities::TASK, record_ids))
            .await?;
        let results = accepted_results(response, targets.len())?;

        let mut removed = Vec::with_capacity(targets.len());
        let mut failures = Vec::new();
        for (task, result) in targets.into_iter().zip(results) {
            if result.success {
                removed.push(task);
            } else {
                failures.push(RecordFailure::new(Some(task.id()), result.message));
            }
        }

        if !removed.is_empty() {
            self.write_state()?
                .tasks
                .retain(|task| !removed.iter().any(|gone| gone.id() == task.id()));
        }
        batch_outcome(removed, failures, "delete")
    }

    fn view_filtered(&self, query: &TaskQuery) -> Vec<Task> {
        self.list_all()
            .into_iter()
            .filter(|task| query.matches(task))
            .collect()
    }

    /// Runs `read` against local state, or returns an empty value when the
    /// state lock is poisoned.
    fn snapshot<T: Default>(&self, read: impl FnOnce(&StoreState) -> T) -> T {
        self.state.read().map_or_else(
            |_| {
                warn!("task store state is poisoned; returning empty view");
                T::default()
            },
            |state| read(&state),
        )
    }

    async fn fetch(&self, entity: &str, params: &QueryParams) -> Vec<Record> {
        match self.bounded(self.client.fetch_records(entity, params)).await {
            Ok(response) if response.success => response.data,
            Ok(response) => {
                warn!(entity, message = ?response.message, "fetch rejected");
                Vec::new()
            }
            Err(err) => {
                warn!(entity, error = %err, "fetch failed");
                Vec::new()
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = RecordClientResult<T>>,
    ) -> StoreResult<T> {
        tokio::time::timeout(self.request_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.request_timeout))?
            .map_err(StoreError::from)
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| StoreError::StatePoisoned)
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| StoreError::StatePoisoned)
    }
}

/// Unpacks an accepted batch response with one result per submitted record.
fn accepted_results(response: WriteResponse, expected: usize) -> StoreResult<Vec<WriteResult>> {
    if !response.success {
        return Err(StoreError::Validation(
            response
                .message
                .unwrap_or_else(|| "write refused".to_owned()),
        ));
    }
    let results = response.results.ok_or_else(|| {
        RecordClientError::Malformed("write response carried no results".to_owned())
    })?;
    if results.len() != expected {
        return Err(RecordClientError::Malformed(format!(
            "expected {expected} write results, got {}",
            results.len()
        ))
        .into());
    }
    Ok(results)
}

fn batch_outcome(
    applied: Vec<Task>,
    failures: Vec<RecordFailure>,
    operation: &str,
) -> StoreResult<Vec<Task>> {
    if failures.is_empty() {
        info!(count = applied.len(), operation, "task batch applied");
        return Ok(applied);
    }
    warn!(
        failed = failures.len(),
        applied = applied.len(),
        operation,
        "task batch partially rejected"
    );
    if applied.is_empty() {
        return Err(StoreError::Validation(rejection_message(
            &failures,
            "every record was rejected",
        )));
    }
    Err(StoreError::PartialFailure { applied, failures })
}
