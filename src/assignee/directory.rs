//! Service for listing and editing assignees.

use super::domain::{Assignee, AssigneeId, INITIAL_ASSIGNEES, name_record};
use crate::config::StoreConfig;
use crate::task::{
    mapper::entities,
    ports::{
        ID_FIELD, NAME_FIELD, QueryParams, Record, RecordClient, RecordClientError,
        RecordClientResult, SortDirection, WriteResponse,
    },
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by assignee writes.
#[derive(Debug, Error)]
pub enum AssigneeError {
    /// The record API rejected the write.
    #[error("assignee write rejected: {0}")]
    Rejected(String),
    /// The record API was unreachable or answered nonsense.
    #[error(transparent)]
    Transport(#[from] RecordClientError),
    /// The record API did not answer in time.
    #[error("assignee request timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for assignee writes.
pub type AssigneeResult<T> = Result<T, AssigneeError>;

/// Assignee directory backed by the record API.
pub struct AssigneeDirectory<C>
where
    C: RecordClient,
{
    client: Arc<C>,
    request_timeout: Duration,
    seeded: Arc<AtomicBool>,
}

impl<C> Clone for AssigneeDirectory<C>
where
    C: RecordClient,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            request_timeout: self.request_timeout,
            seeded: Arc::clone(&self.seeded),
        }
    }
}

impl<C> AssigneeDirectory<C>
where
    C: RecordClient,
{
    /// Creates a directory over `client`.
    #[must_use]
    pub fn new(client: Arc<C>, config: &StoreConfig) -> Self {
        Self {
            client,
            request_timeout: config.request_timeout,
            seeded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Lists assignees by name.
    ///
    /// When the entity is empty, the [`INITIAL_ASSIGNEES`] are created and
    /// the list is fetched again. Seeding succeeds at most once per
    /// directory; a failed attempt is retried on the next empty listing.
    /// Failures degrade to an empty list.
    pub async fn list(&self) -> Vec<Assignee> {
        let Some(records) = self.fetch().await else {
            return Vec::new();
        };
        if !records.is_empty() {
            return records.iter().map(Assignee::from_record).collect();
        }
        if !self.seed_initial().await {
            return Vec::new();
        }
        self.fetch()
            .await
            .unwrap_or_default()
            .iter()
            .map(Assignee::from_record)
            .collect()
    }

    /// Fetches one assignee; `None` when missing or on failure.
    pub async fn get(&self, id: AssigneeId) -> Option<Assignee> {
        let params = QueryParams::new().select([ID_FIELD, NAME_FIELD]);
        match self
            .bounded(
                self.client
                    .get_record_by_id(entities::ASSIGNEE, id.value(), &params),
            )
            .await
        {
            Ok(record) => record.as_ref().map(Assignee::from_record),
            Err(err) => {
                warn!(assignee_id = %id, error = %err, "assignee lookup failed");
                None
            }
        }
    }

    /// Creates an assignee.
    ///
    /// # Errors
    ///
    /// Returns [`AssigneeError::Rejected`] when the record API refuses the
    /// write, or a transport or timeout error.
    pub async fn create(&self, name: &str) -> AssigneeResult<Assignee> {
        let response = self
            .bounded(
                self.client
                    .create_record(entities::ASSIGNEE, vec![name_record(name)]),
            )
            .await?;
        let assignee = first_stored(response, "assignee creation")?;
        info!(assignee_id = %assignee.id(), "assignee created");
        Ok(assignee)
    }

    /// Renames an assignee.
    ///
    /// # Errors
    ///
    /// Returns [`AssigneeError::Rejected`] when the record API refuses the
    /// write, or a transport or timeout error.
    pub async fn rename(&self, id: AssigneeId, name: &str) -> AssigneeResult<Assignee> {
        let mut record = name_record(name);
        record.insert(ID_FIELD.to_owned(), Value::from(id.value()));
        let response = self
            .bounded(self.client.update_record(entities::ASSIGNEE, vec![record]))
            .await?;
        first_stored(response, "assignee update")
    }

    /// Deletes an assignee; `Ok(true)` only when exactly one record was
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AssigneeError::Rejected`] when the record API refuses the
    /// request, or a transport or timeout error.
    pub async fn delete(&self, id: AssigneeId) -> AssigneeResult<bool> {
        let response = self
            .bounded(
                self.client
                    .delete_record(entities::ASSIGNEE, vec![id.value()]),
            )
            .await?;
        if !response.success {
            return Err(AssigneeError::Rejected(
                response.message.unwrap_or_default(),
            ));
        }
        let deleted = response
            .results
            .unwrap_or_default()
            .iter()
            .filter(|result| result.success)
            .count();
        Ok(deleted == 1)
    }

    /// Creates the initial assignees unless this directory already did.
    ///
    /// Returns true when at least one record was created. A failed or empty
    /// attempt clears the seeded flag so the next empty listing retries.
    async fn seed_initial(&self) -> bool {
        if self.seeded.swap(true, Ordering::SeqCst) {
            debug!("assignees already seeded");
            return false;
        }
        let records: Vec<Record> = INITIAL_ASSIGNEES
            .iter()
            .map(|name| name_record(name))
            .collect();
        let created = match self
            .bounded(self.client.create_record(entities::ASSIGNEE, records))
            .await
        {
            Ok(response) if response.success => {
                let results = response.results.unwrap_or_default();
                let created = results.iter().filter(|result| result.success).count();
                let failed = results.len().saturating_sub(created);
                if failed > 0 {
                    warn!(failed, "some initial assignees were not created");
                }
                info!(created, "initial assignees seeded");
                created
            }
            Ok(response) => {
                warn!(message = ?response.message, "initial assignees rejected");
                0
            }
            Err(err) => {
                warn!(error = %err, "initial assignee seeding failed");
                0
            }
        };
        if created == 0 {
            self.seeded.store(false, Ordering::SeqCst);
        }
        created > 0
    }

    async fn fetch(&self) -> Option<Vec<Record>> {
        let params = QueryParams::new()
            .select([ID_FIELD, NAME_FIELD])
            .order_by(NAME_FIELD, SortDirection::Ascending);
        match self
            .bounded(self.client.fetch_records(entities::ASSIGNEE, &params))
            .await
        {
            Ok(response) if response.success => Some(response.data),
            Ok(response) => {
                warn!(message = ?response.message, "assignee fetch rejected");
                None
            }
            Err(err) => {
                warn!(error = %err, "assignee fetch failed");
                None
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = RecordClientResult<T>>,
    ) -> AssigneeResult<T> {
        tokio::time::timeout(self.request_timeout, call)
            .await
            .map_err(|_| AssigneeError::Timeout(self.request_timeout))?
            .map_err(AssigneeError::from)
    }
}

/// Maps the first successfully written record of a one-record batch.
fn first_stored(response: WriteResponse, operation: &str) -> AssigneeResult<Assignee> {
    if !response.success {
        return Err(AssigneeError::Rejected(
            response
                .message
                .unwrap_or_else(|| format!("{operation} refused")),
        ));
    }
    let results = response.results.unwrap_or_default();
    for failure in results.iter().filter(|result| !result.success) {
        warn!(message = ?failure.message, operation, "assignee record rejected");
    }
    results
        .iter()
        .find(|result| result.success)
        .and_then(|result| result.data.as_ref())
        .map(Assignee::from_record)
        .ok_or_else(|| AssigneeError::Rejected(format!("{operation} failed")))
}
