//! Port for the generic record CRUD API that provides durability.

use super::{FetchResponse, QueryParams, Record, WriteResponse};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for record client operations.
pub type RecordClientResult<T> = Result<T, RecordClientError>;

/// Generic record CRUD contract.
///
/// Batch writes report per-record outcomes; an `Err` means the call itself
/// failed (transport down, unreadable response).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Fetches records of `entity` with the given selection and ordering.
    async fn fetch_records(
        &self,
        entity: &str,
        params: &QueryParams,
    ) -> RecordClientResult<FetchResponse>;

    /// Fetches one record by identifier.
    ///
    /// Returns `None` when no such record exists.
    async fn get_record_by_id(
        &self,
        entity: &str,
        id: u64,
        params: &QueryParams,
    ) -> RecordClientResult<Option<Record>>;

    /// Creates records; identifiers are assigned by the implementation.
    async fn create_record(
        &self,
        entity: &str,
        records: Vec<Record>,
    ) -> RecordClientResult<WriteResponse>;

    /// Updates records; each record carries its `Id` and only the fields to
    /// overwrite.
    async fn update_record(
        &self,
        entity: &str,
        records: Vec<Record>,
    ) -> RecordClientResult<WriteResponse>;

    /// Deletes records by identifier.
    async fn delete_record(
        &self,
        entity: &str,
        record_ids: Vec<u64>,
    ) -> RecordClientResult<WriteResponse>;
}

/// Errors returned by record client implementations.
#[derive(Debug, Clone, Error)]
pub enum RecordClientError {
    /// The persistence boundary could not be reached.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The persistence boundary answered with something unusable.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RecordClientError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
