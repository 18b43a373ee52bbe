//! Configuration-selected record API implementation.

use async_trait::async_trait;
use std::sync::Arc;

use super::memory::InMemoryRecordClient;
use crate::config::{BackendKind, ConfigError, StoreConfig};
use crate::task::ports::{
    FetchResponse, QueryParams, Record, RecordClient, RecordClientError, RecordClientResult,
    WriteResponse,
};

/// Record API chosen by [`StoreConfig::backend`].
///
/// Both variants expose the same [`RecordClient`] capability, so the task
/// store and assignee directory are written once.
#[derive(Clone)]
pub enum RecordBackend {
    /// Local in-memory records.
    Memory(InMemoryRecordClient),
    /// A remote record API client supplied by the embedding application.
    Remote(Arc<dyn RecordClient>),
}

/// Errors raised while selecting a backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// The configuration cannot be satisfied.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The in-memory backend could not load its sample data.
    #[error(transparent)]
    Fixtures(#[from] RecordClientError),
}

impl RecordBackend {
    /// Builds the backend named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] when the remote backend is selected
    /// without a client, or [`BackendError::Fixtures`] when sample data
    /// cannot be loaded.
    pub fn from_config(
        config: &StoreConfig,
        remote: Option<Arc<dyn RecordClient>>,
    ) -> Result<Self, BackendError> {
        match config.backend {
            BackendKind::Remote => remote
                .map(Self::Remote)
                .ok_or(BackendError::Config(ConfigError::MissingRemoteClient)),
            BackendKind::Memory if config.seed_fixtures => {
                Ok(Self::Memory(InMemoryRecordClient::with_fixtures()?))
            }
            BackendKind::Memory => Ok(Self::Memory(InMemoryRecordClient::new())),
        }
    }

    /// Returns the kind of this backend.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Memory(_) => BackendKind::Memory,
            Self::Remote(_) => BackendKind::Remote,
        }
    }

    fn client(&self) -> &dyn RecordClient {
        match self {
            Self::Memory(client) => client,
            Self::Remote(client) => client.as_ref(),
        }
    }
}

impl std::fmt::Debug for RecordBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RecordBackend").field(&self.kind()).finish()
    }
}

#[async_trait]
impl RecordClient for RecordBackend {
    async fn fetch_records(
        &self,
        entity: &str,
        params: &QueryParams,
    ) -> RecordClientResult<FetchResponse> {
        self.client().fetch_records(entity, params).await
    }

    async fn get_record_by_id(
        &self,
        entity: &str,
        id: u64,
        params: &QueryParams,
    ) -> RecordClientResult<Option<Record>> {
        self.client().get_record_by_id(entity, id, params).await
    }

    async fn create_record(
        &self,
        entity: &str,
        records: Vec<Record>,
    ) -> RecordClientResult<WriteResponse> {
        self.client().create_record(entity, records).await
    }

    async fn update_record(
        &self,
        entity: &str,
        records: Vec<Record>,
    ) -> RecordClientResult<WriteResponse> {
        self.client().update_record(entity, records).await
    }

    async fn delete_record(
        &self,
        entity: &str,
        record_ids: Vec<u64>,
    ) -> RecordClientResult<WriteResponse> {
        self.client().delete_record(entity, record_ids).await
    }
}
